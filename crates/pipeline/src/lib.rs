//! Step execution for listing enhancement jobs.
//!
//! The engine only knows the [`StepExecutor`] trait. [`SimulatedExecutor`]
//! stands in for real inference: it inspects uploaded image headers but
//! derives everything else from the product catalogue.

pub mod delays;
pub mod executor;
pub mod simulated;

pub use delays::StepDelays;
pub use executor::{StepContext, StepError, StepExecutor};
pub use simulated::SimulatedExecutor;
