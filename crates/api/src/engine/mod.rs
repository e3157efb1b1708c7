//! Listing enhancement job engine.
//!
//! [`JobEngine`] owns the job lifecycle: submission, stepwise advancement
//! through the configured [`StepExecutor`](spark_pipeline::StepExecutor),
//! cancellation and retry. Each submitted job gets its own driver task
//! that advances it until it reaches a terminal state.

mod driver;
pub mod lifecycle;

pub use lifecycle::JobEngine;
