//! Domain logic shared by every Spark crate.
//!
//! Pure types and functions only: no I/O, no async runtime.

pub mod catalog;
pub mod error;
pub mod job;
pub mod roles;
pub mod types;
pub mod upload;
