//! Pipeline orchestration
//!
//! Drives a report through filtering, parsing and publishing.

mod runner;

pub use runner::Pipeline;
