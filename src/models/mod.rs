//! Data models for benchmark reporting
//!
//! This module contains all data structures used throughout the application.

mod sample;
mod summary;

pub use sample::{BenchmarkLine, MetricSample, PublishResult, DEFAULT_METRIC_FAMILY};
pub use summary::{PublishFailureRecord, RunSummary};
