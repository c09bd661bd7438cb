//! Benchmark result reporter
//!
//! Parses benchmark output, keeps the lines carrying a marker token and
//! publishes each benchmark's result to a metrics ingestion endpoint as
//! `benchmark{project="<P>",metric="<M>"} <V>`.
//!
//! ```no_run
//! use bench_reporter::config::ReporterConfig;
//! use bench_reporter::pipeline::Pipeline;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ReporterConfig::default().with_project("myproj");
//! let summary = Pipeline::from_config(config)?.run_file().await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod publisher;
pub mod report;
pub mod utils;

pub use error::ReporterError;
pub use models::{BenchmarkLine, MetricSample, PublishResult, RunSummary};
pub use pipeline::Pipeline;
pub use publisher::{DryRunPublisher, HttpPublisher, Publisher};
pub use report::{filter_lines, parse_line, FieldLayout, Report};
