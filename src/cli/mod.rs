//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::Parser;
use std::path::PathBuf;

/// Publish benchmark results from a report file to a metrics backend
#[derive(Parser, Debug)]
#[command(name = "bench-reporter")]
#[command(version)]
#[command(about = "Parse benchmark output and push each result to a metrics ingestion endpoint")]
#[command(long_about = None)]
pub struct Args {
    /// Benchmark output file [default: output.txt]
    pub result_file: Option<PathBuf>,

    /// Project tag (defaults to $CI_PROJECT_NAME)
    #[arg(short, long)]
    pub project: Option<String>,

    /// Ingestion endpoint URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// Marker token selecting benchmark lines
    #[arg(short, long)]
    pub marker: Option<String>,

    /// 1-indexed field holding the benchmark name
    #[arg(long)]
    pub name_field: Option<usize>,

    /// 1-indexed field holding the benchmark result
    #[arg(long)]
    pub result_field: Option<usize>,

    /// Metric family in the published line
    #[arg(long)]
    pub metric_family: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum in-flight publishes
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Write the filtered lines to this file
    #[arg(long)]
    pub filtered_output: Option<PathBuf>,

    /// Log samples instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Summary format (table, json, json-pretty, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Exit 0 even when some publishes failed
    #[arg(long)]
    pub allow_failures: bool,

    /// Configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print recognized environment variables and exit
    #[arg(long)]
    pub env_help: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
