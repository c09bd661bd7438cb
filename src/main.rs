//! bench-reporter - publish benchmark results from CI output
//!
//! Reads a benchmark report, keeps the lines containing the marker token
//! and posts one sample per benchmark to a metrics ingestion endpoint.
//!
//! ## Usage
//!
//! ```bash
//! # Report output.txt for the CI project
//! CI_PROJECT_NAME=myproj bench-reporter
//!
//! # Explicit file, project and endpoint
//! bench-reporter bench.txt --project myproj --url http://vm:8428/api/v1/import/prometheus
//!
//! # See what would be sent
//! bench-reporter bench.txt --project myproj --dry-run -v
//! ```
//!
//! Exit status is 0 on success, 1 when a publish failed and 2 on fatal
//! errors (unreadable report, invalid configuration).

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::{error, info, warn};

mod cli;

use bench_reporter::config::{print_env_help, ConfigFile, EnvConfig, ReporterConfig};
use bench_reporter::output::{OutputFormat, SummaryFormatter};
use bench_reporter::utils::{init_logger, LogLevel};
use bench_reporter::Pipeline;
use cli::Args;

const EXIT_SUCCESS: u8 = 0;
const EXIT_PUBLISH_FAILED: u8 = 1;
const EXIT_FATAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if args.env_help {
        print_env_help();
        return ExitCode::SUCCESS;
    }

    let env = EnvConfig::load();
    let verbose = args.verbose || env.verbose.unwrap_or(false);
    init_logger(LogLevel::from_verbose(verbose));

    ExitCode::from(execute(args, env).await)
}

/// Run and map the outcome to a process exit status
async fn execute(args: Args, env: EnvConfig) -> u8 {
    match run(args, env).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            EXIT_FATAL
        }
    }
}

async fn run(args: Args, env: EnvConfig) -> Result<u8> {
    let config = resolve_config(&args, &env)?;

    info!(
        "Publishing to {} (timeout {}s, concurrency {})",
        config.ingestion_url, config.timeout_secs, config.concurrency
    );

    let pipeline = Pipeline::from_config(config)?;
    let summary = pipeline.run_file().await?;

    let format_name = args.format.unwrap_or_else(|| env.format_or("table"));
    let format = OutputFormat::from_str(&format_name).unwrap_or_else(|| {
        warn!("Unknown format {:?}, using table", format_name);
        OutputFormat::Table
    });
    let mut formatter = SummaryFormatter::new(format);
    if !std::io::stdout().is_terminal() {
        formatter = formatter.no_color();
    }
    println!("{}", formatter.format_summary(&summary));

    if summary.has_failures() && !args.allow_failures {
        error!(
            "{} of {} samples failed to publish",
            summary.failed,
            summary.published + summary.failed
        );
        return Ok(EXIT_PUBLISH_FAILED);
    }

    Ok(EXIT_SUCCESS)
}

/// Merge config file, environment and CLI arguments (CLI wins)
fn resolve_config(args: &Args, env: &EnvConfig) -> Result<ReporterConfig> {
    let explicit = args
        .config
        .clone()
        .or_else(|| env.config_file.as_ref().map(Into::into));

    let mut config = ConfigFile::load_or_default(explicit.as_deref())?.apply_env(env);

    if let Some(path) = &args.result_file {
        config.report_path = path.clone();
    }
    if let Some(project) = &args.project {
        config.project_name = Some(project.clone());
    }
    if let Some(url) = &args.url {
        config.ingestion_url = url.clone();
    }
    if let Some(marker) = &args.marker {
        config.marker_token = marker.clone();
    }
    if let Some(name_field) = args.name_field {
        config.fields.name_field = name_field;
    }
    if let Some(result_field) = args.result_field {
        config.fields.result_field = result_field;
    }
    if let Some(family) = &args.metric_family {
        config.metric_family = family.clone();
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(path) = &args.filtered_output {
        config.filtered_output = Some(path.clone());
    }
    if args.dry_run {
        config.dry_run = true;
    }

    Ok(config)
}
