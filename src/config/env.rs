//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "BENCH_REPORTER";

/// Project name variable set by the CI system
pub const CI_PROJECT_VAR: &str = "CI_PROJECT_NAME";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Project from BENCH_REPORTER_PROJECT
    pub project: Option<String>,
    /// Project from CI_PROJECT_NAME
    pub ci_project_name: Option<String>,
    /// Ingestion URL from BENCH_REPORTER_URL
    pub ingestion_url: Option<String>,
    /// Marker token from BENCH_REPORTER_MARKER
    pub marker: Option<String>,
    /// Timeout from BENCH_REPORTER_TIMEOUT
    pub timeout: Option<u64>,
    /// Concurrency from BENCH_REPORTER_CONCURRENCY
    pub concurrency: Option<usize>,
    /// Config file from BENCH_REPORTER_CONFIG
    pub config_file: Option<String>,
    /// Verbose from BENCH_REPORTER_VERBOSE
    pub verbose: Option<bool>,
    /// Output format from BENCH_REPORTER_FORMAT
    pub format: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            project: get_env("PROJECT"),
            ci_project_name: env::var(CI_PROJECT_VAR).ok().filter(|v| !v.is_empty()),
            ingestion_url: get_env("URL"),
            marker: get_env("MARKER"),
            timeout: get_env_parse("TIMEOUT"),
            concurrency: get_env_parse("CONCURRENCY"),
            config_file: get_env("CONFIG"),
            verbose: get_env_bool("VERBOSE"),
            format: get_env("FORMAT"),
        }
    }

    /// Project name; the prefixed variable wins over the CI one
    pub fn project_name(&self) -> Option<String> {
        self.project.clone().or_else(|| self.ci_project_name.clone())
    }

    /// Get output format with fallback
    pub fn format_or(&self, default: &str) -> String {
        self.format.clone().unwrap_or_else(|| default.to_string())
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables (useful for testing)
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

impl EnvBuilder {
    /// Create a new environment builder
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Set project
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_PROJECT"), project.into()));
        self
    }

    /// Set CI project name
    pub fn ci_project_name(mut self, project: impl Into<String>) -> Self {
        self.vars.push((CI_PROJECT_VAR.to_string(), project.into()));
        self
    }

    /// Set ingestion URL
    pub fn ingestion_url(mut self, url: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_URL"), url.into()));
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: u64) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_TIMEOUT"), timeout.to_string()));
        self
    }

    /// Set verbose
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_VERBOSE"), verbose.to_string()));
        self
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that restores environment variables on drop
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all recognized environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {CI_PROJECT_VAR}              Project tag (set by CI)");
    println!("  {ENV_PREFIX}_PROJECT      Project tag (overrides {CI_PROJECT_VAR})");
    println!("  {ENV_PREFIX}_URL          Ingestion endpoint URL");
    println!("  {ENV_PREFIX}_MARKER       Marker token selecting benchmark lines");
    println!("  {ENV_PREFIX}_TIMEOUT      Per-request timeout in seconds");
    println!("  {ENV_PREFIX}_CONCURRENCY  Maximum in-flight publishes");
    println!("  {ENV_PREFIX}_CONFIG       Path to configuration file");
    println!("  {ENV_PREFIX}_VERBOSE      Enable verbose output (true/false)");
    println!("  {ENV_PREFIX}_FORMAT       Summary format (table, json, json-pretty, summary)");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_URL=http://vm:8428/api/v1/import/prometheus");
    println!("  bench-reporter target/bench-output.txt");
}
