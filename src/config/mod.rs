//! Configuration module
//!
//! Handles loading, merging and validating reporter configuration.
//! Precedence is CLI arguments, then environment, then config file, then
//! defaults.

mod env;
mod file;

pub use env::{print_env_help, EnvBuilder, EnvConfig, EnvGuard, CI_PROJECT_VAR};
pub use file::{expand_path, ConfigFile};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ReporterError;
use crate::http::DEFAULT_TIMEOUT_SECS;
use crate::models::DEFAULT_METRIC_FAMILY;
use crate::publisher::DEFAULT_INGESTION_URL;
use crate::report::{FieldLayout, DEFAULT_MARKER};

/// Default report file
pub const DEFAULT_REPORT_PATH: &str = "output.txt";

/// Reporter configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Benchmark output to read
    pub report_path: PathBuf,

    /// Project tag attached to every sample
    pub project_name: Option<String>,

    /// Ingestion endpoint receiving POSTed samples
    pub ingestion_url: String,

    /// Substring selecting benchmark result lines
    pub marker_token: String,

    /// Series name preceding the label set
    pub metric_family: String,

    /// Name/result column positions
    pub fields: FieldLayout,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum in-flight publishes (1 = sequential, report order)
    pub concurrency: usize,

    /// Write the filtered lines here before publishing
    pub filtered_output: Option<PathBuf>,

    /// Log samples instead of sending them
    pub dry_run: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            project_name: None,
            ingestion_url: DEFAULT_INGESTION_URL.to_string(),
            marker_token: DEFAULT_MARKER.to_string(),
            metric_family: DEFAULT_METRIC_FAMILY.to_string(),
            fields: FieldLayout::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            concurrency: 1,
            filtered_output: None,
            dry_run: false,
        }
    }
}

impl ReporterConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Overlay values present in the environment
    pub fn apply_env(mut self, env: &EnvConfig) -> Self {
        if let Some(project) = env.project_name() {
            self.project_name = Some(project);
        }
        if let Some(url) = &env.ingestion_url {
            self.ingestion_url = url.clone();
        }
        if let Some(marker) = &env.marker {
            self.marker_token = marker.clone();
        }
        if let Some(timeout) = env.timeout {
            self.timeout_secs = timeout;
        }
        if let Some(concurrency) = env.concurrency {
            self.concurrency = concurrency;
        }
        self
    }

    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project_name = Some(project.into());
        self
    }

    pub fn with_ingestion_url(mut self, url: impl Into<String>) -> Self {
        self.ingestion_url = url.into();
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker_token = marker.into();
        self
    }

    pub fn with_fields(mut self, fields: FieldLayout) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Project tag, failing if none was supplied
    pub fn project(&self) -> Result<&str, ReporterError> {
        match self.project_name.as_deref().map(str::trim) {
            Some(project) if !project.is_empty() => Ok(project),
            _ => Err(ReporterError::Config(format!(
                "no project name; pass --project or set {CI_PROJECT_VAR}"
            ))),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ReporterError> {
        self.project()?;
        self.fields.validate()?;

        validate_url(&self.ingestion_url)?;
        if self.concurrency == 0 {
            return Err(ReporterError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ReporterError::Config(
                "timeout must be at least 1 second".to_string(),
            ));
        }
        if self.metric_family.trim().is_empty() {
            return Err(ReporterError::Config("metric family is empty".to_string()));
        }
        Ok(())
    }
}

/// Require an absolute http(s) URL
fn validate_url(url: &str) -> Result<(), ReporterError> {
    if url.trim().is_empty() {
        return Err(ReporterError::Config("ingestion URL is empty".to_string()));
    }

    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ReporterError::Config(format!("invalid ingestion URL {url:?}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(()),
        "http" | "https" => Err(ReporterError::Config(format!(
            "ingestion URL {url:?} has no host"
        ))),
        scheme => Err(ReporterError::Config(format!(
            "ingestion URL {url:?} must use http or https, not {scheme:?}"
        ))),
    }
}

fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReporterConfig::default();
        assert_eq!(config.report_path, PathBuf::from("output.txt"));
        assert_eq!(config.marker_token, "test");
        assert_eq!(config.metric_family, "benchmark");
        assert_eq!(config.fields, FieldLayout::new(2, 5));
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_validate_requires_project() {
        let config = ReporterConfig::default();
        assert!(matches!(config.validate(), Err(ReporterError::Config(_))));

        let config = config.with_project("   ");
        assert!(config.validate().is_err());

        let config = ReporterConfig::default().with_project("myproj");
        assert!(config.validate().is_ok());
        assert_eq!(config.project().unwrap(), "myproj");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = ReporterConfig::default().with_project("p");
        assert!(base.clone().with_concurrency(0).validate().is_err());
        assert!(base.clone().with_ingestion_url("").validate().is_err());
        assert!(base.with_fields(FieldLayout::new(3, 3)).validate().is_err());
    }

    #[test]
    fn test_validate_ingestion_url() {
        let base = ReporterConfig::default().with_project("p");
        for bad in ["vm:8428/api", "not a url", "ftp://vm/import", "http://"] {
            let result = base.clone().with_ingestion_url(bad).validate();
            assert!(
                matches!(result, Err(ReporterError::Config(_))),
                "{bad} should be rejected"
            );
        }
        assert!(base
            .clone()
            .with_ingestion_url("https://vm.example.com/api/v1/import/prometheus")
            .validate()
            .is_ok());
        assert!(base.validate().is_ok());
    }

    #[test]
    fn test_apply_env() {
        let env = EnvConfig {
            ci_project_name: Some("from-ci".to_string()),
            ingestion_url: Some("http://vm:8428/api/v1/import/prometheus".to_string()),
            concurrency: Some(4),
            ..Default::default()
        };
        let config = ReporterConfig::default().apply_env(&env);
        assert_eq!(config.project_name.as_deref(), Some("from-ci"));
        assert_eq!(
            config.ingestion_url,
            "http://vm:8428/api/v1/import/prometheus"
        );
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.marker_token, "test");
    }

    #[test]
    fn test_yaml_roundtrip_with_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench-reporter.yaml");
        std::fs::write(&path, "project_name: myproj\nfields:\n  name_field: 3\n").unwrap();

        let config = ReporterConfig::load(&path).unwrap();
        assert_eq!(config.project_name.as_deref(), Some("myproj"));
        assert_eq!(config.fields, FieldLayout::new(3, 5));
        assert_eq!(config.marker_token, "test");

        let json_path = dir.path().join("config.json");
        config.save(&json_path).unwrap();
        let reloaded = ReporterConfig::load(&json_path).unwrap();
        assert_eq!(reloaded.fields, config.fields);
    }
}
