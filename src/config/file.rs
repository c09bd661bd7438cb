//! Configuration file discovery
//!
//! Finds the reporter config file in the standard locations.

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::ReporterConfig;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./bench-reporter.yaml",
    "./bench-reporter.yml",
    "./bench-reporter.json",
    "./.bench-reporter.yaml",
    "~/.config/bench-reporter/config.yaml",
];

/// Config file lookup
pub struct ConfigFile;

impl ConfigFile {
    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        Self::find_in(CONFIG_LOCATIONS)
    }

    fn find_in(locations: &[&str]) -> Option<PathBuf> {
        locations
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Load an explicit file, else the first one found, else defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Result<ReporterConfig> {
        match explicit {
            Some(path) => ReporterConfig::load(path),
            None => match Self::find() {
                Some(path) => {
                    tracing::debug!("Using config file {}", path.display());
                    ReporterConfig::load(&path)
                }
                None => Ok(ReporterConfig::default()),
            },
        }
    }
}

/// Expand `~` to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
