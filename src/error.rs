//! Reporter error types
//!
//! Errors raised while loading a report, parsing its lines and publishing
//! samples. Only input and configuration errors are fatal to a run.

use std::path::PathBuf;
use thiserror::Error;

/// Reporter errors
#[derive(Error, Debug)]
pub enum ReporterError {
    #[error("Report file not readable: {path}: {source}")]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed benchmark line ({found} fields, need {required}): {line}")]
    MalformedLine {
        line: String,
        found: usize,
        required: usize,
    },

    #[error("Failed to publish {metric}: {reason}")]
    PublishFailure { metric: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ReporterError {
    /// Whether the error should abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ReporterError::InputNotFound { .. } | ReporterError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ReporterError>;
