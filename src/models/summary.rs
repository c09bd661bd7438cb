//! Run summary model
//!
//! Aggregated outcome of one pipeline run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::PublishResult;

/// A sample that could not be delivered
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishFailureRecord {
    pub metric: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub error: String,
}

impl PublishFailureRecord {
    pub fn from_result(metric: impl Into<String>, result: &PublishResult) -> Self {
        Self {
            metric: metric.into(),
            status: result.status,
            error: result
                .error
                .clone()
                .unwrap_or_else(|| "unknown error".to_string()),
        }
    }
}

/// Counts for a whole report
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub project: String,
    pub report: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Lines in the report
    pub total_lines: usize,
    /// Lines containing the marker token
    pub matched: usize,
    pub published: usize,
    /// Matched lines that could not be parsed
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<PublishFailureRecord>,
}

impl RunSummary {
    pub fn new(project: impl Into<String>, report: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            report: report.into(),
            started_at: Utc::now(),
            duration_ms: 0,
            total_lines: 0,
            matched: 0,
            published: 0,
            skipped: 0,
            failed: 0,
            failures: Vec::new(),
        }
    }

    /// Lines that went through the parser
    pub fn processed(&self) -> usize {
        self.matched
    }

    /// Record the outcome of one publish attempt
    pub fn record_publish(&mut self, metric: &str, result: &PublishResult) {
        if result.ok {
            self.published += 1;
        } else {
            self.failed += 1;
            self.failures
                .push(PublishFailureRecord::from_result(metric, result));
        }
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Publish success rate over attempted samples (0-100)
    pub fn success_rate(&self) -> f64 {
        let attempted = self.published + self.failed;
        if attempted == 0 {
            100.0
        } else {
            (self.published as f64 / attempted as f64) * 100.0
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed={} published={} skipped={} failed={}",
            self.processed(),
            self.published,
            self.skipped,
            self.failed
        )
    }
}
