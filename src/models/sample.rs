//! Benchmark line and metric sample models
//!
//! Defines the parsed benchmark record, the sample sent to the ingestion
//! endpoint and the per-sample publish outcome.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default metric family used in the line-protocol body
pub const DEFAULT_METRIC_FAMILY: &str = "benchmark";

/// A report line that passed the marker filter and was split into fields
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkLine {
    pub name: String,
    pub result: String,
}

impl BenchmarkLine {
    pub fn new(name: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            result: result.into(),
        }
    }

    /// Tag the line with a project to get a publishable sample
    pub fn into_sample(self, project: impl Into<String>) -> MetricSample {
        MetricSample {
            project: project.into(),
            metric: self.name,
            value: self.result,
        }
    }
}

/// One (project, metric, value) triple reported for a benchmark line
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSample {
    pub project: String,
    pub metric: String,
    pub value: String,
}

impl MetricSample {
    pub fn new(
        project: impl Into<String>,
        metric: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            metric: metric.into(),
            value: value.into(),
        }
    }

    /// Render the sample in the plaintext import format:
    /// `<family>{project="<project>",metric="<metric>"} <value>`
    pub fn to_line_protocol(&self, family: &str) -> String {
        format!(
            "{}{{project=\"{}\",metric=\"{}\"}} {}",
            family,
            escape_label_value(&self.project),
            escape_label_value(&self.metric),
            self.value
        )
    }
}

impl fmt::Display for MetricSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line_protocol(DEFAULT_METRIC_FAMILY))
    }
}

/// Escape a label value per the Prometheus text exposition format
fn escape_label_value(value: &str) -> String {
    if !value.contains(['\\', '"', '\n']) {
        return value.to_string();
    }

    let mut escaped = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Outcome of a single publish attempt
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PublishResult {
    pub fn success(status: Option<u16>) -> Self {
        Self {
            ok: true,
            status,
            error: None,
        }
    }

    /// Backend answered, but not with a 2xx
    pub fn rejected(status: u16, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: Some(status),
            error: Some(error.into()),
        }
    }

    /// No response at all (connection error, timeout)
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: None,
            error: Some(error.into()),
        }
    }
}

impl fmt::Display for PublishResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.ok, self.status) {
            (true, Some(status)) => write!(f, "ok ({status})"),
            (true, None) => write!(f, "ok"),
            (false, Some(status)) => write!(
                f,
                "failed ({status}): {}",
                self.error.as_deref().unwrap_or("")
            ),
            (false, None) => write!(f, "failed: {}", self.error.as_deref().unwrap_or("")),
        }
    }
}
