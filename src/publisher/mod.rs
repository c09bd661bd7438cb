//! Metric publishers
//!
//! A [`Publisher`] delivers one [`MetricSample`] per call and reports the
//! outcome as a [`PublishResult`] instead of an error, so the pipeline can
//! keep going after a failed sample.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::ReporterConfig;
use crate::error::ReporterError;
use crate::http::HttpClient;
use crate::models::{MetricSample, PublishResult, DEFAULT_METRIC_FAMILY};

/// Default ingestion endpoint (VictoriaMetrics Prometheus import API)
pub const DEFAULT_INGESTION_URL: &str = "http://localhost:8428/api/v1/import/prometheus";

/// Delivers samples to a metrics backend
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Make a single delivery attempt for `sample`
    async fn publish(&self, sample: &MetricSample) -> PublishResult;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Build the publisher `config` asks for: dry-run, else HTTP to its URL
pub fn from_config(config: &ReporterConfig) -> crate::error::Result<Box<dyn Publisher>> {
    if config.dry_run {
        return Ok(Box::new(
            DryRunPublisher::new().with_family(&config.metric_family),
        ));
    }

    let publisher = HttpPublisher::new(&config.ingestion_url, config.timeout_secs)
        .map_err(|e| ReporterError::Config(format!("{e:#}")))?
        .with_family(&config.metric_family);
    Ok(Box::new(publisher))
}

/// POSTs each sample as a line-protocol body
pub struct HttpPublisher {
    client: HttpClient,
    url: String,
    family: String,
}

impl HttpPublisher {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = HttpClient::with_timeout(timeout_secs)?.default_header(
            "User-Agent",
            concat!("bench-reporter/", env!("CARGO_PKG_VERSION")),
        )?;

        Ok(Self {
            client,
            url: url.into(),
            family: DEFAULT_METRIC_FAMILY.to_string(),
        })
    }

    /// Override the metric family in the body
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Publisher for HttpPublisher {
    async fn publish(&self, sample: &MetricSample) -> PublishResult {
        let body = sample.to_line_protocol(&self.family);
        debug!("POST {} <- {}", self.url, body);

        match self.client.post_text(&self.url, body).await {
            Ok(resp) if resp.is_success() => PublishResult::success(Some(resp.status_code)),
            Ok(resp) => {
                let reason = if resp.body.trim().is_empty() {
                    format!("HTTP {}", resp.status_code)
                } else {
                    resp.body.trim().to_string()
                };
                PublishResult::rejected(resp.status_code, reason)
            }
            Err(e) => PublishResult::failed(e.to_string()),
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Logs what would be sent without touching the network
pub struct DryRunPublisher {
    family: String,
}

impl DryRunPublisher {
    pub fn new() -> Self {
        Self {
            family: DEFAULT_METRIC_FAMILY.to_string(),
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }
}

impl Default for DryRunPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Publisher for DryRunPublisher {
    async fn publish(&self, sample: &MetricSample) -> PublishResult {
        info!("[dry-run] {}", sample.to_line_protocol(&self.family));
        PublishResult::success(None)
    }

    fn name(&self) -> &'static str {
        "dry-run"
    }
}
