//! Report-to-backend pipeline
//!
//! Filters a report, parses each matching line and publishes the samples.
//! Per-line problems never abort a run; they are counted in the summary.

use futures::future::join_all;
use std::path::Path;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::config::ReporterConfig;
use crate::error::Result;
use crate::models::{MetricSample, PublishResult, RunSummary};
use crate::publisher::{self, Publisher};
use crate::report::{parse_line, Report};
use crate::utils::Timer;

/// Parse-and-publish orchestrator
pub struct Pipeline {
    config: ReporterConfig,
    project: String,
    publisher: Box<dyn Publisher>,
}

impl Pipeline {
    /// Create a pipeline; fails on invalid configuration
    pub fn new(config: ReporterConfig, publisher: Box<dyn Publisher>) -> Result<Self> {
        config.validate()?;
        let project = config.project()?.to_string();

        Ok(Self {
            config,
            project,
            publisher,
        })
    }

    /// Create a pipeline whose publisher is built from `config`
    pub fn from_config(config: ReporterConfig) -> Result<Self> {
        config.validate()?;
        let publisher = publisher::from_config(&config)?;
        Self::new(config, publisher)
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Load the configured report file and run it
    pub async fn run_file(&self) -> Result<RunSummary> {
        let report = Report::load(&self.config.report_path)?;
        Ok(self.run(&report).await)
    }

    /// Process every matching line of `report`
    pub async fn run(&self, report: &Report) -> RunSummary {
        let timer = Timer::start("pipeline run");
        let mut summary = RunSummary::new(&self.project, report.display_name());
        summary.total_lines = report.len();

        info!(
            "Reporting {} for project {} via {} publisher",
            summary.report,
            self.project,
            self.publisher.name()
        );

        let matched: Vec<&str> = report.matching(&self.config.marker_token).collect();
        summary.matched = matched.len();
        debug!(
            "{} of {} lines contain marker {:?}",
            matched.len(),
            report.len(),
            self.config.marker_token
        );

        if let Some(path) = &self.config.filtered_output {
            write_filtered(path, &matched);
        }

        let mut samples = Vec::with_capacity(matched.len());
        for line in matched {
            match parse_line(line, &self.config.fields) {
                Ok(parsed) => samples.push(parsed.into_sample(self.project.as_str())),
                Err(e) => {
                    warn!("Skipping line: {}", e);
                    summary.record_skip();
                }
            }
        }

        for (sample, result) in self.publish_all(samples).await {
            if result.ok {
                debug!("Published {} = {}", sample.metric, sample.value);
            } else {
                warn!("Publish of {} {}", sample.metric, result);
            }
            summary.record_publish(&sample.metric, &result);
        }

        summary.duration_ms = timer.elapsed_ms();

        info!(
            "Run completed in {}ms - {}",
            summary.duration_ms, summary
        );

        summary
    }

    /// Publish with at most `concurrency` requests in flight.
    ///
    /// Results come back in report order whatever the concurrency.
    async fn publish_all(&self, samples: Vec<MetricSample>) -> Vec<(MetricSample, PublishResult)> {
        let semaphore = Semaphore::new(self.config.concurrency.max(1));

        let tasks = samples.into_iter().map(|sample| {
            let semaphore = &semaphore;
            async move {
                let _permit = semaphore.acquire().await.ok();
                let result = self.publisher.publish(&sample).await;
                (sample, result)
            }
        });

        join_all(tasks).await
    }
}

/// Write the filtered copy; a failure here only costs the debug artifact
fn write_filtered(path: &Path, lines: &[&str]) {
    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }

    match std::fs::write(path, content) {
        Ok(()) => debug!("Wrote {} filtered lines to {}", lines.len(), path.display()),
        Err(e) => warn!("Could not write filtered copy {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReporterError;
    use crate::report::FieldLayout;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Records bodies and fails metrics listed in `reject`
    #[derive(Clone, Default)]
    struct RecordingPublisher {
        sent: Arc<Mutex<Vec<String>>>,
        reject: Vec<String>,
    }

    impl RecordingPublisher {
        fn rejecting(metrics: &[&str]) -> Self {
            Self {
                reject: metrics.iter().map(|m| m.to_string()).collect(),
                ..Default::default()
            }
        }

        fn bodies(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Publisher for RecordingPublisher {
        async fn publish(&self, sample: &MetricSample) -> PublishResult {
            self.sent.lock().unwrap().push(sample.to_string());
            if self.reject.contains(&sample.metric) {
                PublishResult::failed("connection refused")
            } else {
                PublishResult::success(Some(204))
            }
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn config() -> ReporterConfig {
        ReporterConfig::default().with_project("myproj")
    }

    fn pipeline(publisher: &RecordingPublisher) -> Pipeline {
        Pipeline::new(config(), Box::new(publisher.clone())).unwrap()
    }

    #[tokio::test]
    async fn test_no_matching_lines() {
        let publisher = RecordingPublisher::default();
        let report = Report::from_lines(["compiling", "finished release"]);

        let summary = pipeline(&publisher).run(&report).await;
        assert_eq!(summary.total_lines, 2);
        assert_eq!(summary.matched, 0);
        assert_eq!(summary.published, 0);
        assert_eq!(summary.failed, 0);
        assert!(publisher.bodies().is_empty());
    }

    #[tokio::test]
    async fn test_publishes_exact_body() {
        let publisher = RecordingPublisher::default();
        let report = Report::from_lines(["x name_x test 3 456 y"]);

        let summary = pipeline(&publisher).run(&report).await;
        assert_eq!(summary.published, 1);
        assert_eq!(
            publisher.bodies(),
            vec!["benchmark{project=\"myproj\",metric=\"name_x\"} 456".to_string()]
        );
    }

    #[tokio::test]
    async fn test_mixed_well_formed_and_malformed() {
        let publisher = RecordingPublisher::default();
        let report = Report::from_lines([
            "running 3 tests",
            "test a_bench ... bench: 10 ns/iter",
            "test result: ok",
            "test b_bench ... bench: 20 ns/iter",
            "finished",
        ]);

        let summary = pipeline(&publisher).run(&report).await;
        assert_eq!(summary.matched, 4);
        assert_eq!(summary.published, 2);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(
            publisher.bodies(),
            vec![
                "benchmark{project=\"myproj\",metric=\"a_bench\"} 10".to_string(),
                "benchmark{project=\"myproj\",metric=\"b_bench\"} 20".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_run() {
        let publisher = RecordingPublisher::rejecting(&["a_bench"]);
        let report = Report::from_lines([
            "test a_bench ... bench: 10 ns/iter",
            "test b_bench ... bench: 20 ns/iter",
        ]);

        let summary = pipeline(&publisher).run(&report).await;
        assert_eq!(summary.published, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.has_failures());
        assert_eq!(summary.failures[0].metric, "a_bench");
        assert_eq!(summary.failures[0].error, "connection refused");
        assert_eq!(publisher.bodies().len(), 2);
    }

    #[tokio::test]
    async fn test_rerun_is_not_deduplicated() {
        let publisher = RecordingPublisher::default();
        let report = Report::from_lines(["x test name_x 3 456 y"]);
        let pipeline = pipeline(&publisher);

        pipeline.run(&report).await;
        pipeline.run(&report).await;

        let bodies = publisher.bodies();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0], bodies[1]);
    }

    #[tokio::test]
    async fn test_concurrent_publish_same_counts() {
        let lines: Vec<String> = (0..20)
            .map(|i| format!("test bench_{i} ... bench: {i} ns/iter"))
            .collect();
        let report = Report::from_lines(lines);

        let publisher = RecordingPublisher::rejecting(&["bench_3", "bench_7"]);
        let pipeline = Pipeline::new(
            config().with_concurrency(4),
            Box::new(publisher.clone()),
        )
        .unwrap();

        let summary = pipeline.run(&report).await;
        assert_eq!(summary.published, 18);
        assert_eq!(summary.failed, 2);
        assert_eq!(publisher.bodies().len(), 20);
        let failed: Vec<_> = summary.failures.iter().map(|f| f.metric.as_str()).collect();
        assert_eq!(failed, vec!["bench_3", "bench_7"]);
    }

    /// Tracks the largest number of publishes running at once
    #[derive(Clone, Default)]
    struct SlowPublisher {
        in_flight: Arc<Mutex<(usize, usize)>>,
    }

    #[async_trait]
    impl Publisher for SlowPublisher {
        async fn publish(&self, _sample: &MetricSample) -> PublishResult {
            {
                let mut guard = self.in_flight.lock().unwrap();
                guard.0 += 1;
                guard.1 = guard.1.max(guard.0);
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            self.in_flight.lock().unwrap().0 -= 1;
            PublishResult::success(Some(204))
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_concurrency_bounds_in_flight_publishes() {
        let lines: Vec<String> = (0..8)
            .map(|i| format!("test bench_{i} ... bench: {i} ns/iter"))
            .collect();
        let publisher = SlowPublisher::default();
        let pipeline = Pipeline::new(
            config().with_concurrency(2),
            Box::new(publisher.clone()),
        )
        .unwrap();

        let summary = pipeline.run(&Report::from_lines(lines)).await;
        assert_eq!(summary.published, 8);
        assert_eq!(publisher.in_flight.lock().unwrap().1, 2);
    }

    #[tokio::test]
    async fn test_from_config_dry_run_skips_network() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"test a_bench ... bench: 10 ns/iter\n").unwrap();

        let mut config = config()
            .with_report_path(file.path())
            .with_ingestion_url("http://127.0.0.1:1/unused");
        config.dry_run = true;

        let pipeline = Pipeline::from_config(config).unwrap();
        let summary = pipeline.run_file().await.unwrap();
        assert_eq!(summary.published, 1);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let result = Pipeline::from_config(ReporterConfig::default());
        assert!(matches!(result, Err(ReporterError::Config(_))));
    }

    #[tokio::test]
    async fn test_custom_marker_and_layout() {
        let publisher = RecordingPublisher::default();
        let config = config()
            .with_marker("BENCH")
            .with_fields(FieldLayout::new(1, 3));
        let pipeline = Pipeline::new(config, Box::new(publisher.clone())).unwrap();

        let report = Report::from_lines(["parse_json BENCH 812", "test a b c d e"]);
        let summary = pipeline.run(&report).await;
        assert_eq!(summary.matched, 1);
        assert_eq!(
            publisher.bodies(),
            vec!["benchmark{project=\"myproj\",metric=\"parse_json\"} 812".to_string()]
        );
    }

    #[tokio::test]
    async fn test_writes_filtered_copy() {
        let dir = tempfile::tempdir().unwrap();
        let filtered = dir.path().join("output.txt.filtered");
        let mut config = config();
        config.filtered_output = Some(filtered.clone());

        let pipeline = Pipeline::new(config, Box::new(RecordingPublisher::default())).unwrap();
        let report = Report::from_lines(["noise", "x test a 1 2", "more noise", "y test b 3 4"]);
        pipeline.run(&report).await;

        let written = std::fs::read_to_string(&filtered).unwrap();
        assert_eq!(written, "x test a 1 2\ny test b 3 4\n");
    }

    #[tokio::test]
    async fn test_run_file_missing_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = config().with_report_path(dir.path().join("output.txt"));
        let pipeline = Pipeline::new(config, Box::new(RecordingPublisher::default())).unwrap();

        let err = pipeline.run_file().await.unwrap_err();
        assert!(matches!(err, ReporterError::InputNotFound { .. }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Pipeline::new(
            ReporterConfig::default(),
            Box::new(RecordingPublisher::default()),
        );
        assert!(matches!(result, Err(ReporterError::Config(_))));
    }
}
