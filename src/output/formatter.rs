//! Output formatters for run summaries
//!
//! Provides table, JSON and one-line summary formats.

use crate::models::RunSummary;

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Run summary formatter
pub struct SummaryFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl SummaryFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format a run summary
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
            OutputFormat::Summary => self.format_summary_brief(summary),
        }
    }

    fn format_summary_table(&self, summary: &RunSummary) -> String {
        let mut output = String::new();

        output.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
        output.push_str(&format!("║  Benchmark report - {:40} ║\n", summary.project));
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");
        output.push_str(&format!("║  Report:     {:47} ║\n", summary.report));
        output.push_str(&format!(
            "║  Lines:      {:6} total | {:6} matched                   ║\n",
            summary.total_lines, summary.matched
        ));

        let published = self.paint(summary.published.to_string(), "32", true);
        let skipped = self.paint(summary.skipped.to_string(), "33", summary.skipped > 0);
        let failed = self.paint(summary.failed.to_string(), "31", summary.failed > 0);

        output.push_str(&format!(
            "║  Published: {published:>6} | Skipped: {skipped:>6} | Failed: {failed:>6}        ║\n"
        ));
        output.push_str(&format!(
            "║  Success Rate: {:5.1}% | Duration: {:6}ms                   ║\n",
            summary.success_rate(),
            summary.duration_ms
        ));

        if !summary.failures.is_empty() {
            output.push_str("╠══════════════════════════════════════════════════════════════╣\n");
            for failure in &summary.failures {
                let status = failure
                    .status
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string());
                output.push_str(&format!(
                    "║  ✗ {} [{}] {}\n",
                    failure.metric, status, failure.error
                ));
            }
        }

        output.push_str("╚══════════════════════════════════════════════════════════════╝\n");

        output
    }

    fn format_summary_brief(&self, summary: &RunSummary) -> String {
        format!(
            "{}: {} ({} lines, {}ms)",
            summary.project, summary, summary.total_lines, summary.duration_ms
        )
    }

    fn paint(&self, text: String, color: &str, enabled: bool) -> String {
        if self.colorize && enabled {
            format!("\x1b[{color}m{text}\x1b[0m")
        } else {
            text
        }
    }
}
