//! Benchmark report input
//!
//! Loads a report file and exposes the line filter and line parser that
//! turn it into benchmark records.

mod filter;
mod parser;

pub use filter::{filter_lines, DEFAULT_MARKER};
pub use parser::{parse_line, tokenize, FieldLayout, NAME_FIELD, RESULT_FIELD};

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{ReporterError, Result};

/// Ordered lines of benchmark output
#[derive(Clone, Debug, Default)]
pub struct Report {
    source: Option<PathBuf>,
    lines: Vec<String>,
}

impl Report {
    /// Read a report file; invalid UTF-8 is replaced, not rejected
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ReporterError::InputNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        let content = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = content {
            warn!(
                "{} is not valid UTF-8; invalid bytes were replaced",
                path.display()
            );
        }

        let mut report = Self::from_text(&content);
        report.source = Some(path.to_path_buf());
        Ok(report)
    }

    /// Build a report from in-memory text
    pub fn from_text(text: &str) -> Self {
        Self {
            source: None,
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: None,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Label used in summaries and logs
    pub fn display_name(&self) -> String {
        self.source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string())
    }

    /// Lines containing the marker, in report order
    pub fn matching<'a>(&'a self, marker: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        filter_lines(self.lines.iter().map(String::as_str), marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_report() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "running 2 tests").unwrap();
        writeln!(file, "x test name_x 3 456 y").unwrap();
        file.flush().unwrap();

        let report = Report::load(file.path()).unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report.source(), Some(file.path()));
        assert_eq!(report.matching("test").count(), 2);
    }

    #[test]
    fn test_load_report_with_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"progress \xff\xfe 50%\n").unwrap();
        file.write_all(b"test name_x ... bench: 456 ns/iter\n").unwrap();
        file.flush().unwrap();

        let report = Report::load(file.path()).unwrap();
        assert_eq!(report.len(), 2);
        assert!(report.lines()[0].contains('\u{FFFD}'));
        assert_eq!(
            report.matching("test").collect::<Vec<_>>(),
            vec!["test name_x ... bench: 456 ns/iter"]
        );
    }

    #[test]
    fn test_load_missing_report() {
        let dir = tempfile::tempdir().unwrap();
        let err = Report::load(dir.path().join("output.txt")).unwrap_err();
        assert!(matches!(err, ReporterError::InputNotFound { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_from_text() {
        let report = Report::from_text("a\nb\r\nc");
        assert_eq!(report.lines(), &["a", "b", "c"]);
        assert_eq!(report.display_name(), "<memory>");
        assert!(Report::from_text("").is_empty());
    }
}
