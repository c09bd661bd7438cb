//! Benchmark line parser
//!
//! Splits a filtered report line into whitespace-delimited fields and picks
//! the benchmark name and result by fixed position. The column convention
//! belongs to the upstream benchmark tool's output format, so every field
//! index lives in [`FieldLayout`] and nowhere else.
//!
//! With the default layout, `x test name_x 3 456 y` has the fields
//! `[x, test, name_x, 3, 456, y]` and parses to name `test`, result `456`.

use serde::{Deserialize, Serialize};

use crate::error::{ReporterError, Result};
use crate::models::BenchmarkLine;

/// 1-indexed field holding the benchmark name
pub const NAME_FIELD: usize = 2;

/// 1-indexed field holding the benchmark result
pub const RESULT_FIELD: usize = 5;

/// Positions of the name and result columns (1-indexed)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLayout {
    pub name_field: usize,
    pub result_field: usize,
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self {
            name_field: NAME_FIELD,
            result_field: RESULT_FIELD,
        }
    }
}

impl FieldLayout {
    pub fn new(name_field: usize, result_field: usize) -> Self {
        Self {
            name_field,
            result_field,
        }
    }

    /// Minimum number of fields a line needs
    pub fn required_fields(&self) -> usize {
        self.name_field.max(self.result_field)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name_field == 0 || self.result_field == 0 {
            return Err(ReporterError::Config(
                "field positions are 1-indexed and must be at least 1".to_string(),
            ));
        }
        if self.name_field == self.result_field {
            return Err(ReporterError::Config(format!(
                "name and result fields must differ (both {})",
                self.name_field
            )));
        }
        Ok(())
    }
}

/// Split a line on runs of whitespace
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Extract name and result from a benchmark line, verbatim.
///
/// Names are expected to contain no whitespace; a name with spaces shifts
/// every later column.
pub fn parse_line(line: &str, layout: &FieldLayout) -> Result<BenchmarkLine> {
    let fields = tokenize(line);
    let field = |position: usize| position.checked_sub(1).and_then(|i| fields.get(i));

    match (field(layout.name_field), field(layout.result_field)) {
        (Some(name), Some(result)) => Ok(BenchmarkLine::new(*name, *result)),
        _ => Err(ReporterError::MalformedLine {
            line: line.to_string(),
            found: fields.len(),
            required: layout.required_fields(),
        }),
    }
}
