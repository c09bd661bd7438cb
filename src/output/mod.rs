//! Output formatting module
//!
//! Renders the end-of-run summary.

mod formatter;

pub use formatter::{OutputFormat, SummaryFormatter};
