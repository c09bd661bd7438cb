//! Marker-based line filter

/// Marker token selecting benchmark result lines
pub const DEFAULT_MARKER: &str = "test";

/// Lazily select the lines containing `marker`, preserving order.
///
/// Lines are passed through untouched. An empty marker matches every line.
pub fn filter_lines<'a, I>(lines: I, marker: &'a str) -> impl Iterator<Item = &'a str> + 'a
where
    I: IntoIterator<Item = &'a str> + 'a,
    I::IntoIter: 'a,
{
    lines.into_iter().filter(move |line| line.contains(marker))
}
