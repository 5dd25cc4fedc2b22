//! Strategy 3: `[label, value]` pairs embedded in inline script data.

use std::sync::LazyLock;

use regex::Regex;

use super::NotFound;
use super::labels::is_label;
use super::number::{Unit, parse_number};

static PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\[\s*["']([^"'\[\]]{1,40})["']\s*,\s*["']?\s*([-+]?\d+(?:[.,]\d+)*)\s*(?:%|bps|bp)?\s*["']?\s*\]"#,
    )
    .expect("valid regex")
});

/// All `(label, value)` pairs found in array literals, in document order.
pub fn pairs(document: &str) -> Vec<(String, f64)> {
    PAIR.captures_iter(document)
        .filter_map(|caps| {
            let label = caps.get(1)?.as_str().trim().to_string();
            let value = parse_number(caps.get(2)?.as_str())?;
            Some((label, value))
        })
        .collect()
}

/// Value of the first pair whose label is exactly one of `labels`.
pub fn by_embedded_literal(document: &str, labels: &[&str], unit: Unit) -> Result<f64, NotFound> {
    pairs(document)
        .into_iter()
        .find(|(label, value)| is_label(label, labels) && unit.plausible(*value))
        .map(|(_, value)| value)
        .ok_or(NotFound)
}
