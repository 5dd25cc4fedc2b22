//! Tolerant numeric parsing and unit-marked token search.

use std::sync::LazyLock;

use regex::Regex;

/// Unit marker that must follow a numeric token for it to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// `%`, used by yield quotes.
    Percent,
    /// `bp` / `bps`, used by CDS spreads.
    BasisPoints,
}

impl Unit {
    /// Reject values no sovereign quote in this unit could take.
    ///
    /// Tolerant scanning happily picks up page furniture ("100%" widths,
    /// "-99%" changes); those are skipped rather than trusted.
    pub fn plausible(self, value: f64) -> bool {
        match self {
            Unit::Percent => (-5.0..=40.0).contains(&value),
            Unit::BasisPoints => (0.0..=5000.0).contains(&value),
        }
    }
}

static PERCENT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([-+\x{2212}]?\d+(?:[.,]\d+)*)\s*%").expect("valid regex"));

static BPS_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([-+\x{2212}]?\d+(?:[.,]\d+)*)\s*(?:bps|bp|basis points)\b").expect("valid regex")
});

static BARE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+\x{2212}]?\d+(?:[.,]\d+)*").expect("valid regex"));

/// Parse a numeric token written with either `.` or `,` as decimal separator.
///
/// When both separators appear, the last one is the decimal mark and the
/// other is a thousands separator (`1.234,5` and `1,234.5` both give 1234.5).
/// A single separator is always read as decimal; repeated identical
/// separators are read as thousands grouping.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_start_matches('+').replace('\u{2212}', "-");
    if trimmed.is_empty() {
        return None;
    }

    let last_dot = trimmed.rfind('.');
    let last_comma = trimmed.rfind(',');
    let normalized = match (last_dot, last_comma) {
        (Some(d), Some(c)) if d > c => trimmed.replace(',', ""),
        (Some(_), Some(_)) => trimmed.replace('.', "").replace(',', "."),
        (None, Some(_)) if trimmed.matches(',').count() == 1 => trimmed.replace(',', "."),
        (None, Some(_)) => trimmed.replace(',', ""),
        (Some(_), None) if trimmed.matches('.').count() > 1 => trimmed.replace('.', ""),
        _ => trimmed,
    };

    let v = normalized.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// First plausible numeric token immediately followed by `unit`.
pub fn find_unit_number(text: &str, unit: Unit) -> Option<f64> {
    let re = match unit {
        Unit::Percent => &*PERCENT_TOKEN,
        Unit::BasisPoints => &*BPS_TOKEN,
    };
    re.captures_iter(text)
        .filter_map(|caps| parse_number(caps.get(1)?.as_str()))
        .find(|v| unit.plausible(*v))
}

/// First plausible numeric token, unit or not.
///
/// Only used where the column itself has already been identified.
pub fn find_bare_number(text: &str, unit: Unit) -> Option<f64> {
    BARE_TOKEN
        .find_iter(text)
        .filter_map(|m| parse_number(m.as_str()))
        .find(|v| unit.plausible(*v))
}
