//! Label spelling tables and a case-insensitive, word-bounded label finder.

use std::sync::LazyLock;

use crate::domain::{Country, Tenor};

/// Surface spellings seen for each tenor across English and German sources.
pub fn tenor_labels(tenor: Tenor) -> &'static [&'static str] {
    match tenor {
        Tenor::M1 => &["1M", "1 Month", "1-Month", "1 Mo", "1 Monat"],
        Tenor::M3 => &["3M", "3 Months", "3 Month", "3-Month", "3 Mo", "3 Monate"],
        Tenor::M6 => &["6M", "6 Months", "6 Month", "6-Month", "6 Mo", "6 Monate"],
        Tenor::Y1 => &["1Y", "1 Year", "1-Year", "1 Yr", "1 Jahr"],
        Tenor::Y2 => &["2Y", "2 Years", "2 Year", "2-Year", "2 Yr", "2 Jahre"],
        Tenor::Y3 => &["3Y", "3 Years", "3 Year", "3-Year", "3 Yr", "3 Jahre"],
        Tenor::Y5 => &["5Y", "5 Years", "5 Year", "5-Year", "5 Yr", "5 Jahre"],
        Tenor::Y7 => &["7Y", "7 Years", "7 Year", "7-Year", "7 Yr", "7 Jahre"],
        Tenor::Y10 => &["10Y", "10 Years", "10 Year", "10-Year", "10 Yr", "10 Jahre"],
        Tenor::Y20 => &["20Y", "20 Years", "20 Year", "20-Year", "20 Yr", "20 Jahre"],
        Tenor::Y30 => &["30Y", "30 Years", "30 Year", "30-Year", "30 Yr", "30 Jahre"],
    }
}

/// Every tenor spelling; a label's search window never runs past one of these.
pub static ALL_TENOR_LABELS: LazyLock<Vec<&'static str>> =
    LazyLock::new(|| Tenor::ALL.into_iter().flat_map(|t| tenor_labels(t).iter().copied()).collect());

/// Labels that identify the 5-year point on a CDS page or column header.
pub const CDS_5Y_LABELS: &[&str] = &["5Y CDS", "CDS 5Y", "5 Years CDS", "5Y", "5 Years", "5 Year", "5-Year", "5 Jahre"];

/// Names a country goes by in cross-country CDS tables.
///
/// Matching is case-insensitive, so no spelling may double as a common word
/// ("US" would match "contact us").
pub fn country_labels(country: Country) -> &'static [&'static str] {
    match country {
        Country::Us => &["United States", "USA", "U.S."],
        Country::De => &["Germany", "Deutschland"],
        Country::Gb => &["United Kingdom", "Great Britain", "UK"],
        Country::It => &["Italy", "Italia"],
        Country::Jp => &["Japan"],
    }
}

/// Byte offsets just past every word-bounded, case-insensitive occurrence of `label`.
///
/// A match must not be glued to an ASCII letter or digit on either side, so
/// `1Y` does not fire inside `11Y` and `1 Year` does not fire inside `1 Years`.
pub fn label_ends(haystack: &str, label: &str) -> Vec<usize> {
    let hay = haystack.as_bytes();
    let needle = label.to_ascii_lowercase();
    let needle = needle.as_bytes();
    if needle.is_empty() || needle.len() > hay.len() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for start in 0..=hay.len() - needle.len() {
        let end = start + needle.len();
        let window_matches = hay[start..end]
            .iter()
            .zip(needle)
            .all(|(h, n)| h.to_ascii_lowercase() == *n);
        if !window_matches {
            continue;
        }
        let glued_before = start > 0 && hay[start - 1].is_ascii_alphanumeric();
        let glued_after = end < hay.len() && hay[end].is_ascii_alphanumeric();
        if !glued_before && !glued_after && haystack.is_char_boundary(end) {
            out.push(end);
        }
    }
    out
}

/// Byte offset of the first bounded occurrence of any of `labels` in `text`.
pub fn first_label_start(text: &str, labels: &[&str]) -> Option<usize> {
    labels
        .iter()
        .filter_map(|l| label_ends(text, l).first().map(|end| end - l.len()))
        .min()
}

/// Whether `text`, ignoring trailing whitespace, ends with one of `labels`.
pub fn ends_with_label(text: &str, labels: &[&str]) -> bool {
    let text = text.trim_end();
    labels
        .iter()
        .any(|l| label_ends(text, l).last() == Some(&text.len()))
}

/// Whether `text` contains any of `labels` as a bounded match.
pub fn contains_label(text: &str, labels: &[&str]) -> bool {
    labels.iter().any(|l| !label_ends(text, l).is_empty())
}

/// Whether `text`, after trimming, is exactly one of `labels` (case-insensitive).
pub fn is_label(text: &str, labels: &[&str]) -> bool {
    let text = text.trim();
    labels.iter().any(|l| l.eq_ignore_ascii_case(text))
}

/// Map a column header to the tenor it names, if any.
pub fn tenor_for_header(header: &str) -> Option<Tenor> {
    Tenor::ALL
        .into_iter()
        .find(|&t| is_label(header, tenor_labels(t)))
}
