//! Strategy 1: the first unit-marked number shortly after a label.
//!
//! The window after a label is cut at the next label of the same family, so a
//! label with no value of its own never borrows its neighbour's.

use super::NotFound;
use super::labels::{ends_with_label, first_label_start, label_ends};
use super::number::{Unit, find_unit_number};

/// How far past a label occurrence (in bytes of tag-stripped text) we look.
pub const WINDOW: usize = 96;

/// Replace markup with spaces and decode the handful of entities that matter
/// for numbers and units.
///
/// Script bodies are kept: inline JSON often carries exactly the pairs we want.
pub fn strip_tags(document: &str) -> String {
    let mut out = String::with_capacity(document.len());
    let mut in_tag = false;
    for ch in document.chars() {
        match ch {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            _ => out.push(ch),
        }
    }
    out.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&#37;", "%")
        .replace("&percnt;", "%")
        .replace("&minus;", "-")
}

/// Scan a bounded window after each occurrence of each label, in label order.
///
/// `stops` are sibling labels (the other tenors, for a curve): the window ends
/// at the first of them, and an occurrence that directly follows one of them
/// is skipped, since a run of labels is a header whose values sit elsewhere.
pub fn by_proximity(text: &str, labels: &[&str], stops: &[&str], unit: Unit) -> Result<f64, NotFound> {
    for label in labels {
        for end in label_ends(text, label) {
            let start = end - label.len();
            if ends_with_label(&text[..start], stops) {
                continue;
            }
            let mut window = &text[end..floor_boundary(text, end + WINDOW)];
            if let Some(cut) = first_label_start(window, stops) {
                window = &window[..cut];
            }
            if let Some(v) = find_unit_number(window, unit) {
                return Ok(v);
            }
        }
    }
    Err(NotFound)
}

fn floor_boundary(text: &str, mut idx: usize) -> usize {
    if idx >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup_and_entities() {
        let text = strip_tags("<td class=\"x\">10Y</td><td>4.55&nbsp;&#37;</td>");
        assert!(text.contains("10Y"));
        assert!(text.contains("4.55 %"));
        assert!(!text.contains("class"));
    }

    use crate::extract::labels::ALL_TENOR_LABELS;

    #[test]
    fn takes_value_after_label_within_window() {
        let text = "Germany 10 Jahre Rendite 2,61 % | 30 Jahre 2,95 %";
        assert_eq!(by_proximity(text, &["10Y", "10 Jahre"], &ALL_TENOR_LABELS, Unit::Percent), Ok(2.61));
        assert_eq!(by_proximity(text, &["30 Jahre"], &ALL_TENOR_LABELS, Unit::Percent), Ok(2.95));
    }

    #[test]
    fn window_stops_at_the_next_label() {
        let text = strip_tags(
            "<tr><td>1M</td><td>n/a</td></tr><tr><td>3M</td><td>3.55%</td></tr>\
             <tr><td>6M</td><td>-</td></tr><tr><td>1Y</td><td>3.40%</td></tr>",
        );
        assert_eq!(by_proximity(&text, &["1M"], &ALL_TENOR_LABELS, Unit::Percent), Err(NotFound));
        assert_eq!(by_proximity(&text, &["3M"], &ALL_TENOR_LABELS, Unit::Percent), Ok(3.55));
        assert_eq!(by_proximity(&text, &["6M"], &ALL_TENOR_LABELS, Unit::Percent), Err(NotFound));
        assert_eq!(by_proximity(&text, &["1Y"], &ALL_TENOR_LABELS, Unit::Percent), Ok(3.40));
        // Without stops the first label reaches into its neighbour.
        assert_eq!(by_proximity(&text, &["1M"], &[], Unit::Percent), Ok(3.55));
    }

    #[test]
    fn labels_in_a_header_run_are_skipped() {
        let text = "1Y 2Y 5Y 10Y 2.10% 2.20% 2.30% 2.40%";
        for label in ["1Y", "2Y", "5Y", "10Y"] {
            assert_eq!(by_proximity(text, &[label], &ALL_TENOR_LABELS, Unit::Percent), Err(NotFound));
        }
    }

    #[test]
    fn value_beyond_window_is_not_found() {
        let filler = "x".repeat(WINDOW + 10);
        let text = format!("10Y {filler} 4.1%");
        assert_eq!(by_proximity(&text, &["10Y"], &[], Unit::Percent), Err(NotFound));
    }

    #[test]
    fn window_never_splits_a_character() {
        let text = format!("10Y {}", "é".repeat(WINDOW));
        assert_eq!(by_proximity(&text, &["10Y"], &[], Unit::Percent), Err(NotFound));
    }
}
