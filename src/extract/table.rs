//! Strategy 2: row adjacency inside HTML tables.
//!
//! Two flavours:
//! - `by_row_adjacency`: find the row whose cell carries the label, then take the
//!   first unit-marked number among the cells that follow it.
//! - `by_header_column`: for cross-country tables, locate the wanted column by
//!   matching the parsed header row, then read that column in the labelled row.

use scraper::{ElementRef, Html, Selector};

use super::NotFound;
use super::labels::contains_label;
use super::number::{Unit, find_bare_number, find_unit_number};

fn selector(css: &str) -> Selector {
    // Only called with the literal selectors below.
    Selector::parse(css).expect("valid selector")
}

fn cell_texts(row: ElementRef<'_>, cells: &Selector) -> Vec<String> {
    row.select(cells)
        .map(|cell| cell.text().collect::<Vec<_>>().join(" "))
        .collect()
}

/// Scan sibling cells to the right of the labelled cell.
///
/// When the labelled row carries no value at all it is a header row, and the
/// value is read from the same column of the row below.
pub fn by_row_adjacency(html: &Html, labels: &[&str], unit: Unit) -> Result<f64, NotFound> {
    let tables = selector("table");
    let rows = selector("tr");
    let cells = selector("th, td");

    for table in html.select(&tables) {
        let table_rows: Vec<Vec<String>> = table.select(&rows).map(|row| cell_texts(row, &cells)).collect();
        for (i, texts) in table_rows.iter().enumerate() {
            let Some(label_idx) = texts.iter().position(|t| contains_label(t, labels)) else {
                continue;
            };
            if let Some(v) = texts[label_idx + 1..]
                .iter()
                .find_map(|t| find_unit_number(t, unit))
            {
                return Ok(v);
            }
            let header_like = texts.iter().all(|t| find_unit_number(t, unit).is_none());
            if let Some(v) = table_rows
                .get(i + 1)
                .filter(|_| header_like)
                .and_then(|below| below.get(label_idx))
                .and_then(|t| find_unit_number(t, unit))
            {
                return Ok(v);
            }
        }
    }
    Err(NotFound)
}

/// Read the column whose header matches `column_labels` in the row labelled
/// with `row_labels`.
///
/// The header is the first row of each table (usually the `<thead>` row).
/// Column positions are taken verbatim; `colspan` is not expanded.
pub fn by_header_column(
    html: &Html,
    row_labels: &[&str],
    column_labels: &[&str],
    unit: Unit,
) -> Result<f64, NotFound> {
    let tables = selector("table");
    let rows = selector("tr");
    let cells = selector("th, td");

    for table in html.select(&tables) {
        let mut table_rows = table.select(&rows);
        let Some(header) = table_rows.next() else {
            continue;
        };
        let header_texts = cell_texts(header, &cells);
        let Some(col) = column_labels
            .iter()
            .find_map(|label| header_texts.iter().position(|h| contains_label(h, &[*label])))
        else {
            continue;
        };

        for row in table_rows {
            let texts = cell_texts(row, &cells);
            let labelled = texts
                .iter()
                .take(col)
                .any(|t| contains_label(t, row_labels));
            if !labelled {
                continue;
            }
            // The header already names the unit, so a bare number is enough.
            if let Some(v) = texts.get(col).and_then(|t| find_bare_number(t, unit)) {
                return Ok(v);
            }
        }
    }
    Err(NotFound)
}
