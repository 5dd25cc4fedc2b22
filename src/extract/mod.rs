//! Tolerant extractors.
//!
//! Upstream pages change shape without notice, so nothing here validates a
//! schema. Every extractor is a best-effort search that either yields a value
//! or `NotFound`; malformed input is just another way of not finding anything.
//!
//! Strategy order per label (first hit wins):
//! 1. structural proximity over tag-stripped text (`proximity`)
//! 2. table row adjacency over the parsed DOM (`table`)
//! 3. embedded `[label, value]` literals in inline scripts (`literal`)

use scraper::Html;

use crate::domain::{Tenor, TenorRates};

pub mod csv_series;
pub mod labels;
pub mod literal;
pub mod number;
pub mod proximity;
pub mod table;

pub use number::Unit;

/// The value was not present (or not recognizable) in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFound;

impl std::fmt::Display for NotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("not found")
    }
}

impl std::error::Error for NotFound {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Proximity,
    RowAdjacency,
    EmbeddedLiteral,
}

impl Strategy {
    pub const ORDER: [Strategy; 3] = [Strategy::Proximity, Strategy::RowAdjacency, Strategy::EmbeddedLiteral];
}

/// A fetched document prepared once for all strategies.
pub struct Document<'a> {
    raw: &'a str,
    text: String,
    html: Html,
}

impl<'a> Document<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            text: proximity::strip_tags(raw),
            html: Html::parse_document(raw),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}

/// Run a single strategy.
///
/// `stops` are sibling labels that bound the proximity window (empty for a
/// lone label such as a country name).
pub fn extract_value_with(
    doc: &Document<'_>,
    labels: &[&str],
    stops: &[&str],
    unit: Unit,
    strategy: Strategy,
) -> Result<f64, NotFound> {
    match strategy {
        Strategy::Proximity => proximity::by_proximity(&doc.text, labels, stops, unit),
        Strategy::RowAdjacency => table::by_row_adjacency(&doc.html, labels, unit),
        Strategy::EmbeddedLiteral => literal::by_embedded_literal(doc.raw, labels, unit),
    }
}

/// Try every strategy in priority order.
pub fn extract_value(doc: &Document<'_>, labels: &[&str], stops: &[&str], unit: Unit) -> Result<f64, NotFound> {
    Strategy::ORDER
        .into_iter()
        .find_map(|s| extract_value_with(doc, labels, stops, unit, s).ok())
        .ok_or(NotFound)
}

/// Extract every enumerated tenor; misses stay `None`.
pub fn extract_tenors(doc: &Document<'_>) -> TenorRates {
    let mut rates = TenorRates::default();
    for tenor in Tenor::ALL {
        let value = extract_value(doc, labels::tenor_labels(tenor), &labels::ALL_TENOR_LABELS, Unit::Percent);
        rates.set(tenor, value.ok());
    }
    rates
}
