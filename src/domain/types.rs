//! Shared domain types.
//!
//! These types are intentionally kept small and serializable so they can be:
//!
//! - keyed into the cache
//! - emitted directly as the JSON response records
//! - parsed from CLI flags (closed enums reject unknown values at the boundary)

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Supported sovereign issuers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Country {
    Us,
    De,
    Gb,
    It,
    Jp,
}

impl Country {
    pub const ALL: [Country; 5] = [Country::Us, Country::De, Country::Gb, Country::It, Country::Jp];

    pub fn code(self) -> &'static str {
        match self {
            Country::Us => "US",
            Country::De => "DE",
            Country::Gb => "GB",
            Country::It => "IT",
            Country::Jp => "JP",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Country::Us => "United States",
            Country::De => "Germany",
            Country::Gb => "United Kingdom",
            Country::It => "Italy",
            Country::Jp => "Japan",
        }
    }
}

/// Which query type is being answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Yield,
    Cds,
}

impl DataKind {
    pub const ALL: [DataKind; 2] = [DataKind::Yield, DataKind::Cds];

    pub fn as_str(self) -> &'static str {
        match self {
            DataKind::Yield => "yield",
            DataKind::Cds => "cds",
        }
    }
}

/// How far back the caller wants to look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum Horizon {
    #[serde(rename = "today")]
    #[value(name = "today")]
    Today,
    #[serde(rename = "1w")]
    #[value(name = "1w")]
    OneWeek,
    #[serde(rename = "1m")]
    #[value(name = "1m")]
    OneMonth,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::Today, Horizon::OneWeek, Horizon::OneMonth];

    /// Minimum age (calendar days) of a qualifying observation.
    pub fn min_age_days(self) -> i64 {
        match self {
            Horizon::Today => 0,
            Horizon::OneWeek => 7,
            Horizon::OneMonth => 30,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Horizon::Today => "today",
            Horizon::OneWeek => "1w",
            Horizon::OneMonth => "1m",
        }
    }
}

/// Yield curve maturity bucket.
///
/// The declaration order is the canonical output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tenor {
    M1,
    M3,
    M6,
    Y1,
    Y2,
    Y3,
    Y5,
    Y7,
    Y10,
    Y20,
    Y30,
}

impl Tenor {
    pub const ALL: [Tenor; 11] = [
        Tenor::M1,
        Tenor::M3,
        Tenor::M6,
        Tenor::Y1,
        Tenor::Y2,
        Tenor::Y3,
        Tenor::Y5,
        Tenor::Y7,
        Tenor::Y10,
        Tenor::Y20,
        Tenor::Y30,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Tenor::M1 => "1M",
            Tenor::M3 => "3M",
            Tenor::M6 => "6M",
            Tenor::Y1 => "1Y",
            Tenor::Y2 => "2Y",
            Tenor::Y3 => "3Y",
            Tenor::Y5 => "5Y",
            Tenor::Y7 => "7Y",
            Tenor::Y10 => "10Y",
            Tenor::Y20 => "20Y",
            Tenor::Y30 => "30Y",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One rate slot per tenor; `None` means "not extracted".
///
/// Serializes as a JSON object with every tenor key present, in enumeration
/// order, so positional consumers can rely on the key set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TenorRates([Option<f64>; 11]);

impl TenorRates {
    pub fn get(&self, tenor: Tenor) -> Option<f64> {
        self.0[tenor.index()]
    }

    pub fn set(&mut self, tenor: Tenor, value: Option<f64>) {
        self.0[tenor.index()] = value;
    }

    /// Number of tenors with a value.
    pub fn filled(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tenor, Option<f64>)> + '_ {
        Tenor::ALL.iter().map(|&t| (t, self.get(t)))
    }
}

impl FromIterator<(Tenor, f64)> for TenorRates {
    fn from_iter<I: IntoIterator<Item = (Tenor, f64)>>(iter: I) -> Self {
        let mut rates = TenorRates::default();
        for (tenor, value) in iter {
            rates.set(tenor, Some(value));
        }
        rates
    }
}

impl Serialize for TenorRates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Tenor::ALL.len()))?;
        for (tenor, value) in self.iter() {
            map.serialize_entry(tenor.code(), &value)?;
        }
        map.end()
    }
}

/// How the payload of a record was obtained in this exact call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Cache,
    Demo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldCurve {
    #[serde(rename = "asOf")]
    pub as_of: NaiveDate,
    pub country: Country,
    pub tenors: TenorRates,
    #[serde(rename = "src")]
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CdsQuote {
    #[serde(rename = "asOf")]
    pub as_of: NaiveDate,
    pub country: Country,
    pub cds5y_bps: Option<f64>,
    #[serde(rename = "src")]
    pub provenance: Provenance,
}

/// The response record for either query type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Quote {
    Yield(YieldCurve),
    Cds(CdsQuote),
}

impl Quote {
    pub fn as_of(&self) -> NaiveDate {
        match self {
            Quote::Yield(c) => c.as_of,
            Quote::Cds(q) => q.as_of,
        }
    }

    pub fn provenance(&self) -> Provenance {
        match self {
            Quote::Yield(c) => c.provenance,
            Quote::Cds(q) => q.provenance,
        }
    }

    /// Same payload, relabeled with how it was obtained this time.
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        match &mut self {
            Quote::Yield(c) => c.provenance = provenance,
            Quote::Cds(q) => q.provenance = provenance,
        }
        self
    }
}

/// A validated request for the core pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    pub kind: DataKind,
    pub country: Country,
    pub horizon: Horizon,
}

impl QueryKey {
    pub fn new(kind: DataKind, country: Country, horizon: Horizon) -> Self {
        Self { kind, country, horizon }
    }

    /// Every supported (type, country, horizon) triple.
    pub fn all() -> Vec<QueryKey> {
        let mut out = Vec::with_capacity(DataKind::ALL.len() * Country::ALL.len() * Horizon::ALL.len());
        for kind in DataKind::ALL {
            for country in Country::ALL {
                for horizon in Horizon::ALL {
                    out.push(QueryKey::new(kind, country, horizon));
                }
            }
        }
        out
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.kind.as_str(), self.country.code(), self.horizon.as_str())
    }
}

/// A dated value from a time-series source.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation<T> {
    pub date: NaiveDate,
    pub value: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenor_rates_serialize_every_key_in_order() {
        let rates: TenorRates = [(Tenor::Y10, 4.55), (Tenor::M1, 5.1)].into_iter().collect();
        let json = serde_json::to_string(&rates).unwrap();
        assert_eq!(
            json,
            r#"{"1M":5.1,"3M":null,"6M":null,"1Y":null,"2Y":null,"3Y":null,"5Y":null,"7Y":null,"10Y":4.55,"20Y":null,"30Y":null}"#
        );
        assert_eq!(rates.filled(), 2);
    }

    #[test]
    fn cds_record_uses_wire_names() {
        let quote = Quote::Cds(CdsQuote {
            as_of: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            country: Country::It,
            cds5y_bps: Some(61.2),
            provenance: Provenance::Live,
        });
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["asOf"], "2025-03-04");
        assert_eq!(json["country"], "IT");
        assert_eq!(json["cds5y_bps"], 61.2);
        assert_eq!(json["src"], "live");
    }

    #[test]
    fn query_key_space_is_thirty() {
        let keys = QueryKey::all();
        assert_eq!(keys.len(), 30);
        assert_eq!(keys[0].to_string(), "yield/US/today");
    }

    #[test]
    fn relabel_keeps_payload() {
        let quote = Quote::Cds(CdsQuote {
            as_of: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            country: Country::De,
            cds5y_bps: Some(10.0),
            provenance: Provenance::Live,
        });
        let cached = quote.clone().with_provenance(Provenance::Cache);
        assert_eq!(cached.provenance(), Provenance::Cache);
        assert_eq!(cached.with_provenance(Provenance::Live), quote);
    }
}
