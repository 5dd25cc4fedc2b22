//! Static fallback values served when every live provider fails.
//!
//! Plausible, fixed, and never fetched. Always tagged `demo`.

use chrono::NaiveDate;

use crate::domain::{CdsQuote, Country, DataKind, Provenance, Quote, Tenor, TenorRates, YieldCurve};

/// Rates in `Tenor::ALL` order (percent).
fn demo_curve(country: Country) -> [f64; 11] {
    match country {
        Country::Us => [5.30, 5.35, 5.25, 5.00, 4.60, 4.40, 4.25, 4.25, 4.30, 4.55, 4.45],
        Country::De => [3.60, 3.55, 3.40, 3.10, 2.70, 2.55, 2.45, 2.50, 2.55, 2.75, 2.80],
        Country::Gb => [5.20, 5.15, 5.00, 4.70, 4.30, 4.15, 4.05, 4.10, 4.15, 4.50, 4.60],
        Country::It => [3.70, 3.65, 3.50, 3.30, 3.05, 3.10, 3.30, 3.55, 3.80, 4.25, 4.40],
        Country::Jp => [-0.05, 0.05, 0.10, 0.15, 0.30, 0.35, 0.50, 0.70, 0.95, 1.60, 1.95],
    }
}

/// 5Y CDS spread (bp).
fn demo_cds(country: Country) -> f64 {
    match country {
        Country::Us => 38.0,
        Country::De => 12.5,
        Country::Gb => 22.0,
        Country::It => 78.0,
        Country::Jp => 20.0,
    }
}

pub fn demo_quote(kind: DataKind, country: Country, as_of: NaiveDate) -> Quote {
    match kind {
        DataKind::Yield => Quote::Yield(YieldCurve {
            as_of,
            country,
            tenors: demo_rates(country),
            provenance: Provenance::Demo,
        }),
        DataKind::Cds => Quote::Cds(CdsQuote {
            as_of,
            country,
            cds5y_bps: Some(demo_cds(country)),
            provenance: Provenance::Demo,
        }),
    }
}

/// The demo curve alone, for callers that only want the rates.
pub fn demo_rates(country: Country) -> TenorRates {
    Tenor::ALL.into_iter().zip(demo_curve(country)).collect()
}
