//! Per-country provider chains, as data.
//!
//! Adding a source means adding a `ProviderSpec` to the right list; the chain
//! loop in `crate::chain` never branches on country or source.

use chrono::{Datelike, NaiveDate};

use crate::domain::{Country, DataKind};

/// How a provider's document is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    /// HTML page quoting a whole curve; tenors found by label.
    TenorPage,
    /// Wide CSV time series with one column per tenor.
    TenorCsv { date_column: &'static str },
    /// Cross-country CDS table; the 5Y column is located by its header.
    CdsTable,
    /// Single-country CDS page quoting the 5Y spread next to a label.
    CdsPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSpec {
    pub name: &'static str,
    pub url: String,
    pub kind: ProviderKind,
}

impl ProviderSpec {
    fn new(name: &'static str, url: impl Into<String>, kind: ProviderKind) -> Self {
        Self {
            name,
            url: url.into(),
            kind,
        }
    }
}

const WGB_SOVEREIGN_CDS: &str = "https://www.worldgovernmentbonds.com/sovereign-cds/";

/// Ordered provider list for a (type, country) pair; earlier entries win.
pub fn providers_for(kind: DataKind, country: Country, today: NaiveDate) -> Vec<ProviderSpec> {
    match kind {
        DataKind::Yield => yield_providers(country, today),
        DataKind::Cds => cds_providers(country),
    }
}

fn yield_providers(country: Country, today: NaiveDate) -> Vec<ProviderSpec> {
    let mut out = Vec::new();
    match country {
        Country::Us => out.push(ProviderSpec::new(
            "us-treasury-csv",
            treasury_csv_url(today.year()),
            ProviderKind::TenorCsv { date_column: "Date" },
        )),
        Country::De => out.push(ProviderSpec::new(
            "boerse-frankfurt",
            "https://www.boerse-frankfurt.de/anleihen/renditen-bundesanleihen",
            ProviderKind::TenorPage,
        )),
        Country::Gb | Country::It | Country::Jp => {}
    }
    out.push(ProviderSpec::new(
        "worldgovernmentbonds",
        format!("https://www.worldgovernmentbonds.com/country/{}/", wgb_slug(country)),
        ProviderKind::TenorPage,
    ));
    out.push(ProviderSpec::new(
        "investing",
        format!("https://www.investing.com/rates-bonds/{}-government-bonds", investing_slug(country)),
        ProviderKind::TenorPage,
    ));
    out
}

fn cds_providers(country: Country) -> Vec<ProviderSpec> {
    vec![
        ProviderSpec::new("worldgovernmentbonds-cds-table", WGB_SOVEREIGN_CDS, ProviderKind::CdsTable),
        ProviderSpec::new(
            "worldgovernmentbonds-cds-page",
            format!(
                "https://www.worldgovernmentbonds.com/cds-historical-data/{}/5-years/",
                wgb_slug(country)
            ),
            ProviderKind::CdsPage,
        ),
        ProviderSpec::new(
            "investing-cds",
            format!("https://www.investing.com/rates-bonds/{}-cds-5-years-usd", investing_slug(country)),
            ProviderKind::CdsPage,
        ),
    ]
}

/// Daily par yield curve CSV for a calendar year.
fn treasury_csv_url(year: i32) -> String {
    format!(
        "https://home.treasury.gov/resource-center/data-chart-center/interest-rates/daily-treasury-rates.csv/{year}/all?type=daily_treasury_yield_curve&field_tdr_date_value={year}&page&_format=csv"
    )
}

fn wgb_slug(country: Country) -> &'static str {
    match country {
        Country::Us => "united-states",
        Country::De => "germany",
        Country::Gb => "united-kingdom",
        Country::It => "italy",
        Country::Jp => "japan",
    }
}

fn investing_slug(country: Country) -> &'static str {
    match country {
        Country::Us => "usa",
        Country::De => "germany",
        Country::Gb => "uk",
        Country::It => "italy",
        Country::Jp => "japan",
    }
}
