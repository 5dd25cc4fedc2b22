//! Provider chain: try each configured source in order until one is trusted.
//!
//! Per (type, country) the chain moves `Pending -> TryingProvider(i) ->
//! {Success | TryingProvider(i+1) | AllFailed}`. A fetch failure or an
//! untrusted extraction only advances `i`. Results are never merged across
//! providers: each one is judged on its own output.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::data::{DocumentFetcher, ProviderKind, ProviderSpec};
use crate::domain::{CdsQuote, Country, Horizon, Provenance, QueryKey, Quote, TenorRates, YieldCurve};
use crate::extract::labels::{CDS_5Y_LABELS, country_labels};
use crate::extract::{Document, Unit, csv_series, extract_tenors, extract_value, table};
use crate::horizon::select_observation;

/// Minimum number of tenors a yield curve must have to be trusted.
pub const MIN_TRUSTED_TENORS: usize = 4;

#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Yield trust threshold; never below `MIN_TRUSTED_TENORS`.
    pub min_tenors: usize,
    /// Upper bound for a single fetch.
    pub fetch_timeout: Duration,
    /// Total wall-clock budget for one chain run.
    pub budget: Duration,
}

impl ChainConfig {
    pub fn min_tenors(&self) -> usize {
        self.min_tenors.max(MIN_TRUSTED_TENORS)
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            min_tenors: MIN_TRUSTED_TENORS,
            fetch_timeout: Duration::from_secs(10),
            budget: Duration::from_secs(25),
        }
    }
}

/// Outcome of one provider step. Consumed immediately by the loop.
#[derive(Debug, Clone)]
pub struct ProviderResult {
    pub ok: bool,
    pub payload: Option<Quote>,
    pub diagnostics: Vec<String>,
}

impl ProviderResult {
    fn rejected(diagnostics: Vec<String>) -> Self {
        Self {
            ok: false,
            payload: None,
            diagnostics,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Accepted,
    /// Document fetched but the extraction failed the trust predicate.
    Untrusted,
    FetchFailed,
    /// Not tried: the chain's time budget ran out first.
    SkippedBudget,
}

#[derive(Debug, Clone)]
pub struct ProviderAttempt {
    pub provider: &'static str,
    pub outcome: AttemptOutcome,
    pub notes: Vec<String>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct ChainDiagnostics {
    pub attempts: Vec<ProviderAttempt>,
}

impl ChainDiagnostics {
    pub fn accepted(&self) -> Option<&ProviderAttempt> {
        self.attempts.iter().find(|a| a.outcome == AttemptOutcome::Accepted)
    }
}

#[derive(Debug, Clone)]
pub struct ChainOutcome {
    /// `None` means `AllFailed`: the caller substitutes the demo fallback.
    pub quote: Option<Quote>,
    pub diagnostics: ChainDiagnostics,
}

pub struct ProviderChain<'a, F: DocumentFetcher + ?Sized> {
    fetcher: &'a F,
    config: &'a ChainConfig,
}

impl<'a, F: DocumentFetcher + ?Sized> ProviderChain<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a ChainConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn run(&self, key: QueryKey, providers: &[ProviderSpec], today: NaiveDate) -> ChainOutcome {
        let started = Instant::now();
        let mut diagnostics = ChainDiagnostics::default();

        for spec in providers {
            let remaining = self.config.budget.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                debug!(%key, provider = spec.name, "chain budget exhausted, skipping");
                diagnostics.attempts.push(ProviderAttempt {
                    provider: spec.name,
                    outcome: AttemptOutcome::SkippedBudget,
                    notes: Vec::new(),
                    elapsed: Duration::ZERO,
                });
                continue;
            }

            let step_started = Instant::now();
            let timeout = self.config.fetch_timeout.min(remaining);
            let body = match self.fetcher.fetch(&spec.url, timeout) {
                Ok(body) => body,
                Err(e) => {
                    debug!(%key, provider = spec.name, error = %e, "fetch failed");
                    diagnostics.attempts.push(ProviderAttempt {
                        provider: spec.name,
                        outcome: AttemptOutcome::FetchFailed,
                        notes: vec![e.to_string()],
                        elapsed: step_started.elapsed(),
                    });
                    continue;
                }
            };

            let result = evaluate(spec, &body, key, today, self.config.min_tenors());
            let elapsed = step_started.elapsed();
            if result.ok {
                info!(%key, provider = spec.name, "live data accepted");
                diagnostics.attempts.push(ProviderAttempt {
                    provider: spec.name,
                    outcome: AttemptOutcome::Accepted,
                    notes: result.diagnostics,
                    elapsed,
                });
                return ChainOutcome {
                    quote: result.payload,
                    diagnostics,
                };
            }

            debug!(%key, provider = spec.name, notes = ?result.diagnostics, "extraction not trusted");
            diagnostics.attempts.push(ProviderAttempt {
                provider: spec.name,
                outcome: AttemptOutcome::Untrusted,
                notes: result.diagnostics,
                elapsed,
            });
        }

        warn!(%key, tried = diagnostics.attempts.len(), "all providers failed");
        ChainOutcome {
            quote: None,
            diagnostics,
        }
    }
}

/// Extract from one fetched document and apply the trust predicate.
///
/// Pure: no I/O, no clock. `today` stamps single-snapshot sources.
pub fn evaluate(spec: &ProviderSpec, body: &str, key: QueryKey, today: NaiveDate, min_tenors: usize) -> ProviderResult {
    match &spec.kind {
        ProviderKind::TenorPage => {
            let doc = Document::parse(body);
            let mut result = judge_curve(key.country, today, extract_tenors(&doc), min_tenors);
            if key.horizon != Horizon::Today {
                // Snapshot pages carry no history; the horizon degrades to latest.
                result
                    .diagnostics
                    .push(format!("no history for horizon {}, using latest", key.horizon.as_str()));
            }
            result
        }
        ProviderKind::TenorCsv { date_column } => {
            let Ok(series) = csv_series::parse_tenor_series(body, date_column) else {
                return ProviderResult::rejected(vec!["no readable series".to_string()]);
            };
            let Some(obs) = select_observation(&series, key.horizon) else {
                return ProviderResult::rejected(vec!["empty series".to_string()]);
            };
            let mut result = judge_curve(key.country, obs.date, obs.value, min_tenors);
            result
                .diagnostics
                .push(format!("observation {} of {} rows", obs.date, series.len()));
            result
        }
        ProviderKind::CdsTable => {
            let doc = Document::parse(body);
            let labels = country_labels(key.country);
            // Other countries' names end a row's proximity window.
            let stops: Vec<&str> = Country::ALL
                .into_iter()
                .flat_map(|c| country_labels(c).iter().copied())
                .collect();
            let value = table::by_header_column(doc.html(), labels, CDS_5Y_LABELS, Unit::BasisPoints)
                .or_else(|_| extract_value(&doc, labels, &stops, Unit::BasisPoints));
            judge_cds(key.country, today, value.ok())
        }
        ProviderKind::CdsPage => {
            let doc = Document::parse(body);
            judge_cds(key.country, today, extract_value(&doc, CDS_5Y_LABELS, &[], Unit::BasisPoints).ok())
        }
    }
}

fn judge_curve(country: Country, as_of: NaiveDate, tenors: TenorRates, min_tenors: usize) -> ProviderResult {
    let filled = tenors.filled();
    let diagnostics = vec![format!("{filled} tenors extracted (need {min_tenors})")];
    if filled < min_tenors {
        return ProviderResult::rejected(diagnostics);
    }
    ProviderResult {
        ok: true,
        payload: Some(Quote::Yield(YieldCurve {
            as_of,
            country,
            tenors,
            provenance: Provenance::Live,
        })),
        diagnostics,
    }
}

fn judge_cds(country: Country, as_of: NaiveDate, value: Option<f64>) -> ProviderResult {
    let Some(bps) = value else {
        return ProviderResult::rejected(vec!["5Y spread not found".to_string()]);
    };
    ProviderResult {
        ok: true,
        payload: Some(Quote::Cds(CdsQuote {
            as_of,
            country,
            cds5y_bps: Some(bps),
            provenance: Provenance::Live,
        })),
        diagnostics: vec![format!("5Y spread {bps} bp")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fetch::testing::StaticFetcher;
    use crate::domain::{DataKind, Tenor};
    use crate::error::FetchError;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn page(name: &'static str) -> ProviderSpec {
        ProviderSpec {
            name,
            url: format!("https://{name}.test/"),
            kind: ProviderKind::TenorPage,
        }
    }

    fn curve_html(tenors: &[(&str, f64)]) -> String {
        let rows: String = tenors
            .iter()
            .map(|(label, v)| format!("<tr><td>{label}</td><td>{v}%</td></tr>"))
            .collect();
        format!("<html><body><table>{rows}</table></body></html>")
    }

    fn key(kind: DataKind, horizon: Horizon) -> QueryKey {
        QueryKey::new(kind, Country::De, horizon)
    }

    #[test]
    fn three_tenors_are_rejected_four_accepted() {
        let spec = page("a");
        let k = key(DataKind::Yield, Horizon::Today);

        let three = curve_html(&[("2Y", 2.1), ("5Y", 2.3), ("10Y", 2.6)]);
        let r = evaluate(&spec, &three, k, today(), 4);
        assert!(!r.ok);
        assert!(r.payload.is_none());

        let four = curve_html(&[("2Y", 2.1), ("5Y", 2.3), ("10Y", 2.6), ("30Y", 2.9)]);
        let r = evaluate(&spec, &four, k, today(), 4);
        assert!(r.ok);
        let Some(Quote::Yield(curve)) = r.payload else {
            panic!("expected a curve");
        };
        assert_eq!(curve.tenors.get(Tenor::Y30), Some(2.9));
        assert_eq!(curve.tenors.get(Tenor::M1), None);
        assert_eq!(curve.provenance, Provenance::Live);
    }

    #[test]
    fn threshold_is_never_below_four() {
        let config = ChainConfig {
            min_tenors: 1,
            ..ChainConfig::default()
        };
        assert_eq!(config.min_tenors(), MIN_TRUSTED_TENORS);
    }

    #[test]
    fn falls_through_failed_and_untrusted_providers() {
        let providers = vec![page("down"), page("thin"), page("good"), page("never")];
        let fetcher = StaticFetcher::new()
            .with_error("https://down.test/", FetchError::Status { status: 503 })
            .with_body("https://thin.test/", curve_html(&[("10Y", 2.6)]))
            .with_body(
                "https://good.test/",
                curve_html(&[("1Y", 2.4), ("2Y", 2.1), ("5Y", 2.3), ("10Y", 2.6)]),
            );
        let config = ChainConfig::default();
        let outcome = ProviderChain::new(&fetcher, &config).run(key(DataKind::Yield, Horizon::Today), &providers, today());

        let Some(Quote::Yield(curve)) = outcome.quote else {
            panic!("expected live curve");
        };
        // Only the winning provider's values, nothing merged from "thin".
        assert_eq!(curve.tenors.filled(), 4);
        assert_eq!(curve.as_of, today());

        let outcomes: Vec<_> = outcome.diagnostics.attempts.iter().map(|a| a.outcome).collect();
        assert_eq!(
            outcomes,
            vec![AttemptOutcome::FetchFailed, AttemptOutcome::Untrusted, AttemptOutcome::Accepted]
        );
        assert_eq!(outcome.diagnostics.accepted().unwrap().provider, "good");
        assert_eq!(fetcher.calls(), 3);
    }

    #[test]
    fn partial_results_are_not_merged() {
        let providers = vec![page("a"), page("b")];
        let fetcher = StaticFetcher::new()
            .with_body("https://a.test/", curve_html(&[("1Y", 2.4), ("2Y", 2.1)]))
            .with_body("https://b.test/", curve_html(&[("5Y", 2.3), ("10Y", 2.6)]));
        let config = ChainConfig::default();
        let outcome = ProviderChain::new(&fetcher, &config).run(key(DataKind::Yield, Horizon::Today), &providers, today());
        assert!(outcome.quote.is_none());
        assert_eq!(outcome.diagnostics.attempts.len(), 2);
    }

    #[test]
    fn zero_budget_skips_everything() {
        let providers = vec![page("a")];
        let fetcher = StaticFetcher::new();
        let config = ChainConfig {
            budget: Duration::ZERO,
            ..ChainConfig::default()
        };
        let outcome = ProviderChain::new(&fetcher, &config).run(key(DataKind::Yield, Horizon::Today), &providers, today());
        assert!(outcome.quote.is_none());
        assert_eq!(outcome.diagnostics.attempts[0].outcome, AttemptOutcome::SkippedBudget);
        assert_eq!(fetcher.calls(), 0);
    }

    #[test]
    fn csv_provider_resolves_horizon() {
        let spec = ProviderSpec {
            name: "csv",
            url: "https://csv.test/".to_string(),
            kind: ProviderKind::TenorCsv { date_column: "Date" },
        };
        let body = "Date,1 Yr,2 Yr,5 Yr,10 Yr\n\
            2025-03-14,4.0,4.0,4.1,4.3\n\
            2025-03-07,3.9,3.9,4.0,4.2\n\
            2025-02-10,3.8,3.8,3.9,4.1\n";
        let k = QueryKey::new(DataKind::Yield, Country::Us, Horizon::OneMonth);
        let r = evaluate(&spec, body, k, today(), 4);
        let Some(Quote::Yield(curve)) = r.payload else {
            panic!("expected a curve");
        };
        assert_eq!(curve.as_of, NaiveDate::from_ymd_opt(2025, 2, 10).unwrap());
        assert_eq!(curve.tenors.get(Tenor::Y10), Some(4.1));

        let k = QueryKey::new(DataKind::Yield, Country::Us, Horizon::OneWeek);
        let Some(Quote::Yield(curve)) = evaluate(&spec, body, k, today(), 4).payload else {
            panic!("expected a curve");
        };
        assert_eq!(curve.as_of, NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
    }

    #[test]
    fn cds_table_and_page() {
        let table = ProviderSpec {
            name: "t",
            url: "https://t.test/".to_string(),
            kind: ProviderKind::CdsTable,
        };
        let html = "<table><tr><th>Country</th><th>1Y CDS</th><th>5Y CDS</th></tr>\
            <tr><td>Germany</td><td>4.0</td><td>11.9</td></tr></table>";
        let k = key(DataKind::Cds, Horizon::Today);
        let Some(Quote::Cds(q)) = evaluate(&table, html, k, today(), 4).payload else {
            panic!("expected a quote");
        };
        assert_eq!(q.cds5y_bps, Some(11.9));

        let page = ProviderSpec {
            name: "p",
            url: "https://p.test/".to_string(),
            kind: ProviderKind::CdsPage,
        };
        let r = evaluate(&page, "<h1>Germany 5 Years CDS</h1><span>12,4 bps</span>", k, today(), 4);
        assert!(r.ok);
        let r = evaluate(&page, "<h1>Germany</h1><span>maintenance</span>", k, today(), 4);
        assert!(!r.ok);
    }

    #[test]
    fn cds_list_without_header_stays_within_the_country() {
        let table = ProviderSpec {
            name: "t",
            url: "https://t.test/".to_string(),
            kind: ProviderKind::CdsTable,
        };
        let list = "<ul><li>Japan</li><li>Italy 61.8 bp</li><li>Contact us: 15 bp minimum</li></ul>";
        let jp = QueryKey::new(DataKind::Cds, Country::Jp, Horizon::Today);
        assert!(!evaluate(&table, list, jp, today(), 4).ok);
        let us = QueryKey::new(DataKind::Cds, Country::Us, Horizon::Today);
        assert!(!evaluate(&table, list, us, today(), 4).ok);
        let it = QueryKey::new(DataKind::Cds, Country::It, Horizon::Today);
        let Some(Quote::Cds(q)) = evaluate(&table, list, it, today(), 4).payload else {
            panic!("expected a quote");
        };
        assert_eq!(q.cds5y_bps, Some(61.8));
    }
}
