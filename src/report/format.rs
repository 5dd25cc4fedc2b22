//! Fixed-width terminal output.
//!
//! Lines are right-trimmed so snapshots stay stable regardless of padding.

use std::time::Duration;

use chrono::NaiveDate;

use crate::chain::{AttemptOutcome, ChainDiagnostics};
use crate::data::{ProviderKind, providers_for};
use crate::domain::{Country, DataKind, Horizon, Provenance, QueryKey, Quote, Tenor};

/// One row per yield record, one column per tenor.
pub fn format_yield_table(quotes: &[Quote], horizon: Horizon) -> String {
    let mut out = String::new();
    out.push_str(&format!("Sovereign yields (%), horizon {}\n", horizon.as_str()));

    let mut header = format!("{:<8} {:<10} {:<5}", "country", "asOf", "src");
    let mut rule = format!("{:-<8} {:-<10} {:-<5}", "", "", "");
    for tenor in Tenor::ALL {
        header.push_str(&format!(" {:>6}", tenor.code()));
        rule.push_str(&format!(" {:-<6}", ""));
    }
    push_line(&mut out, &header);
    push_line(&mut out, &rule);

    for quote in quotes {
        let Quote::Yield(curve) = quote else {
            continue;
        };
        let mut line = format!(
            "{:<8} {:<10} {:<5}",
            curve.country.code(),
            curve.as_of,
            src_label(quote)
        );
        for (_, rate) in curve.tenors.iter() {
            line.push_str(&format!(" {:>6}", fmt_opt(rate, 2)));
        }
        push_line(&mut out, &line);
    }

    out
}

pub fn format_cds_table(quotes: &[Quote], horizon: Horizon) -> String {
    let mut out = String::new();
    out.push_str(&format!("Sovereign 5Y CDS (bp), horizon {}\n", horizon.as_str()));
    push_line(
        &mut out,
        &format!("{:<8} {:<16} {:<10} {:<5} {:>8}", "country", "name", "asOf", "src", "5Y"),
    );
    push_line(
        &mut out,
        &format!("{:-<8} {:-<16} {:-<10} {:-<5} {:-<8}", "", "", "", "", ""),
    );

    for quote in quotes {
        let Quote::Cds(cds) = quote else {
            continue;
        };
        push_line(
            &mut out,
            &format!(
                "{:<8} {:<16} {:<10} {:<5} {:>8}",
                cds.country.code(),
                truncate(cds.country.display_name(), 16),
                cds.as_of,
                src_label(quote),
                fmt_opt(cds.cds5y_bps, 1),
            ),
        );
    }

    out
}

/// Provider attempts for one request, in the order they were tried.
pub fn format_diagnostics(key: QueryKey, diagnostics: Option<&ChainDiagnostics>) -> String {
    let mut out = format!("Provider attempts for {key}:\n");
    let Some(diagnostics) = diagnostics else {
        out.push_str("  (chain not run: served from cache or offline)\n");
        return out;
    };

    for attempt in &diagnostics.attempts {
        push_line(
            &mut out,
            &format!(
                "  {:<22} {:<14} {:>7} {}",
                attempt.provider,
                outcome_label(attempt.outcome),
                fmt_elapsed(attempt.elapsed),
                attempt.notes.join("; "),
            ),
        );
    }
    if diagnostics.accepted().is_none() {
        out.push_str("  -> no provider trusted, demo data served\n");
    }
    out
}

/// The configured chain for every (type, country), as of `today`.
pub fn format_providers(today: NaiveDate) -> String {
    let mut out = String::new();
    for kind in DataKind::ALL {
        for country in Country::ALL {
            out.push_str(&format!("{} {}:\n", kind.as_str(), country.code()));
            for (i, spec) in providers_for(kind, country, today).iter().enumerate() {
                push_line(
                    &mut out,
                    &format!("  {}. {:<22} {:<10} {}", i + 1, spec.name, kind_label(&spec.kind), spec.url),
                );
            }
        }
    }
    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn src_label(quote: &Quote) -> &'static str {
    match quote.provenance() {
        Provenance::Live => "live",
        Provenance::Cache => "cache",
        Provenance::Demo => "demo",
    }
}

fn outcome_label(outcome: AttemptOutcome) -> &'static str {
    match outcome {
        AttemptOutcome::Accepted => "accepted",
        AttemptOutcome::Untrusted => "untrusted",
        AttemptOutcome::FetchFailed => "fetch-failed",
        AttemptOutcome::SkippedBudget => "skipped",
    }
}

fn kind_label(kind: &ProviderKind) -> &'static str {
    match kind {
        ProviderKind::TenorPage => "html",
        ProviderKind::TenorCsv { .. } => "csv",
        ProviderKind::CdsTable => "table",
        ProviderKind::CdsPage => "html",
    }
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{v:.decimals$}"),
        None => "-".to_string(),
    }
}

fn fmt_elapsed(d: Duration) -> String {
    format!("{}ms", d.as_millis())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ProviderAttempt;
    use crate::data::demo_quote;

    fn d() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn yield_table_has_every_tenor_column() {
        let quotes = vec![demo_quote(DataKind::Yield, Country::De, d())];
        let table = format_yield_table(&quotes, Horizon::Today);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        for tenor in Tenor::ALL {
            assert!(lines[1].contains(tenor.code()));
        }
        assert!(lines[3].starts_with("DE       2025-03-14 demo"));
        assert!(table.lines().all(|l| l == l.trim_end()));
    }

    #[test]
    fn cds_table_skips_yield_rows_and_marks_missing() {
        let mut cds = demo_quote(DataKind::Cds, Country::Jp, d());
        if let Quote::Cds(q) = &mut cds {
            q.cds5y_bps = None;
        }
        let quotes = vec![demo_quote(DataKind::Yield, Country::Jp, d()), cds.with_provenance(Provenance::Cache)];
        let table = format_cds_table(&quotes, Horizon::OneWeek);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[3].starts_with("JP"));
        assert!(lines[3].contains("cache"));
        assert!(lines[3].ends_with('-'));
    }

    #[test]
    fn diagnostics_list_attempts_and_fallback() {
        let key = QueryKey::new(DataKind::Yield, Country::It, Horizon::Today);
        let diag = ChainDiagnostics {
            attempts: vec![ProviderAttempt {
                provider: "worldgovernmentbonds",
                outcome: AttemptOutcome::Untrusted,
                notes: vec!["3 tenors extracted (need 4)".to_string()],
                elapsed: Duration::from_millis(120),
            }],
        };
        let text = format_diagnostics(key, Some(&diag));
        assert!(text.starts_with("Provider attempts for yield/IT/today:"));
        assert!(text.contains("untrusted"));
        assert!(text.contains("120ms"));
        assert!(text.contains("demo data served"));

        assert!(format_diagnostics(key, None).contains("chain not run"));
    }

    #[test]
    fn providers_listing_covers_every_pair() {
        let text = format_providers(d());
        assert!(text.contains("yield US:\n  1. us-treasury-csv"));
        assert!(text.contains("cds JP:"));
        assert_eq!(text.lines().filter(|l| l.ends_with(':')).count(), 10);
    }
}
