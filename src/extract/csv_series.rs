//! Wide tenor CSV (one date column plus one column per tenor) into a series.
//!
//! Rows are best-effort: a row with an unreadable date or no readable tenor is
//! skipped, not an error. The result is sorted oldest first.

use std::collections::HashMap;

use chrono::NaiveDate;
use csv::StringRecord;

use super::NotFound;
use super::labels::tenor_for_header;
use super::number::{Unit, parse_number};
use crate::domain::{Observation, Tenor, TenorRates};

const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];

pub fn parse_tenor_series(body: &str, date_column: &str) -> Result<Vec<Observation<TenorRates>>, NotFound> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader.headers().map_err(|_| NotFound)?.clone();
    let header_map = build_header_map(&headers);
    let date_idx = *header_map
        .get(&normalize_header_name(date_column))
        .ok_or(NotFound)?;

    let tenor_columns: Vec<(Tenor, usize)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, name)| tenor_for_header(&normalize_header_name(name)).map(|t| (t, idx)))
        .collect();
    if tenor_columns.is_empty() {
        return Err(NotFound);
    }

    let mut series = Vec::new();
    for record in reader.records().flatten() {
        let Some(date) = record.get(date_idx).and_then(parse_date) else {
            continue;
        };
        let rates: TenorRates = tenor_columns
            .iter()
            .filter_map(|&(tenor, idx)| {
                let v = parse_number(record.get(idx)?)?;
                Unit::Percent.plausible(v).then_some((tenor, v))
            })
            .collect();
        if rates.filled() > 0 {
            series.push(Observation { date, value: rates });
        }
    }

    if series.is_empty() {
        return Err(NotFound);
    }
    series.sort_by_key(|o| o.date);
    Ok(series)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often put a BOM in front of the first header.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREASURY: &str = "\u{feff}Date,\"1 Mo\",\"2 Mo\",\"3 Mo\",\"6 Mo\",\"1 Yr\",\"2 Yr\",\"5 Yr\",\"10 Yr\",\"30 Yr\"\n\
        03/14/2025,4.34,4.33,4.33,4.26,4.09,4.02,4.09,4.31,4.62\n\
        03/13/2025,4.35,4.34,4.34,4.27,4.06,3.95,4.04,4.27,4.59\n\
        bad-date,1,1,1,1,1,1,1,1,1\n\
        03/12/2025,4.36,,4.33,4.28,4.10,4.00,4.10,4.32,4.64\n";

    #[test]
    fn parses_and_sorts_oldest_first() {
        let series = parse_tenor_series(TREASURY, "Date").unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2025, 3, 12).unwrap());
        assert_eq!(series[2].date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());

        let latest = &series[2].value;
        assert_eq!(latest.get(Tenor::Y10), Some(4.31));
        assert_eq!(latest.get(Tenor::M1), Some(4.34));
        // "2 Mo" is not a tenor we emit; 3Y/7Y/20Y are absent from the file.
        assert_eq!(latest.get(Tenor::Y3), None);
        assert_eq!(latest.filled(), 8);
    }

    #[test]
    fn missing_date_column_is_not_found() {
        assert_eq!(parse_tenor_series(TREASURY, "Effective Date"), Err(NotFound));
        assert_eq!(parse_tenor_series("", "Date"), Err(NotFound));
        assert_eq!(parse_tenor_series("Date,Foo\n2025-01-01,1\n", "Date"), Err(NotFound));
    }
}
