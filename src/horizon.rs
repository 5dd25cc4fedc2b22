//! Horizon resolution over a time series fetched in one go.
//!
//! Rule: `today` is the last observation. For `1w` / `1m`, walk backward from
//! the end and take the first observation at least 7 / 30 calendar days older
//! than the last one. If nothing is old enough, fall back to the last
//! observation: the horizon is best effort, never a hard cutoff.

use crate::domain::{Horizon, Observation};

/// Select the observation for `horizon` from a series ordered oldest first.
///
/// Returns `None` only for an empty series.
pub fn select_observation<T>(series: &[Observation<T>], horizon: Horizon) -> Option<&Observation<T>> {
    let last = series.last()?;
    let min_age = horizon.min_age_days();
    if min_age == 0 {
        return Some(last);
    }

    let qualifying = series
        .iter()
        .rev()
        .find(|o| (last.date - o.date).num_days() >= min_age);
    Some(qualifying.unwrap_or(last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series(d: NaiveDate) -> Vec<Observation<f64>> {
        [(40, 1.0), (20, 1.1), (5, 1.2), (0, 1.3)]
            .into_iter()
            .map(|(back, value)| Observation {
                date: d - Duration::days(back),
                value,
            })
            .collect()
    }

    #[test]
    fn month_horizon_takes_oldest_qualifying_point() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let s = series(d);
        let obs = select_observation(&s, Horizon::OneMonth).unwrap();
        assert_eq!(obs.date, d - Duration::days(40));
        assert_eq!(obs.value, 1.0);
    }

    #[test]
    fn today_is_the_last_point() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let s = series(d);
        let obs = select_observation(&s, Horizon::Today).unwrap();
        assert_eq!((obs.date, obs.value), (d, 1.3));
    }

    #[test]
    fn week_horizon_walks_back_to_first_old_enough_point() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let s = series(d);
        let obs = select_observation(&s, Horizon::OneWeek).unwrap();
        assert_eq!(obs.value, 1.1);
    }

    #[test]
    fn short_history_falls_back_to_latest() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let s: Vec<_> = series(d).into_iter().skip(2).collect();
        let obs = select_observation(&s, Horizon::OneMonth).unwrap();
        assert_eq!(obs.date, d);
        assert!(select_observation::<f64>(&[], Horizon::Today).is_none());
    }

    #[test]
    fn exact_threshold_qualifies() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let s = vec![
            Observation { date: d - Duration::days(7), value: 'a' },
            Observation { date: d, value: 'b' },
        ];
        assert_eq!(select_observation(&s, Horizon::OneWeek).unwrap().value, 'a');
    }
}
