//! Yearly engagement totals and their growth rates.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use stargaze_data::RepositoryTimeSeriesRecord;

/// Engagement of repositories created in one year.
///
/// Growth rates are percentage changes from the previous year present in
/// the data. They are `None` for the first year and when the previous
/// total was zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyEngagement {
    /// Creation year.
    pub year: i32,
    /// Sum of stars.
    pub stars: u64,
    /// Sum of forks.
    pub forks: u64,
    /// Sum of watchers.
    pub watchers: u64,
    /// Stars growth over the previous year, in percent.
    pub stars_growth: Option<f64>,
    /// Forks growth over the previous year, in percent.
    pub forks_growth: Option<f64>,
    /// Watchers growth over the previous year, in percent.
    pub watchers_growth: Option<f64>,
}

/// Percentage change from `previous` to `current`.
///
/// # Examples
///
/// ```
/// use stargaze_metrics::engagement::growth_rate;
///
/// assert_eq!(growth_rate(100, 150), Some(50.0));
/// assert_eq!(growth_rate(0, 10), None);
/// ```
pub fn growth_rate(previous: u64, current: u64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    Some((current as f64 - previous as f64) / previous as f64 * 100.0)
}

/// Sum stars, forks and watchers per creation year, oldest first.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use stargaze_data::RepositoryTimeSeriesRecord;
/// use stargaze_metrics::engagement::engagement_by_year;
///
/// let record = RepositoryTimeSeriesRecord {
///     name: "a".into(),
///     created_at: Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).unwrap(),
///     stars_count: 10,
///     forks_count: 2,
///     watchers: 1,
///     pull_requests: 0,
///     commit_count: 0,
///     languages_used: vec![],
/// };
/// let years = engagement_by_year(&[record]);
/// assert_eq!(years[0].year, 2019);
/// assert_eq!(years[0].stars_growth, None);
/// ```
pub fn engagement_by_year(records: &[RepositoryTimeSeriesRecord]) -> Vec<YearlyEngagement> {
    let mut sums: BTreeMap<i32, (u64, u64, u64)> = BTreeMap::new();
    for record in records {
        let entry = sums.entry(record.created_at.year()).or_default();
        entry.0 += record.stars_count;
        entry.1 += record.forks_count;
        entry.2 += record.watchers;
    }

    let mut out: Vec<YearlyEngagement> = Vec::with_capacity(sums.len());
    for (year, (stars, forks, watchers)) in sums {
        let previous = out.last();
        let row = YearlyEngagement {
            year,
            stars,
            forks,
            watchers,
            stars_growth: previous.and_then(|p| growth_rate(p.stars, stars)),
            forks_growth: previous.and_then(|p| growth_rate(p.forks, forks)),
            watchers_growth: previous.and_then(|p| growth_rate(p.watchers, watchers)),
        };
        out.push(row);
    }
    out
}
