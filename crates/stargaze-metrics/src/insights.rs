//! Popularity rankings and scatter series.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stargaze_data::{RepositoryCounts, RepositoryRecord, RepositoryTimeSeriesRecord};

/// One point of a scatter plot, labelled with its repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPoint {
    /// Repository name.
    pub label: String,
    /// Horizontal value.
    pub x: u64,
    /// Vertical value.
    pub y: u64,
}

/// A repository and a single count, for bar charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRepository {
    /// Repository name.
    pub name: String,
    /// The ranked value.
    pub value: u64,
}

/// The `n` repositories with the most stars, most starred first.
///
/// Equal star counts keep their input order.
///
/// # Examples
///
/// ```
/// use stargaze_data::RepositoryRecord;
/// use stargaze_metrics::insights::top_by_stars;
///
/// let rows: Vec<_> = [5u64, 50, 20]
///     .iter()
///     .enumerate()
///     .map(|(i, &stars)| {
///         let mut r = RepositoryRecord::named(format!("r{i}"));
///         r.stars_count = stars;
///         r
///     })
///     .collect();
/// let top = top_by_stars(&rows, 2);
/// assert_eq!(top[0].name, "r1");
/// assert_eq!(top.len(), 2);
/// ```
pub fn top_by_stars<R: RepositoryCounts>(records: &[R], n: usize) -> Vec<RankedRepository> {
    let mut ranked: Vec<&R> = records.iter().collect();
    ranked.sort_by(|a, b| b.stars().cmp(&a.stars()));
    ranked
        .into_iter()
        .take(n)
        .map(|r| RankedRepository {
            name: r.name().to_string(),
            value: r.stars(),
        })
        .collect()
}

/// Stars (x) against forks (y) for every aggregate row.
pub fn stars_vs_forks(records: &[RepositoryRecord]) -> Vec<ScatterPoint> {
    records
        .iter()
        .map(|r| ScatterPoint {
            label: r.name.clone(),
            x: r.stars_count,
            y: r.forks_count,
        })
        .collect()
}

/// Stars (x) against pull requests (y) for every aggregate row.
pub fn stars_vs_pull_requests(records: &[RepositoryRecord]) -> Vec<ScatterPoint> {
    records
        .iter()
        .map(|r| ScatterPoint {
            label: r.name.clone(),
            x: r.stars_count,
            y: r.pull_requests,
        })
        .collect()
}

/// Largest watcher count per repository name, ordered by name.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use stargaze_data::RepositoryTimeSeriesRecord;
/// use stargaze_metrics::insights::watchers_by_repository;
///
/// let make = |name: &str, watchers: u64| RepositoryTimeSeriesRecord {
///     name: name.into(),
///     created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
///     stars_count: 0,
///     forks_count: 0,
///     watchers,
///     pull_requests: 0,
///     commit_count: 0,
///     languages_used: vec![],
/// };
/// let rows = vec![make("b", 1), make("a", 3), make("a", 9)];
/// let watchers = watchers_by_repository(&rows);
/// assert_eq!(watchers[0].name, "a");
/// assert_eq!(watchers[0].value, 9);
/// ```
pub fn watchers_by_repository(records: &[RepositoryTimeSeriesRecord]) -> Vec<RankedRepository> {
    let mut max: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        let entry = max.entry(record.name.as_str()).or_insert(0);
        *entry = (*entry).max(record.watchers);
    }
    max.into_iter()
        .map(|(name, value)| RankedRepository {
            name: name.to_string(),
            value,
        })
        .collect()
}
