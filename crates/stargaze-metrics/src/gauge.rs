//! Gauge readings for a single selected repository.

use serde::{Deserialize, Serialize};
use stargaze_data::RepositoryTimeSeriesRecord;

use crate::derive::{derive_repository_metrics, DerivedRepositoryMetrics};

/// One gauge: a value and the global maximum that bounds its axis.
///
/// # Examples
///
/// ```
/// use stargaze_metrics::gauge::GaugeReading;
///
/// let g = GaugeReading { title: "Popularity".into(), value: 5.0, max: 20.0 };
/// assert_eq!(g.fraction(), 0.25);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeReading {
    /// Display title.
    pub title: String,
    /// The selected repository's value.
    pub value: f64,
    /// Maximum of this metric across all repositories.
    pub max: f64,
}

impl GaugeReading {
    /// `value / max`, clamped to `[0, 1]`; zero when `max` is zero.
    pub fn fraction(&self) -> f64 {
        if self.max > 0.0 {
            (self.value / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// The four repository insight gauges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeSet {
    /// Selected repository name.
    pub repository: String,
    /// Distinct languages used.
    pub language_diversity: GaugeReading,
    /// Pull requests per commit.
    pub issue_resolution_efficiency: GaugeReading,
    /// Mean of stars, forks and watchers.
    pub popularity_index: GaugeReading,
    /// Mean of forks and pull requests.
    pub community_involvement: GaugeReading,
}

impl GaugeSet {
    /// The gauges in display order.
    pub fn readings(&self) -> [&GaugeReading; 4] {
        [
            &self.language_diversity,
            &self.issue_resolution_efficiency,
            &self.popularity_index,
            &self.community_involvement,
        ]
    }
}

/// Look up the gauges for repository `name`.
///
/// Returns `None` when no record has that name; callers render nothing in
/// that case. When several rows share the name, the first one is used.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use stargaze_data::RepositoryTimeSeriesRecord;
/// use stargaze_metrics::gauge::select_gauges;
///
/// let record = RepositoryTimeSeriesRecord {
///     name: "a".into(),
///     created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
///     stars_count: 3,
///     forks_count: 3,
///     watchers: 3,
///     pull_requests: 1,
///     commit_count: 0,
///     languages_used: vec!["Go".into(), "Rust".into(), "Go".into()],
/// };
/// let gauges = select_gauges(&[record], "a").unwrap();
/// assert_eq!(gauges.language_diversity.value, 2.0);
/// assert!(select_gauges(&[], "a").is_none());
/// ```
pub fn select_gauges(records: &[RepositoryTimeSeriesRecord], name: &str) -> Option<GaugeSet> {
    let index = records.iter().position(|r| r.name == name)?;
    let selected = &records[index];
    let derived = derive_repository_metrics(records);
    let metrics = &derived[index];

    let max_of = |metric: fn(&DerivedRepositoryMetrics) -> f64| {
        derived.iter().map(metric).fold(0.0f64, f64::max)
    };
    let max_diversity = records
        .iter()
        .map(RepositoryTimeSeriesRecord::language_diversity)
        .max()
        .unwrap_or(0);
    let max_efficiency = max_of(|m| m.issue_resolution_efficiency);
    let max_popularity = max_of(|m| m.popularity_index);
    let max_involvement = max_of(|m| m.community_involvement);

    Some(GaugeSet {
        repository: selected.name.clone(),
        language_diversity: GaugeReading {
            title: "Language Diversity Index".into(),
            value: selected.language_diversity() as f64,
            max: max_diversity as f64,
        },
        issue_resolution_efficiency: GaugeReading {
            title: "Issue Resolution Efficiency".into(),
            value: metrics.issue_resolution_efficiency,
            max: max_efficiency,
        },
        popularity_index: GaugeReading {
            title: "Repository Popularity Index".into(),
            value: metrics.popularity_index,
            max: max_popularity,
        },
        community_involvement: GaugeReading {
            title: "Community Involvement Indicator".into(),
            value: metrics.community_involvement,
            max: max_involvement,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(name: &str, stars: u64, pulls: u64, commits: u64, langs: &[&str]) -> RepositoryTimeSeriesRecord {
        RepositoryTimeSeriesRecord {
            name: name.into(),
            created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            stars_count: stars,
            forks_count: 0,
            watchers: 0,
            pull_requests: pulls,
            commit_count: commits,
            languages_used: langs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn values_and_maxima() {
        let records = vec![
            record("small", 3, 1, 0, &["Go", "Rust", "Go"]),
            record("big", 30, 2, 9, &["C", "C++", "Python", "Go"]),
        ];
        let gauges = select_gauges(&records, "small").unwrap();
        assert_eq!(gauges.repository, "small");
        assert_eq!(gauges.language_diversity.value, 2.0);
        assert_eq!(gauges.language_diversity.max, 4.0);
        assert_eq!(gauges.issue_resolution_efficiency.value, 1.0);
        assert_eq!(gauges.issue_resolution_efficiency.max, 1.0);
        assert_eq!(gauges.popularity_index.value, 1.0);
        assert_eq!(gauges.popularity_index.max, 10.0);
        assert_eq!(gauges.community_involvement.value, 0.5);
        assert_eq!(gauges.community_involvement.max, 1.0);
    }

    #[test]
    fn unknown_repository_renders_nothing() {
        let records = vec![record("a", 1, 1, 1, &[])];
        assert!(select_gauges(&records, "b").is_none());
    }

    #[test]
    fn duplicate_names_use_first_row() {
        let records = vec![record("dup", 6, 0, 0, &[]), record("dup", 60, 0, 0, &[])];
        let gauges = select_gauges(&records, "dup").unwrap();
        assert_eq!(gauges.popularity_index.value, 2.0);
        assert_eq!(gauges.popularity_index.max, 20.0);
    }

    #[test]
    fn fraction_handles_zero_max() {
        let reading = GaugeReading {
            title: "t".into(),
            value: 0.0,
            max: 0.0,
        };
        assert_eq!(reading.fraction(), 0.0);
    }

    #[test]
    fn readings_are_in_display_order() {
        let records = vec![record("a", 1, 1, 1, &["Go"])];
        let gauges = select_gauges(&records, "a").unwrap();
        let titles: Vec<_> = gauges.readings().iter().map(|g| g.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Language Diversity Index",
                "Issue Resolution Efficiency",
                "Repository Popularity Index",
                "Community Involvement Indicator"
            ]
        );
    }
}
