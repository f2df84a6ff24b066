//! Typed rows of the two repository datasets.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read access to the engagement counts shared by both datasets.
///
/// Metric derivation is written against this trait so it works on either
/// table.
pub trait RepositoryCounts {
    /// Repository name.
    fn name(&self) -> &str;
    /// Stars.
    fn stars(&self) -> u64;
    /// Forks.
    fn forks(&self) -> u64;
    /// Watchers.
    fn watchers(&self) -> u64;
    /// Pull requests.
    fn pull_requests(&self) -> u64;
    /// Commits.
    fn commit_count(&self) -> u64;
}

/// One row of the aggregate repository dataset.
///
/// # Examples
///
/// ```
/// use stargaze_data::{RepositoryCounts, RepositoryRecord};
///
/// let record = RepositoryRecord {
///     name: "octocat/hello".into(),
///     language: Some("Rust".into()),
///     stars_count: 10,
///     forks_count: 2,
///     watchers: 3,
///     pull_requests: 4,
///     commit_count: 50,
///     issues_count: 1,
///     contributors: 5,
/// };
/// assert_eq!(record.stars(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRecord {
    /// Repository identifier.
    pub name: String,
    /// Primary language, if recorded.
    pub language: Option<String>,
    /// Stars.
    pub stars_count: u64,
    /// Forks.
    pub forks_count: u64,
    /// Watchers.
    pub watchers: u64,
    /// Pull requests.
    pub pull_requests: u64,
    /// Commits.
    pub commit_count: u64,
    /// Open issues.
    pub issues_count: u64,
    /// Contributors.
    pub contributors: u64,
}

impl RepositoryRecord {
    /// Numeric columns a repository dataset may carry, in display order.
    pub const COUNT_COLUMNS: [&'static str; 7] = [
        "stars_count",
        "forks_count",
        "issues_count",
        "pull_requests",
        "contributors",
        "watchers",
        "commit_count",
    ];

    /// Value of the named count column, or `None` for an unknown name.
    ///
    /// # Examples
    ///
    /// ```
    /// use stargaze_data::RepositoryRecord;
    ///
    /// let mut record = RepositoryRecord::named("demo");
    /// record.forks_count = 7;
    /// assert_eq!(record.count("forks_count"), Some(7));
    /// assert_eq!(record.count("language"), None);
    /// ```
    pub fn count(&self, column: &str) -> Option<u64> {
        match column {
            "stars_count" => Some(self.stars_count),
            "forks_count" => Some(self.forks_count),
            "issues_count" => Some(self.issues_count),
            "pull_requests" => Some(self.pull_requests),
            "contributors" => Some(self.contributors),
            "watchers" => Some(self.watchers),
            "commit_count" => Some(self.commit_count),
            _ => None,
        }
    }

    /// Mutable access to the named count column.
    pub fn count_mut(&mut self, column: &str) -> Option<&mut u64> {
        match column {
            "stars_count" => Some(&mut self.stars_count),
            "forks_count" => Some(&mut self.forks_count),
            "issues_count" => Some(&mut self.issues_count),
            "pull_requests" => Some(&mut self.pull_requests),
            "contributors" => Some(&mut self.contributors),
            "watchers" => Some(&mut self.watchers),
            "commit_count" => Some(&mut self.commit_count),
            _ => None,
        }
    }

    /// A record with the given name, no language, and every count zero.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: None,
            stars_count: 0,
            forks_count: 0,
            watchers: 0,
            pull_requests: 0,
            commit_count: 0,
            issues_count: 0,
            contributors: 0,
        }
    }
}

impl RepositoryCounts for RepositoryRecord {
    fn name(&self) -> &str {
        &self.name
    }
    fn stars(&self) -> u64 {
        self.stars_count
    }
    fn forks(&self) -> u64 {
        self.forks_count
    }
    fn watchers(&self) -> u64 {
        self.watchers
    }
    fn pull_requests(&self) -> u64 {
        self.pull_requests
    }
    fn commit_count(&self) -> u64 {
        self.commit_count
    }
}

/// One row of the per-repository time series dataset.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use stargaze_data::RepositoryTimeSeriesRecord;
///
/// let record = RepositoryTimeSeriesRecord {
///     name: "octocat/hello".into(),
///     created_at: Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap(),
///     stars_count: 10,
///     forks_count: 2,
///     watchers: 3,
///     pull_requests: 4,
///     commit_count: 50,
///     languages_used: vec!["Go".into(), "Rust".into(), "Go".into()],
/// };
/// assert_eq!(record.language_diversity(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryTimeSeriesRecord {
    /// Repository identifier.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Stars.
    pub stars_count: u64,
    /// Forks.
    pub forks_count: u64,
    /// Watchers.
    pub watchers: u64,
    /// Pull requests.
    pub pull_requests: u64,
    /// Commits.
    pub commit_count: u64,
    /// Languages used, in recorded order; may repeat.
    pub languages_used: Vec<String>,
}

impl RepositoryTimeSeriesRecord {
    /// Number of distinct languages in `languages_used`.
    pub fn language_diversity(&self) -> usize {
        let mut distinct: Vec<&str> = self.languages_used.iter().map(String::as_str).collect();
        distinct.sort_unstable();
        distinct.dedup();
        distinct.len()
    }
}

impl RepositoryCounts for RepositoryTimeSeriesRecord {
    fn name(&self) -> &str {
        &self.name
    }
    fn stars(&self) -> u64 {
        self.stars_count
    }
    fn forks(&self) -> u64 {
        self.forks_count
    }
    fn watchers(&self) -> u64 {
        self.watchers
    }
    fn pull_requests(&self) -> u64 {
        self.pull_requests
    }
    fn commit_count(&self) -> u64 {
        self.commit_count
    }
}

/// The loaded aggregate dataset.
#[derive(Debug, Clone, Default)]
pub struct RepositoryTable {
    /// File the table was read from.
    pub source: PathBuf,
    /// Count columns that were present in the file header, in
    /// [`RepositoryRecord::COUNT_COLUMNS`] order.
    pub count_columns: Vec<&'static str>,
    /// Rows in file order.
    pub records: Vec<RepositoryRecord>,
}

impl RepositoryTable {
    /// Values of a count column as floats, or `None` if the column was not
    /// present in the source.
    ///
    /// # Examples
    ///
    /// ```
    /// use stargaze_data::{RepositoryRecord, RepositoryTable};
    ///
    /// let mut a = RepositoryRecord::named("a");
    /// a.stars_count = 3;
    /// let table = RepositoryTable {
    ///     source: "repos.csv".into(),
    ///     count_columns: vec!["stars_count"],
    ///     records: vec![a],
    /// };
    /// assert_eq!(table.column_values("stars_count"), Some(vec![3.0]));
    /// assert_eq!(table.column_values("watchers"), None);
    /// ```
    pub fn column_values(&self, column: &str) -> Option<Vec<f64>> {
        if !self.count_columns.contains(&column) {
            return None;
        }
        self.records
            .iter()
            .map(|r| r.count(column).map(|v| v as f64))
            .collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The loaded time series dataset.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesTable {
    /// File the table was read from.
    pub source: PathBuf,
    /// Rows in file order.
    pub records: Vec<RepositoryTimeSeriesRecord>,
}

impl TimeSeriesTable {
    /// First row with the given name.
    pub fn find(&self, name: &str) -> Option<&RepositoryTimeSeriesRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn series(languages: &[&str]) -> RepositoryTimeSeriesRecord {
        RepositoryTimeSeriesRecord {
            name: "demo".into(),
            created_at: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            stars_count: 0,
            forks_count: 0,
            watchers: 0,
            pull_requests: 0,
            commit_count: 0,
            languages_used: languages.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn language_diversity_counts_distinct() {
        assert_eq!(series(&["Go", "Rust", "Go"]).language_diversity(), 2);
        assert_eq!(series(&[]).language_diversity(), 0);
        assert_eq!(series(&["C", "C", "C"]).language_diversity(), 1);
    }

    #[test]
    fn every_count_column_is_addressable() {
        let record = RepositoryRecord::named("x");
        for column in RepositoryRecord::COUNT_COLUMNS {
            assert_eq!(record.count(column), Some(0), "column {column}");
        }
    }

    #[test]
    fn trait_reads_match_fields() {
        let mut record = series(&["Go"]);
        record.stars_count = 1;
        record.forks_count = 2;
        record.watchers = 3;
        record.pull_requests = 4;
        record.commit_count = 5;
        assert_eq!(
            (
                record.stars(),
                record.forks(),
                RepositoryCounts::watchers(&record),
                RepositoryCounts::pull_requests(&record),
                RepositoryCounts::commit_count(&record)
            ),
            (1, 2, 3, 4, 5)
        );
        assert_eq!(RepositoryCounts::name(&record), "demo");
    }

    #[test]
    fn find_returns_first_match() {
        let mut first = series(&["Go"]);
        first.stars_count = 1;
        let mut second = series(&["Rust"]);
        second.stars_count = 2;
        let table = TimeSeriesTable {
            source: PathBuf::from("series.csv"),
            records: vec![first, second],
        };
        assert_eq!(table.find("demo").map(|r| r.stars_count), Some(1));
        assert!(table.find("missing").is_none());
    }

    #[test]
    fn records_serialize_camel_case() {
        let json = serde_json::to_value(series(&["Go"])).unwrap();
        assert!(json.get("languagesUsed").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
