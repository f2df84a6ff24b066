//! Per-repository composite metrics.
//!
//! Every metric is defined for every record: the `+ 1` in the efficiency
//! denominator rules out division by zero.

use serde::{Deserialize, Serialize};
use stargaze_data::RepositoryCounts;

/// Composite metrics for one repository.
///
/// # Examples
///
/// ```
/// use stargaze_metrics::derive::DerivedRepositoryMetrics;
///
/// let m = DerivedRepositoryMetrics {
///     name: "octocat/hello".into(),
///     issue_resolution_efficiency: 0.5,
///     popularity_index: 12.0,
///     community_involvement: 3.0,
/// };
/// assert!(m.popularity_index > m.community_involvement);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedRepositoryMetrics {
    /// Repository name.
    pub name: String,
    /// `pull_requests / (commit_count + 1)`.
    pub issue_resolution_efficiency: f64,
    /// `(stars + forks + watchers) / 3`.
    pub popularity_index: f64,
    /// `(forks + pull_requests) / 2`.
    pub community_involvement: f64,
}

impl DerivedRepositoryMetrics {
    /// Compute the metrics for a single record.
    ///
    /// # Examples
    ///
    /// ```
    /// use stargaze_data::RepositoryRecord;
    /// use stargaze_metrics::derive::DerivedRepositoryMetrics;
    ///
    /// let mut record = RepositoryRecord::named("demo");
    /// record.pull_requests = 10;
    /// record.commit_count = 4;
    /// let m = DerivedRepositoryMetrics::for_record(&record);
    /// assert_eq!(m.issue_resolution_efficiency, 2.0);
    /// ```
    pub fn for_record<R: RepositoryCounts>(record: &R) -> Self {
        let stars = record.stars() as f64;
        let forks = record.forks() as f64;
        let watchers = record.watchers() as f64;
        let pulls = record.pull_requests() as f64;
        let commits = record.commit_count() as f64;

        Self {
            name: record.name().to_string(),
            issue_resolution_efficiency: pulls / (commits + 1.0),
            popularity_index: (stars + forks + watchers) / 3.0,
            community_involvement: (forks + pulls) / 2.0,
        }
    }
}

/// Compute [`DerivedRepositoryMetrics`] for every record, in input order.
///
/// # Examples
///
/// ```
/// use stargaze_data::RepositoryRecord;
/// use stargaze_metrics::derive::derive_repository_metrics;
///
/// let records = vec![RepositoryRecord::named("a"), RepositoryRecord::named("b")];
/// let metrics = derive_repository_metrics(&records);
/// assert_eq!(metrics.len(), 2);
/// assert_eq!(metrics[1].name, "b");
/// ```
pub fn derive_repository_metrics<R: RepositoryCounts>(records: &[R]) -> Vec<DerivedRepositoryMetrics> {
    records
        .iter()
        .map(DerivedRepositoryMetrics::for_record)
        .collect()
}
