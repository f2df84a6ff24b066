//! Language distribution of the aggregate dataset.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use stargaze_data::RepositoryRecord;

/// Number of repositories whose primary language is `language`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageCount {
    /// Language name.
    pub language: String,
    /// Repositories using it.
    pub count: usize,
}

/// Five-number summary of stars for one language.
///
/// # Examples
///
/// ```
/// use stargaze_metrics::distribution::BoxStats;
///
/// let stats = BoxStats::from_values("Go", &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(stats.median, 3.0);
/// assert_eq!(stats.q1, 2.0);
/// assert_eq!(stats.q3, 4.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxStats {
    /// Language name.
    pub language: String,
    /// Number of repositories.
    pub count: usize,
    /// Smallest value.
    pub min: f64,
    /// First quartile.
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub q3: f64,
    /// Largest value.
    pub max: f64,
}

impl BoxStats {
    /// Summarize `values`; `None` when empty.
    pub fn from_values(language: &str, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            language: language.to_string(),
            count: sorted.len(),
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Quantile of already-sorted `values` with linear interpolation between
/// the closest ranks.
///
/// # Examples
///
/// ```
/// use stargaze_metrics::distribution::quantile;
///
/// assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0], 0.5), 2.5);
/// ```
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Count repositories per language, most common first; equal counts are
/// ordered by name. Rows without a language are skipped.
///
/// # Examples
///
/// ```
/// use stargaze_data::RepositoryRecord;
/// use stargaze_metrics::distribution::language_counts;
///
/// let mut a = RepositoryRecord::named("a");
/// a.language = Some("Go".into());
/// let counts = language_counts(&[a, RepositoryRecord::named("b")]);
/// assert_eq!(counts.len(), 1);
/// assert_eq!(counts[0].count, 1);
/// ```
pub fn language_counts(records: &[RepositoryRecord]) -> Vec<LanguageCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for language in records.iter().filter_map(|r| r.language.as_deref()) {
        *counts.entry(language).or_default() += 1;
    }
    let mut out: Vec<LanguageCount> = counts
        .into_iter()
        .map(|(language, count)| LanguageCount {
            language: language.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.language.cmp(&b.language)));
    out
}

/// Distinct languages in order of first appearance.
pub fn unique_languages(records: &[RepositoryRecord]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for language in records.iter().filter_map(|r| r.language.as_deref()) {
        if !seen.contains(&language) {
            seen.push(language);
        }
    }
    seen
}

/// Rows whose language is exactly `language`, in file order.
pub fn filter_by_language<'a>(
    records: &'a [RepositoryRecord],
    language: &str,
) -> Vec<&'a RepositoryRecord> {
    records
        .iter()
        .filter(|r| r.language.as_deref() == Some(language))
        .collect()
}

/// Stars distribution per language, languages in order of first appearance.
pub fn stars_by_language(records: &[RepositoryRecord]) -> Vec<BoxStats> {
    unique_languages(records)
        .into_iter()
        .filter_map(|language| {
            let stars: Vec<f64> = filter_by_language(records, language)
                .iter()
                .map(|r| r.stars_count as f64)
                .collect();
            BoxStats::from_values(language, &stars)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, language: Option<&str>, stars: u64) -> RepositoryRecord {
        let mut r = RepositoryRecord::named(name);
        r.language = language.map(str::to_string);
        r.stars_count = stars;
        r
    }

    fn sample() -> Vec<RepositoryRecord> {
        vec![
            record("a", Some("Python"), 10),
            record("b", Some("Go"), 4),
            record("c", Some("Python"), 30),
            record("d", None, 99),
            record("e", Some("C"), 1),
            record("f", Some("Go"), 8),
            record("g", Some("Python"), 20),
        ]
    }

    #[test]
    fn counts_are_sorted_and_skip_missing() {
        let counts = language_counts(&sample());
        let pairs: Vec<_> = counts.iter().map(|c| (c.language.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("Python", 3), ("Go", 2), ("C", 1)]);
    }

    #[test]
    fn unique_languages_keep_first_appearance() {
        assert_eq!(unique_languages(&sample()), vec!["Python", "Go", "C"]);
    }

    #[test]
    fn filter_matches_exactly() {
        let records = sample();
        let names: Vec<_> = filter_by_language(&records, "Go")
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "f"]);
        assert!(filter_by_language(&records, "go").is_empty());
    }

    #[test]
    fn box_stats_per_language() {
        let stats = stars_by_language(&sample());
        assert_eq!(stats.len(), 3);
        let python = &stats[0];
        assert_eq!(python.language, "Python");
        assert_eq!((python.min, python.median, python.max), (10.0, 20.0, 30.0));
        assert_eq!((python.q1, python.q3), (15.0, 25.0));
        let c = &stats[2];
        assert_eq!((c.min, c.q1, c.median, c.q3, c.max), (1.0, 1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.0), 1.0);
        assert_eq!(quantile(&values, 1.0), 4.0);
        assert_eq!(quantile(&values, 0.25), 1.75);
        assert!(quantile(&[], 0.5).is_nan());
    }
}
