//! Time-bucketed language popularity.
//!
//! Every language in a repository's `languages_used` sequence counts once
//! per occurrence toward the bucket of the repository's creation time.
//! The full table is then reduced to the most used languages plus a single
//! synthetic series that absorbs the rest.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use stargaze_core::{Bucket, PopularityConfig};
use stargaze_data::RepositoryTimeSeriesRecord;

/// A calendar bucket. Orders chronologically.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use stargaze_core::Bucket;
/// use stargaze_metrics::popularity::BucketKey;
///
/// let ts = Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap();
/// assert_eq!(BucketKey::of(Bucket::Year, &ts).to_string(), "2020");
/// assert_eq!(BucketKey::of(Bucket::Month, &ts).to_string(), "2020-03");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12) for monthly buckets.
    pub month: Option<u32>,
}

impl BucketKey {
    /// The bucket containing `ts`.
    pub fn of(bucket: Bucket, ts: &DateTime<Utc>) -> Self {
        match bucket {
            Bucket::Year => Self {
                year: ts.year(),
                month: None,
            },
            Bucket::Month => Self {
                year: ts.year(),
                month: Some(ts.month()),
            },
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month {
            Some(month) => write!(f, "{:04}-{month:02}", self.year),
            None => write!(f, "{:04}", self.year),
        }
    }
}

/// Options for [`build_language_popularity_with`].
///
/// # Examples
///
/// ```
/// use stargaze_metrics::popularity::PopularityOptions;
///
/// let opts = PopularityOptions::default();
/// assert_eq!(opts.top_languages, 10);
/// assert_eq!(opts.other_label, "Other");
/// ```
#[derive(Debug, Clone)]
pub struct PopularityOptions {
    /// Aggregation interval (default: year).
    pub bucket: Bucket,
    /// Languages kept as their own column (default: 10).
    pub top_languages: usize,
    /// Name of the column that collects the remaining languages.
    pub other_label: String,
}

impl Default for PopularityOptions {
    fn default() -> Self {
        Self::from(&PopularityConfig::default())
    }
}

impl From<&PopularityConfig> for PopularityOptions {
    fn from(config: &PopularityConfig) -> Self {
        Self {
            bucket: config.bucket,
            top_languages: config.top_languages,
            other_label: config.other_label.clone(),
        }
    }
}

/// Uncollapsed per-language counts: one row per bucket present in the
/// input, one column per distinct language (sorted by name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCounts {
    /// Buckets in chronological order.
    pub buckets: Vec<BucketKey>,
    /// Distinct languages, sorted by name.
    pub languages: Vec<String>,
    /// `counts[bucket][language]`.
    pub counts: Vec<Vec<u64>>,
}

impl LanguageCounts {
    /// Count of `language` in `bucket`, or `None` if either is absent.
    pub fn get(&self, bucket: &BucketKey, language: &str) -> Option<u64> {
        let row = self.buckets.iter().position(|b| b == bucket)?;
        let col = self.languages.iter().position(|l| l == language)?;
        Some(self.counts[row][col])
    }

    /// Total count of each language across all buckets, in `languages` order.
    pub fn totals(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.languages.len()];
        for row in &self.counts {
            for (total, value) in totals.iter_mut().zip(row) {
                *total += value;
            }
        }
        totals
    }

    /// Sum of every cell in row `row`.
    pub fn row_total(&self, row: usize) -> u64 {
        self.counts.get(row).map_or(0, |r| r.iter().sum())
    }
}

/// Bucketed popularity of the most used languages.
///
/// Columns are the ranked languages (most used first), followed by the
/// "other" column when more languages exist than were kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagePopularityTable {
    /// Aggregation interval the rows were built with.
    pub bucket: Bucket,
    /// Bucket labels in chronological order (`2020`, or `2020-03`).
    pub buckets: Vec<String>,
    /// Column names: ranked languages, then the "other" label if present.
    pub columns: Vec<String>,
    /// `rows[bucket][column]`.
    pub rows: Vec<Vec<u64>>,
    /// Label of the collapsed column, if one was added.
    pub other: Option<String>,
}

impl LanguagePopularityTable {
    /// Count at (`bucket`, `column`).
    ///
    /// # Examples
    ///
    /// ```
    /// use stargaze_core::Bucket;
    /// use stargaze_metrics::popularity::LanguagePopularityTable;
    ///
    /// let table = LanguagePopularityTable {
    ///     bucket: Bucket::Year,
    ///     buckets: vec!["2020".into()],
    ///     columns: vec!["Go".into(), "Rust".into()],
    ///     rows: vec![vec![2, 1]],
    ///     other: None,
    /// };
    /// assert_eq!(table.get("2020", "Go"), Some(2));
    /// assert_eq!(table.get("2021", "Go"), None);
    /// ```
    pub fn get(&self, bucket: &str, column: &str) -> Option<u64> {
        let row = self.buckets.iter().position(|b| b == bucket)?;
        let col = self.columns.iter().position(|c| c == column)?;
        Some(self.rows[row][col])
    }

    /// All values of one column, in bucket order.
    pub fn series(&self, column: &str) -> Option<Vec<u64>> {
        let col = self.columns.iter().position(|c| c == column)?;
        Some(self.rows.iter().map(|row| row[col]).collect())
    }

    /// Sum of every cell in row `row`.
    pub fn row_total(&self, row: usize) -> u64 {
        self.rows.get(row).map_or(0, |r| r.iter().sum())
    }

    /// Largest single cell, used to scale charts.
    pub fn max_value(&self) -> u64 {
        self.rows.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Whether there are no buckets.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Build the full per-language table without ranking or collapsing.
///
/// Buckets are exactly those containing at least one record's creation
/// time, including records with an empty language list.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use stargaze_core::Bucket;
/// use stargaze_data::RepositoryTimeSeriesRecord;
/// use stargaze_metrics::popularity::{build_language_counts, BucketKey};
///
/// let record = RepositoryTimeSeriesRecord {
///     name: "a".into(),
///     created_at: Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap(),
///     stars_count: 0,
///     forks_count: 0,
///     watchers: 0,
///     pull_requests: 0,
///     commit_count: 0,
///     languages_used: vec!["Go".into(), "Go".into(), "Rust".into()],
/// };
/// let counts = build_language_counts(&[record], Bucket::Year);
/// let year = BucketKey { year: 2020, month: None };
/// assert_eq!(counts.get(&year, "Go"), Some(2));
/// assert_eq!(counts.get(&year, "Rust"), Some(1));
/// ```
pub fn build_language_counts(records: &[RepositoryTimeSeriesRecord], bucket: Bucket) -> LanguageCounts {
    let languages: Vec<String> = records
        .iter()
        .flat_map(|r| r.languages_used.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let column: BTreeMap<&str, usize> = languages
        .iter()
        .enumerate()
        .map(|(idx, lang)| (lang.as_str(), idx))
        .collect();

    let mut rows: BTreeMap<BucketKey, Vec<u64>> = BTreeMap::new();
    for record in records {
        let row = rows
            .entry(BucketKey::of(bucket, &record.created_at))
            .or_insert_with(|| vec![0; languages.len()]);
        for language in &record.languages_used {
            if let Some(&idx) = column.get(language.as_str()) {
                row[idx] += 1;
            }
        }
    }

    let (buckets, counts) = rows.into_iter().unzip();
    LanguageCounts {
        buckets,
        languages,
        counts,
    }
}

/// Build the yearly popularity table keeping the 10 most used languages
/// and collapsing the rest into `Other`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use stargaze_core::Bucket;
/// use stargaze_data::RepositoryTimeSeriesRecord;
/// use stargaze_metrics::popularity::build_language_popularity;
///
/// let make = |name: &str, month: u32, langs: &[&str]| RepositoryTimeSeriesRecord {
///     name: name.into(),
///     created_at: Utc.with_ymd_and_hms(2020, month, 1, 0, 0, 0).unwrap(),
///     stars_count: 0,
///     forks_count: 0,
///     watchers: 0,
///     pull_requests: 0,
///     commit_count: 0,
///     languages_used: langs.iter().map(|s| s.to_string()).collect(),
/// };
/// let records = vec![make("A", 3, &["Go"]), make("B", 7, &["Go", "Rust"])];
/// let table = build_language_popularity(&records, Bucket::Year);
/// assert_eq!(table.get("2020", "Go"), Some(2));
/// assert_eq!(table.get("2020", "Rust"), Some(1));
/// assert_eq!(table.columns, vec!["Go", "Rust"]);
/// ```
pub fn build_language_popularity(
    records: &[RepositoryTimeSeriesRecord],
    bucket: Bucket,
) -> LanguagePopularityTable {
    let options = PopularityOptions {
        bucket,
        ..PopularityOptions::default()
    };
    build_language_popularity_with(records, &options)
}

/// Build the popularity table with explicit options.
///
/// Languages are ranked once, by their total across every bucket,
/// descending; equal totals are ordered by language name. When more than
/// `top_languages` distinct languages exist, the remainder are summed per
/// bucket into one `other_label` column. A language whose name equals
/// `other_label` is always counted in that column.
pub fn build_language_popularity_with(
    records: &[RepositoryTimeSeriesRecord],
    options: &PopularityOptions,
) -> LanguagePopularityTable {
    let full = build_language_counts(records, options.bucket);
    let totals = full.totals();

    // A language spelled like the "other" label is never ranked on its own;
    // it joins the remainder so the label names exactly one column.
    let (mut ranked, folded): (Vec<usize>, Vec<usize>) = (0..full.languages.len())
        .partition(|&idx| full.languages[idx] != options.other_label);
    ranked.sort_by(|&a, &b| {
        totals[b]
            .cmp(&totals[a])
            .then_with(|| full.languages[a].cmp(&full.languages[b]))
    });
    let (kept, ranked_rest) = ranked.split_at(ranked.len().min(options.top_languages));
    let rest: Vec<usize> = ranked_rest.iter().copied().chain(folded).collect();
    let collapse = !rest.is_empty();

    let mut columns: Vec<String> = kept.iter().map(|&idx| full.languages[idx].clone()).collect();
    if collapse {
        columns.push(options.other_label.clone());
    }

    let rows = full
        .counts
        .iter()
        .map(|row| {
            let mut out: Vec<u64> = kept.iter().map(|&idx| row[idx]).collect();
            if collapse {
                out.push(rest.iter().map(|&idx| row[idx]).sum());
            }
            out
        })
        .collect();

    tracing::debug!(
        buckets = full.buckets.len(),
        languages = full.languages.len(),
        kept = kept.len(),
        collapsed = rest.len(),
        "built language popularity table"
    );

    LanguagePopularityTable {
        bucket: options.bucket,
        buckets: full.buckets.iter().map(ToString::to_string).collect(),
        columns,
        rows,
        other: collapse.then(|| options.other_label.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(year: i32, month: u32, languages: &[&str]) -> RepositoryTimeSeriesRecord {
        RepositoryTimeSeriesRecord {
            name: format!("repo-{year}-{month}"),
            created_at: Utc.with_ymd_and_hms(year, month, 15, 8, 0, 0).unwrap(),
            stars_count: 0,
            forks_count: 0,
            watchers: 0,
            pull_requests: 0,
            commit_count: 0,
            languages_used: languages.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Twelve languages with distinct totals: L00 used 12 times ... L11 once.
    fn twelve_languages() -> Vec<RepositoryTimeSeriesRecord> {
        let mut records = Vec::new();
        for i in 0..12usize {
            let name = format!("L{i:02}");
            let uses = 12 - i;
            for n in 0..uses {
                let year = 2015 + (n % 3) as i32;
                records.push(record(year, 1 + (i % 12) as u32, &[name.as_str()]));
            }
        }
        records
    }

    #[test]
    fn repeats_count_multiple_times() {
        let records = vec![record(2020, 3, &["Go", "Go", "Rust"])];
        let table = build_language_popularity(&records, Bucket::Year);
        assert_eq!(table.get("2020", "Go"), Some(2));
        assert_eq!(table.get("2020", "Rust"), Some(1));
    }

    #[test]
    fn end_to_end_example() {
        let records = vec![record(2020, 3, &["Go"]), record(2020, 7, &["Go", "Rust"])];
        let table = build_language_popularity(&records, Bucket::Year);
        assert_eq!(table.buckets, vec!["2020"]);
        assert_eq!(table.rows, vec![vec![2, 1]]);
        assert_eq!(table.columns, vec!["Go", "Rust"]);
        assert!(table.other.is_none());
    }

    #[test]
    fn more_than_ten_languages_gives_eleven_columns() {
        let table = build_language_popularity(&twelve_languages(), Bucket::Year);
        assert_eq!(table.columns.len(), 11);
        assert_eq!(table.columns.last().map(String::as_str), Some("Other"));
        assert_eq!(table.other.as_deref(), Some("Other"));
        assert_eq!(table.columns[0], "L00");
        assert!(!table.columns.contains(&"L10".to_string()));
        assert!(!table.columns.contains(&"L11".to_string()));
        assert_eq!(table.series("Other").unwrap().iter().sum::<u64>(), 2 + 1);
    }

    #[test]
    fn ten_or_fewer_languages_have_no_other_column() {
        let records: Vec<_> = twelve_languages()
            .into_iter()
            .filter(|r| r.languages_used[0].as_str() < "L10")
            .collect();
        let table = build_language_popularity(&records, Bucket::Year);
        assert_eq!(table.columns.len(), 10);
        assert!(table.other.is_none());
        assert!(!table.columns.iter().any(|c| c == "Other"));
    }

    #[test]
    fn row_sums_are_conserved_by_collapsing() {
        let records = twelve_languages();
        let full = build_language_counts(&records, Bucket::Year);
        let table = build_language_popularity(&records, Bucket::Year);
        assert_eq!(full.buckets.len(), table.buckets.len());
        for row in 0..table.buckets.len() {
            assert_eq!(table.row_total(row), full.row_total(row), "bucket {row}");
        }
    }

    #[test]
    fn buckets_match_distinct_creation_years() {
        let records = vec![
            record(2018, 1, &["Go"]),
            record(2021, 5, &[]),
            record(2018, 9, &["C"]),
        ];
        let table = build_language_popularity(&records, Bucket::Year);
        // 2019 and 2020 have no records and must not appear
        assert_eq!(table.buckets, vec!["2018", "2021"]);
        assert_eq!(table.rows[1], vec![0, 0]);
    }

    #[test]
    fn empty_language_list_contributes_nothing() {
        let records = vec![record(2020, 1, &[]), record(2020, 2, &["Go"])];
        let table = build_language_popularity(&records, Bucket::Year);
        assert_eq!(table.rows, vec![vec![1]]);
    }

    #[test]
    fn ties_are_broken_by_language_name() {
        let records = vec![record(2020, 1, &["Zig", "Ada", "Nim"])];
        let options = PopularityOptions {
            top_languages: 2,
            ..PopularityOptions::default()
        };
        let table = build_language_popularity_with(&records, &options);
        assert_eq!(table.columns, vec!["Ada", "Nim", "Other"]);
        assert_eq!(table.rows, vec![vec![1, 1, 1]]);
    }

    #[test]
    fn top_languages_are_ranked_across_all_buckets() {
        // Rust dominates 2019 only, Go is spread out but larger in total.
        let records = vec![
            record(2019, 1, &["Rust", "Rust", "Rust"]),
            record(2020, 1, &["Go", "Go"]),
            record(2021, 1, &["Go", "Go", "C"]),
        ];
        let options = PopularityOptions {
            top_languages: 1,
            other_label: "Rest".into(),
            ..PopularityOptions::default()
        };
        let table = build_language_popularity_with(&records, &options);
        assert_eq!(table.columns, vec!["Go", "Rest"]);
        assert_eq!(table.series("Rest").unwrap(), vec![3, 0, 1]);
    }

    #[test]
    fn language_named_like_other_label_joins_the_remainder() {
        let records = vec![record(2020, 1, &["Other", "Other", "Go", "Go", "Go", "Zig"])];
        let options = PopularityOptions {
            top_languages: 2,
            ..PopularityOptions::default()
        };
        let table = build_language_popularity_with(&records, &options);
        assert_eq!(table.columns, vec!["Go", "Zig", "Other"]);
        assert_eq!(table.rows, vec![vec![3, 1, 2]]);
        assert_eq!(table.get("2020", "Other"), Some(2));
        assert_eq!(table.columns.iter().filter(|c| *c == "Other").count(), 1);

        let options = PopularityOptions {
            top_languages: 1,
            ..PopularityOptions::default()
        };
        let table = build_language_popularity_with(&records, &options);
        assert_eq!(table.columns, vec!["Go", "Other"]);
        assert_eq!(table.get("2020", "Other"), Some(3));
    }

    #[test]
    fn monthly_buckets() {
        let records = vec![record(2020, 3, &["Go"]), record(2020, 7, &["Go", "Rust"])];
        let table = build_language_popularity(&records, Bucket::Month);
        assert_eq!(table.buckets, vec!["2020-03", "2020-07"]);
        assert_eq!(table.get("2020-03", "Go"), Some(1));
        assert_eq!(table.get("2020-07", "Rust"), Some(1));
        assert_eq!(table.max_value(), 1);
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = build_language_popularity(&[], Bucket::Year);
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
        assert_eq!(table.max_value(), 0);
    }
}
