//! CSV loading for the two repository datasets.
//!
//! Structural problems (missing file, missing column, non-numeric count,
//! unparseable timestamp) abort the load. A malformed `languages_used` cell
//! only affects its own row: it decodes to an empty list.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::StringRecord;
use stargaze_core::{DataConfig, StargazeError};

use crate::literal::try_decode_language_list;
use crate::records::{
    RepositoryRecord, RepositoryTable, RepositoryTimeSeriesRecord, TimeSeriesTable,
};

const NAME_COLUMNS: &[&str] = &["name", "repositories", "repository"];

/// Both datasets, loaded once at startup and shared by reference with
/// every view.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Aggregate repository metadata.
    pub repositories: RepositoryTable,
    /// Per-repository time series.
    pub time_series: TimeSeriesTable,
}

impl Dataset {
    /// Load both datasets named by `config`, resolving relative paths
    /// against `base`.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`load_repositories`] or
    /// [`load_time_series`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use stargaze_core::DataConfig;
    /// use stargaze_data::Dataset;
    ///
    /// let dataset = Dataset::load(&DataConfig::default(), Path::new(".")).unwrap();
    /// println!("{} repositories", dataset.repositories.len());
    /// ```
    pub fn load(config: &DataConfig, base: &Path) -> Result<Self, StargazeError> {
        let repositories = load_repositories(&config.repositories_path(base))?;
        let time_series = load_time_series(&config.time_series_path(base))?;
        Ok(Self {
            repositories,
            time_series,
        })
    }
}

/// Load the aggregate repository dataset.
///
/// Requires a name column (`name`, `repositories` or `repository`) and
/// `stars_count`. Every other count column is optional; the columns that
/// were present are recorded in [`RepositoryTable::count_columns`].
///
/// # Errors
///
/// Returns [`StargazeError::FileNotFound`] if `path` does not exist and
/// [`StargazeError::Load`] for a missing required column or a cell that is
/// not a non-negative integer.
pub fn load_repositories(path: &Path) -> Result<RepositoryTable, StargazeError> {
    let mut reader = open(path)?;
    let header = Header::read(&mut reader, path)?;

    let name_col = header.require_any(NAME_COLUMNS)?;
    header.require("stars_count")?;
    let language_col = header.find("language");
    let count_cols: Vec<(&'static str, usize)> = RepositoryRecord::COUNT_COLUMNS
        .iter()
        .filter_map(|&column| header.find(column).map(|idx| (column, idx)))
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| load_error(path, e.to_string()))?;
        let line = line_of(&row);
        let mut record = RepositoryRecord::named(cell(&row, name_col));
        record.language = language_col
            .map(|idx| cell(&row, idx))
            .filter(|lang| !lang.is_empty())
            .map(str::to_string);
        for &(column, idx) in &count_cols {
            let value = parse_count(path, line, column, cell(&row, idx))?;
            if let Some(slot) = record.count_mut(column) {
                *slot = value;
            }
        }
        records.push(record);
    }

    tracing::info!(
        path = %path.display(),
        rows = records.len(),
        columns = count_cols.len(),
        "loaded repository dataset"
    );

    Ok(RepositoryTable {
        source: path.to_path_buf(),
        count_columns: count_cols.into_iter().map(|(column, _)| column).collect(),
        records,
    })
}

/// Load the per-repository time series dataset.
///
/// Requires `name`, `created_at`, `stars_count`, `forks_count`, `watchers`,
/// `pull_requests`, `commit_count` and `languages_used`.
///
/// # Errors
///
/// Returns [`StargazeError::FileNotFound`] if `path` does not exist,
/// [`StargazeError::Load`] for a missing column or malformed count, and
/// [`StargazeError::Parse`] for an unparseable `created_at` value.
pub fn load_time_series(path: &Path) -> Result<TimeSeriesTable, StargazeError> {
    let mut reader = open(path)?;
    let header = Header::read(&mut reader, path)?;

    let name_col = header.require_any(NAME_COLUMNS)?;
    let created_col = header.require("created_at")?;
    let stars_col = header.require("stars_count")?;
    let forks_col = header.require("forks_count")?;
    let watchers_col = header.require("watchers")?;
    let pulls_col = header.require("pull_requests")?;
    let commits_col = header.require("commit_count")?;
    let languages_col = header.require("languages_used")?;

    let mut records = Vec::new();
    let mut undecodable = 0usize;
    for row in reader.records() {
        let row = row.map_err(|e| load_error(path, e.to_string()))?;
        let line = line_of(&row);

        let raw_created = cell(&row, created_col);
        let created_at = parse_timestamp(raw_created).ok_or_else(|| {
            StargazeError::Parse(format!(
                "{} line {line}: invalid created_at value {raw_created:?}",
                path.display()
            ))
        })?;

        let raw_languages = cell(&row, languages_col);
        let languages_used = match try_decode_language_list(raw_languages) {
            Some(languages) => languages,
            None => {
                undecodable += 1;
                tracing::debug!(
                    path = %path.display(),
                    line,
                    value = raw_languages,
                    "languages_used is not a list of strings, treating as empty"
                );
                Vec::new()
            }
        };

        records.push(RepositoryTimeSeriesRecord {
            name: cell(&row, name_col).to_string(),
            created_at,
            stars_count: parse_count(path, line, "stars_count", cell(&row, stars_col))?,
            forks_count: parse_count(path, line, "forks_count", cell(&row, forks_col))?,
            watchers: parse_count(path, line, "watchers", cell(&row, watchers_col))?,
            pull_requests: parse_count(path, line, "pull_requests", cell(&row, pulls_col))?,
            commit_count: parse_count(path, line, "commit_count", cell(&row, commits_col))?,
            languages_used,
        });
    }

    tracing::info!(
        path = %path.display(),
        rows = records.len(),
        undecodable,
        "loaded time series dataset"
    );

    Ok(TimeSeriesTable {
        source: path.to_path_buf(),
        records,
    })
}

/// Parse a `created_at` value.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff][+HH:MM|Z]`, the same with a
/// `T` separator, and a bare `YYYY-MM-DD`. Values without an offset are UTC.
///
/// # Examples
///
/// ```
/// use stargaze_data::loader::parse_timestamp;
///
/// let ts = parse_timestamp("2020-03-01").unwrap();
/// assert_eq!(ts.to_rfc3339(), "2020-03-01T00:00:00+00:00");
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"] {
        if let Ok(ts) = DateTime::parse_from_str(text, format) {
            return Some(ts.with_timezone(&Utc));
        }
    }

    let naive = text
        .strip_suffix('Z')
        .or_else(|| text.strip_suffix(" UTC"))
        .unwrap_or(text);
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(ts.and_utc());
        }
    }
    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>, StargazeError> {
    if !path.exists() {
        return Err(StargazeError::FileNotFound(path.to_path_buf()));
    }
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| load_error(path, e.to_string()))
}

struct Header {
    path: PathBuf,
    names: Vec<String>,
}

impl Header {
    fn read(reader: &mut csv::Reader<std::fs::File>, path: &Path) -> Result<Self, StargazeError> {
        let names: Vec<String> = reader
            .headers()
            .map_err(|e| load_error(path, e.to_string()))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();
        if names.iter().all(|n| n.is_empty()) {
            return Err(load_error(path, "empty header row".into()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            names,
        })
    }

    fn find(&self, column: &str) -> Option<usize> {
        self.names.iter().position(|n| n == column)
    }

    fn require(&self, column: &str) -> Result<usize, StargazeError> {
        self.find(column)
            .ok_or_else(|| load_error(&self.path, format!("missing column `{column}`")))
    }

    fn require_any(&self, columns: &[&str]) -> Result<usize, StargazeError> {
        columns
            .iter()
            .find_map(|c| self.find(c))
            .ok_or_else(|| {
                load_error(
                    &self.path,
                    format!("missing column, expected one of: {}", columns.join(", ")),
                )
            })
    }
}

fn cell(row: &StringRecord, idx: usize) -> &str {
    row.get(idx).unwrap_or("")
}

fn line_of(row: &StringRecord) -> u64 {
    row.position().map_or(0, |p| p.line())
}

/// Counts must be non-negative integers. Whole-valued floats (`12.0`) are
/// accepted since spreadsheet exports often write them that way.
fn parse_count(path: &Path, line: u64, column: &str, raw: &str) -> Result<u64, StargazeError> {
    if let Ok(value) = raw.parse::<u64>() {
        return Ok(value);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value.fract() == 0.0 => Ok(value as u64),
        _ => Err(load_error(
            path,
            format!("line {line}: `{column}` must be a non-negative integer, got {raw:?}"),
        )),
    }
}

fn load_error(path: &Path, reason: String) -> StargazeError {
    StargazeError::Load {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use chrono::{Datelike, Timelike};

    const SERIES_HEADER: &str =
        "name,created_at,stars_count,forks_count,watchers,pull_requests,commit_count,languages_used\n";

    fn write(dir: &tempfile::TempDir, file: &str, content: &str) -> PathBuf {
        let path = dir.path().join(file);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_aggregate_dataset_with_repositories_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "github_dataset.csv",
            "repositories,stars_count,forks_count,issues_count,pull_requests,contributors,language\n\
             octocat/hello,10,2,1,4,3,Rust\n\
             octocat/world,5,0,0,1,1,\n",
        );

        let table = load_repositories(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].name, "octocat/hello");
        assert_eq!(table.records[0].language.as_deref(), Some("Rust"));
        assert_eq!(table.records[0].pull_requests, 4);
        assert_eq!(table.records[1].language, None);
        assert_eq!(
            table.count_columns,
            vec![
                "stars_count",
                "forks_count",
                "issues_count",
                "pull_requests",
                "contributors"
            ]
        );
        assert_eq!(table.column_values("watchers"), None);
    }

    #[test]
    fn whole_float_counts_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "repos.csv", "name,stars_count\na,12.0\n");
        let table = load_repositories(&path).unwrap();
        assert_eq!(table.records[0].stars_count, 12);
    }

    #[test]
    fn negative_or_text_count_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        for bad in ["-1", "lots", "1.5", ""] {
            let path = write(&dir, "repos.csv", &format!("name,stars_count\na,{bad}\n"));
            let err = load_repositories(&path).unwrap_err();
            assert!(
                matches!(err, StargazeError::Load { .. }),
                "expected load error for {bad:?}, got {err}"
            );
        }
    }

    #[test]
    fn missing_required_column_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "repos.csv", "name,forks_count\na,1\n");
        let err = load_repositories(&path).unwrap_err();
        assert!(err.to_string().contains("stars_count"));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_time_series(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, StargazeError::FileNotFound(_)));
    }

    #[test]
    fn ragged_rows_are_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "repos.csv", "name,stars_count\na,1,extra\n");
        let err = load_repositories(&path).unwrap_err();
        assert!(matches!(err, StargazeError::Load { .. }));
        assert!(err.to_string().contains("repos.csv"));
    }

    #[test]
    fn loads_time_series_and_decodes_languages() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!(
            "{SERIES_HEADER}\
             a,2020-03-01 12:30:00,10,2,3,4,50,\"['Go', 'Go', 'Rust']\"\n\
             b,2021-07-01,1,0,0,0,0,[]\n"
        );
        let path = write(&dir, "series.csv", &content);

        let table = load_time_series(&path).unwrap();
        assert_eq!(table.len(), 2);
        let a = &table.records[0];
        assert_eq!(a.created_at.year(), 2020);
        assert_eq!(a.created_at.hour(), 12);
        assert_eq!(a.languages_used, vec!["Go", "Go", "Rust"]);
        assert_eq!(a.commit_count, 50);
        assert!(table.records[1].languages_used.is_empty());
    }

    #[test]
    fn malformed_language_cell_does_not_fail_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!(
            "{SERIES_HEADER}\
             a,2020-03-01,1,1,1,1,1,\"['Go'\"\n\
             b,2020-03-02,1,1,1,1,1,\n\
             c,2020-03-03,1,1,1,1,1,\"['C']\"\n"
        );
        let path = write(&dir, "series.csv", &content);

        let table = load_time_series(&path).unwrap();
        assert!(table.records[0].languages_used.is_empty());
        assert!(table.records[1].languages_used.is_empty());
        assert_eq!(table.records[2].languages_used, vec!["C"]);
    }

    #[test]
    fn bad_timestamp_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!("{SERIES_HEADER}a,not-a-date,1,1,1,1,1,[]\n");
        let path = write(&dir, "series.csv", &content);

        let err = load_time_series(&path).unwrap_err();
        assert!(matches!(err, StargazeError::Parse(_)));
        assert!(err.to_string().contains("not-a-date"));
    }

    #[test]
    fn timestamp_formats() {
        for text in [
            "2020-03-01T10:00:00Z",
            "2020-03-01T10:00:00+00:00",
            "2020-03-01 10:00:00",
            "2020-03-01 10:00:00.250",
            "2020-03-01 10:00:00+00:00",
            "2020-03-01T10:00:00",
            "2020-03-01 10:00",
        ] {
            let ts = parse_timestamp(text).unwrap_or_else(|| panic!("failed on {text}"));
            assert_eq!((ts.year(), ts.month(), ts.day(), ts.hour()), (2020, 3, 1, 10));
        }
        let shifted = parse_timestamp("2020-12-31T23:00:00-02:00").unwrap();
        assert_eq!((shifted.year(), shifted.month(), shifted.day()), (2021, 1, 1));
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("2020-13-01").is_none());
    }

    #[test]
    fn dataset_load_resolves_against_base() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "github_dataset.csv", "name,stars_count\na,1\n");
        write(
            &dir,
            "new_repository_data.csv",
            &format!("{SERIES_HEADER}a,2020-01-01,1,1,1,1,1,['Go']\n"),
        );

        let dataset = Dataset::load(&DataConfig::default(), dir.path()).unwrap();
        assert_eq!(dataset.repositories.len(), 1);
        assert_eq!(dataset.time_series.len(), 1);
    }
}
