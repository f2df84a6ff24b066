//! Pearson correlation between the numeric columns of the aggregate dataset.

use serde::{Deserialize, Serialize};
use stargaze_data::RepositoryTable;

/// Square correlation matrix.
///
/// Entries are `None` where the correlation is undefined (a constant
/// column, or fewer than two rows).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationMatrix {
    /// Column names, also the row names.
    pub columns: Vec<String>,
    /// `values[row][col]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlation between two named columns.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let row = self.columns.iter().position(|c| c == a)?;
        let col = self.columns.iter().position(|c| c == b)?;
        self.values[row][col]
    }
}

/// Pearson correlation coefficient of two equally long samples.
///
/// # Examples
///
/// ```
/// use stargaze_metrics::correlation::pearson;
///
/// let r = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
/// assert!((r - 1.0).abs() < 1e-12);
/// assert_eq!(pearson(&[1.0, 1.0], &[1.0, 2.0]), None);
/// ```
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Correlate every pair of count columns present in `table`.
///
/// # Examples
///
/// ```
/// use stargaze_data::{RepositoryRecord, RepositoryTable};
/// use stargaze_metrics::correlation::correlation_matrix;
///
/// let rows: Vec<_> = (1..=3u64)
///     .map(|i| {
///         let mut r = RepositoryRecord::named(format!("r{i}"));
///         r.stars_count = i;
///         r.forks_count = 10 - i;
///         r
///     })
///     .collect();
/// let table = RepositoryTable {
///     source: "repos.csv".into(),
///     count_columns: vec!["stars_count", "forks_count"],
///     records: rows,
/// };
/// let matrix = correlation_matrix(&table);
/// assert_eq!(matrix.get("stars_count", "stars_count"), Some(1.0));
/// assert!((matrix.get("stars_count", "forks_count").unwrap() + 1.0).abs() < 1e-12);
/// ```
pub fn correlation_matrix(table: &RepositoryTable) -> CorrelationMatrix {
    let columns: Vec<(&str, Vec<f64>)> = table
        .count_columns
        .iter()
        .filter_map(|&c| table.column_values(c).map(|v| (c, v)))
        .collect();

    let values: Vec<Vec<Option<f64>>> = columns
        .iter()
        .enumerate()
        .map(|(i, (_, a))| {
            columns
                .iter()
                .enumerate()
                .map(|(j, (_, b))| {
                    let r = pearson(a, b);
                    if i == j {
                        r.map(|_| 1.0)
                    } else {
                        r
                    }
                })
                .collect()
        })
        .collect();

    CorrelationMatrix {
        columns: columns.iter().map(|(c, _)| c.to_string()).collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stargaze_data::RepositoryRecord;

    fn table(rows: &[(u64, u64, u64)]) -> RepositoryTable {
        RepositoryTable {
            source: "repos.csv".into(),
            count_columns: vec!["stars_count", "forks_count", "pull_requests"],
            records: rows
                .iter()
                .enumerate()
                .map(|(i, &(stars, forks, pulls))| {
                    let mut r = RepositoryRecord::named(format!("r{i}"));
                    r.stars_count = stars;
                    r.forks_count = forks;
                    r.pull_requests = pulls;
                    r
                })
                .collect(),
        }
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let matrix = correlation_matrix(&table(&[(1, 3, 7), (2, 1, 7), (5, 4, 7), (9, 2, 7)]));
        assert_eq!(matrix.columns.len(), 3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(matrix.values[i][j], matrix.values[j][i]);
            }
        }
        assert_eq!(matrix.values[0][0], Some(1.0));
        assert_eq!(matrix.values[1][1], Some(1.0));
        // pull_requests is constant
        assert_eq!(matrix.values[2][2], None);
    }

    #[test]
    fn constant_column_is_undefined() {
        let matrix = correlation_matrix(&table(&[(1, 3, 7), (2, 1, 7), (5, 4, 7)]));
        assert_eq!(matrix.get("pull_requests", "stars_count"), None);
        assert_eq!(matrix.get("pull_requests", "pull_requests"), None);
    }

    #[test]
    fn absent_columns_are_excluded() {
        let matrix = correlation_matrix(&table(&[(1, 2, 3), (2, 3, 5)]));
        assert!(!matrix.columns.iter().any(|c| c == "watchers"));
    }

    #[test]
    fn known_coefficient() {
        // x = 1,2,3,4,5 ; y = 2,4,5,4,5 → r = 0.7745966...
        let r = pearson(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 5.0, 4.0, 5.0]).unwrap();
        assert!((r - 0.774_596_669_241_483).abs() < 1e-12);
    }

    #[test]
    fn known_anticorrelation() {
        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);

        let matrix = correlation_matrix(&table(&[(1, 30, 0), (2, 20, 1), (3, 10, 2)]));
        let r = matrix.get("stars_count", "forks_count").unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_row_is_undefined() {
        assert_eq!(pearson(&[1.0], &[2.0]), None);
        let matrix = correlation_matrix(&table(&[(1, 2, 3)]));
        assert!(matrix.values.iter().flatten().all(Option::is_none));
    }
}
