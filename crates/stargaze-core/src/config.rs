use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StargazeError;
use crate::types::Bucket;

/// Top-level configuration loaded from `.stargaze.toml`.
///
/// Supports layered resolution: CLI flags > local config > defaults.
///
/// # Examples
///
/// ```
/// use stargaze_core::StargazeConfig;
///
/// let config = StargazeConfig::default();
/// assert_eq!(config.overview.top_repositories, 25);
/// assert_eq!(config.popularity.top_languages, 10);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StargazeConfig {
    /// Dataset locations.
    #[serde(default)]
    pub data: DataConfig,
    /// Data Overview view settings.
    #[serde(default)]
    pub overview: OverviewConfig,
    /// Language popularity table settings.
    #[serde(default)]
    pub popularity: PopularityConfig,
}

impl StargazeConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StargazeError::FileNotFound`] if the file does not exist,
    /// [`StargazeError::Io`] if it cannot be read, or [`StargazeError::Toml`]
    /// if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use stargaze_core::StargazeConfig;
    /// use std::path::Path;
    ///
    /// let config = StargazeConfig::from_file(Path::new(".stargaze.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, StargazeError> {
        if !path.exists() {
            return Err(StargazeError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`StargazeError::Toml`] if parsing fails, or
    /// [`StargazeError::Config`] if a value is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use stargaze_core::StargazeConfig;
    ///
    /// let toml = r#"
    /// [popularity]
    /// top_languages = 5
    /// "#;
    /// let config = StargazeConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.popularity.top_languages, 5);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, StargazeError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), StargazeError> {
        if self.popularity.top_languages == 0 {
            return Err(StargazeError::Config(
                "popularity.top_languages must be at least 1".into(),
            ));
        }
        if self.popularity.other_label.trim().is_empty() {
            return Err(StargazeError::Config(
                "popularity.other_label must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Where the two datasets live.
///
/// Relative paths are resolved against the data directory chosen on the
/// command line (the current directory by default).
///
/// # Examples
///
/// ```
/// use stargaze_core::DataConfig;
/// use std::path::{Path, PathBuf};
///
/// let config = DataConfig::default();
/// assert_eq!(
///     config.repositories_path(Path::new("data")),
///     PathBuf::from("data/github_dataset.csv")
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Aggregate repository dataset (default: `github_dataset.csv`).
    #[serde(default = "default_repositories")]
    pub repositories: PathBuf,
    /// Per-repository time series dataset (default: `new_repository_data.csv`).
    #[serde(default = "default_time_series")]
    pub time_series: PathBuf,
}

fn default_repositories() -> PathBuf {
    PathBuf::from("github_dataset.csv")
}

fn default_time_series() -> PathBuf {
    PathBuf::from("new_repository_data.csv")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            repositories: default_repositories(),
            time_series: default_time_series(),
        }
    }
}

impl DataConfig {
    /// Resolve the aggregate dataset path against `base`.
    pub fn repositories_path(&self, base: &Path) -> PathBuf {
        resolve(base, &self.repositories)
    }

    /// Resolve the time series dataset path against `base`.
    pub fn time_series_path(&self, base: &Path) -> PathBuf {
        resolve(base, &self.time_series)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Data Overview view configuration.
///
/// # Examples
///
/// ```
/// use stargaze_core::OverviewConfig;
///
/// let config = OverviewConfig::default();
/// assert_eq!(config.top_repositories, 25);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewConfig {
    /// Number of repositories in the "top by stars" chart (default: 25).
    #[serde(default = "default_top_repositories")]
    pub top_repositories: usize,
}

fn default_top_repositories() -> usize {
    25
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            top_repositories: default_top_repositories(),
        }
    }
}

/// Language popularity table configuration.
///
/// # Examples
///
/// ```
/// use stargaze_core::{Bucket, PopularityConfig};
///
/// let config = PopularityConfig::default();
/// assert_eq!(config.bucket, Bucket::Year);
/// assert_eq!(config.other_label, "Other");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularityConfig {
    /// Aggregation interval (default: year).
    #[serde(default)]
    pub bucket: Bucket,
    /// Languages kept as their own series (default: 10).
    #[serde(default = "default_top_languages")]
    pub top_languages: usize,
    /// Name of the series that absorbs every other language (default: `Other`).
    #[serde(default = "default_other_label")]
    pub other_label: String,
}

fn default_top_languages() -> usize {
    10
}

fn default_other_label() -> String {
    "Other".into()
}

impl Default for PopularityConfig {
    fn default() -> Self {
        Self {
            bucket: Bucket::default(),
            top_languages: default_top_languages(),
            other_label: default_other_label(),
        }
    }
}
