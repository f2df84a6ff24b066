use std::path::PathBuf;

/// Errors that can occur while loading and analyzing repository datasets.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to `miette::Report` at the boundary.
///
/// # Examples
///
/// ```
/// use stargaze_core::StargazeError;
///
/// let err = StargazeError::Parse("bad timestamp".into());
/// assert!(err.to_string().contains("bad timestamp"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StargazeError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A dataset exists but could not be loaded (bad header, bad cell).
    #[error("failed to load {}: {reason}", .path.display())]
    Load {
        /// Source that failed to load.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// A `created_at` value could not be parsed as a timestamp.
    #[error("parse error: {0}")]
    Parse(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StargazeError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = StargazeError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn load_error_shows_path_and_reason() {
        let err = StargazeError::Load {
            path: PathBuf::from("data/github_dataset.csv"),
            reason: "missing column `stars_count`".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("data/github_dataset.csv"));
        assert!(msg.contains("stars_count"));
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = StargazeError::FileNotFound(PathBuf::from("/tmp/missing.csv"));
        assert!(err.to_string().contains("/tmp/missing.csv"));
    }
}
