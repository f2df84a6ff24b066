//! Dataset loading for stargaze.
//!
//! Reads the aggregate repository CSV and the per-repository time series
//! CSV into typed tables, parsing `created_at` timestamps and decoding the
//! serialized `languages_used` list column once at load time.

pub mod literal;
pub mod loader;
pub mod records;

pub use loader::{load_repositories, load_time_series, Dataset};
pub use records::{
    RepositoryCounts, RepositoryRecord, RepositoryTable, RepositoryTimeSeriesRecord,
    TimeSeriesTable,
};
