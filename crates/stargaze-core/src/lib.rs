//! Core types, configuration, and error handling for stargaze.
//!
//! This crate provides the shared foundation used by all other stargaze crates:
//! - [`StargazeError`]: unified error type using `thiserror`
//! - [`StargazeConfig`]: configuration loaded from `.stargaze.toml`
//! - Shared types: [`Bucket`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{DataConfig, OverviewConfig, PopularityConfig, StargazeConfig};
pub use error::StargazeError;
pub use types::{Bucket, OutputFormat};

/// A convenience `Result` type for stargaze operations.
pub type Result<T> = std::result::Result<T, StargazeError>;
