//! Derived statistics over the repository datasets.
//!
//! Computes per-repository composite metrics, the time-bucketed language
//! popularity table, gauge readings for a selected repository, yearly
//! engagement, language distribution, the correlation matrix of the
//! numeric columns, and the popularity scatter series.

pub mod correlation;
pub mod derive;
pub mod distribution;
pub mod engagement;
pub mod gauge;
pub mod insights;
pub mod popularity;
