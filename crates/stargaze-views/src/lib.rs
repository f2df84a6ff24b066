//! Presentation of the four dashboard views.
//!
//! Each view is a serializable snapshot built from the loaded [`Dataset`]
//! and rendered as plain text, Markdown, or JSON. Views hold no state and
//! contain no business logic: every number comes from `stargaze-metrics`.
//!
//! [`Dataset`]: stargaze_data::Dataset

pub mod chart;
pub mod correlation;
pub mod languages;
pub mod overview;
pub mod popularity;

use serde::Serialize;
use stargaze_core::{OutputFormat, StargazeError};

pub use correlation::CorrelationView;
pub use languages::LanguagesView;
pub use overview::{OverviewOptions, OverviewView};
pub use popularity::PopularityView;

/// A renderable dashboard view.
pub trait View: Serialize {
    /// Heading shown above the view.
    fn title(&self) -> &'static str;

    /// Render as human-readable text.
    fn to_text(&self) -> String;

    /// Render as GitHub-flavored Markdown.
    fn to_markdown(&self) -> String;
}

/// Render `view` in the requested format.
///
/// # Errors
///
/// Returns [`StargazeError::Serialization`] if JSON encoding fails.
///
/// # Examples
///
/// ```
/// use stargaze_core::OutputFormat;
/// use stargaze_data::RepositoryTable;
/// use stargaze_views::{render, CorrelationView};
///
/// let view = CorrelationView::build(&RepositoryTable::default());
/// let json = render(&view, OutputFormat::Json).unwrap();
/// assert!(json.contains("\"columns\""));
/// ```
pub fn render<V: View>(view: &V, format: OutputFormat) -> Result<String, StargazeError> {
    match format {
        OutputFormat::Text => Ok(view.to_text()),
        OutputFormat::Markdown => Ok(view.to_markdown()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
    }
}

fn heading(title: &str) -> String {
    format!("{title}\n{}\n", "=".repeat(title.chars().count()))
}

fn subheading(title: &str) -> String {
    format!("\n{title}\n{:-<72}\n", "")
}
