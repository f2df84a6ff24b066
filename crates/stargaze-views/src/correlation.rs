//! Correlation Matrix: shaded heatmap with annotated coefficients.

use std::fmt::Write;

use serde::Serialize;
use stargaze_data::RepositoryTable;
use stargaze_metrics::correlation::{correlation_matrix, CorrelationMatrix};

use crate::chart::{markdown_table, shade, text_table};
use crate::{heading, subheading, View};

/// The Correlation Matrix view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationView {
    /// Pairwise Pearson coefficients of the count columns.
    pub matrix: CorrelationMatrix,
}

impl CorrelationView {
    /// Build the view from the aggregate dataset.
    pub fn build(table: &RepositoryTable) -> Self {
        Self {
            matrix: correlation_matrix(table),
        }
    }

    fn annotated_rows(&self) -> Vec<Vec<String>> {
        self.matrix
            .columns
            .iter()
            .zip(&self.matrix.values)
            .map(|(name, row)| {
                std::iter::once(name.clone())
                    .chain(row.iter().map(|&r| format_coefficient(r)))
                    .collect()
            })
            .collect()
    }

    fn headers(&self) -> Vec<&str> {
        std::iter::once("")
            .chain(self.matrix.columns.iter().map(String::as_str))
            .collect()
    }
}

fn format_coefficient(r: Option<f64>) -> String {
    r.map_or_else(|| "nan".to_string(), |r| format!("{r:.2}"))
}

impl View for CorrelationView {
    fn title(&self) -> &'static str {
        "Correlation Matrix"
    }

    fn to_text(&self) -> String {
        let mut out = heading(self.title());
        if self.matrix.columns.is_empty() {
            out.push_str("\n  No numeric columns.\n");
            return out;
        }

        out.push_str(&subheading("Heatmap"));
        let width = self
            .matrix
            .columns
            .iter()
            .map(|c| c.chars().count())
            .max()
            .unwrap_or(0);
        for (name, row) in self.matrix.columns.iter().zip(&self.matrix.values) {
            let cells: String = row
                .iter()
                .map(|&r| {
                    let c = shade(r);
                    format!("{c}{c}")
                })
                .collect();
            let _ = writeln!(out, "  {name:>width$} {cells}");
        }
        out.push_str("  shade: ' ' 0.0  '\u{2591}' 0.25  '\u{2592}' 0.5  '\u{2593}' 0.75  '\u{2588}' 1.0 (absolute)\n");

        out.push_str(&subheading("Coefficients"));
        out.push_str(&text_table(&self.headers(), &self.annotated_rows()));
        out
    }

    fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n\n", self.title());
        if self.matrix.columns.is_empty() {
            out.push_str("No numeric columns.\n");
            return out;
        }
        out.push_str(&markdown_table(&self.headers(), &self.annotated_rows()));
        out
    }
}
