//! Language Trends: rows for one language, stars distribution per
//! language, and repository counts per language.

use std::fmt::Write;

use serde::Serialize;
use stargaze_data::{RepositoryRecord, RepositoryTable};
use stargaze_metrics::distribution::{
    filter_by_language, language_counts, stars_by_language, BoxStats, LanguageCount,
};

use crate::chart::{bar_chart, format_number, markdown_table, text_table};
use crate::{heading, subheading, View};

const BAR_WIDTH: usize = 40;

/// The Language Trends view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagesView {
    /// Language the table is filtered to.
    pub selected_language: Option<String>,
    /// Rows whose language matches, in file order.
    pub repositories: Vec<RepositoryRecord>,
    /// Stars five-number summary per language.
    pub stars_distribution: Vec<BoxStats>,
    /// Repositories per language, most common first.
    pub language_counts: Vec<LanguageCount>,
}

impl LanguagesView {
    /// Build the view. Without an explicit `language` the most common one
    /// is selected.
    pub fn build(table: &RepositoryTable, language: Option<&str>) -> Self {
        let counts = language_counts(&table.records);
        let selected = language
            .map(str::to_string)
            .or_else(|| counts.first().map(|c| c.language.clone()));
        let repositories: Vec<RepositoryRecord> = selected
            .as_deref()
            .map(|l| {
                filter_by_language(&table.records, l)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Self {
            selected_language: selected,
            repositories,
            stars_distribution: stars_by_language(&table.records),
            language_counts: counts,
        }
    }

    fn repository_rows(&self) -> Vec<Vec<String>> {
        self.repositories
            .iter()
            .map(|r| {
                vec![
                    r.name.clone(),
                    r.stars_count.to_string(),
                    r.forks_count.to_string(),
                    r.issues_count.to_string(),
                    r.pull_requests.to_string(),
                    r.contributors.to_string(),
                ]
            })
            .collect()
    }

    fn distribution_rows(&self) -> Vec<Vec<String>> {
        self.stars_distribution
            .iter()
            .map(|s| {
                vec![
                    s.language.clone(),
                    s.count.to_string(),
                    format_number(s.min),
                    format_number(s.q1),
                    format_number(s.median),
                    format_number(s.q3),
                    format_number(s.max),
                ]
            })
            .collect()
    }

    fn count_rows(&self) -> Vec<Vec<String>> {
        self.language_counts
            .iter()
            .map(|c| vec![c.language.clone(), c.count.to_string()])
            .collect()
    }
}

const REPOSITORY_HEADERS: [&str; 6] = [
    "Repository",
    "Stars",
    "Forks",
    "Issues",
    "Pull requests",
    "Contributors",
];
const DISTRIBUTION_HEADERS: [&str; 7] = ["Language", "Repos", "Min", "Q1", "Median", "Q3", "Max"];

impl View for LanguagesView {
    fn title(&self) -> &'static str {
        "Language Trends"
    }

    fn to_text(&self) -> String {
        let mut out = heading(self.title());

        match &self.selected_language {
            Some(language) => {
                out.push_str(&subheading(&format!("Repositories using {language}")));
                if self.repositories.is_empty() {
                    let _ = writeln!(out, "  No repositories use {language}.");
                } else {
                    out.push_str(&text_table(&REPOSITORY_HEADERS, &self.repository_rows()));
                }
            }
            None => {
                out.push_str(&subheading("Repositories"));
                out.push_str("  No languages in the dataset.\n");
            }
        }

        out.push_str(&subheading("Distribution of Stars by Language"));
        out.push_str(&text_table(&DISTRIBUTION_HEADERS, &self.distribution_rows()));

        out.push_str(&subheading("Repositories per Language"));
        let bars: Vec<(String, f64)> = self
            .language_counts
            .iter()
            .map(|c| (c.language.clone(), c.count as f64))
            .collect();
        out.push_str(&bar_chart(&bars, BAR_WIDTH));

        out
    }

    fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n\n", self.title());

        if let Some(language) = &self.selected_language {
            let _ = writeln!(out, "## Repositories using {language}\n");
            out.push_str(&markdown_table(&REPOSITORY_HEADERS, &self.repository_rows()));
            out.push('\n');
        }

        out.push_str("## Distribution of Stars by Language\n\n");
        out.push_str(&markdown_table(&DISTRIBUTION_HEADERS, &self.distribution_rows()));

        out.push_str("\n## Repositories per Language\n\n");
        out.push_str(&markdown_table(&["Language", "Repos"], &self.count_rows()));

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RepositoryTable {
        let make = |name: &str, language: Option<&str>, stars: u64| {
            let mut r = RepositoryRecord::named(name);
            r.language = language.map(str::to_string);
            r.stars_count = stars;
            r
        };
        RepositoryTable {
            source: "repos.csv".into(),
            count_columns: vec!["stars_count"],
            records: vec![
                make("a", Some("Python"), 10),
                make("b", Some("Go"), 4),
                make("c", Some("Python"), 30),
                make("d", None, 99),
            ],
        }
    }

    #[test]
    fn defaults_to_most_common_language() {
        let view = LanguagesView::build(&table(), None);
        assert_eq!(view.selected_language.as_deref(), Some("Python"));
        let names: Vec<_> = view.repositories.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn explicit_language_filters_rows() {
        let view = LanguagesView::build(&table(), Some("Go"));
        assert_eq!(view.repositories.len(), 1);
        assert_eq!(view.repositories[0].name, "b");
    }

    #[test]
    fn unknown_language_yields_empty_table() {
        let view = LanguagesView::build(&table(), Some("Cobol"));
        assert!(view.repositories.is_empty());
        assert!(view.to_text().contains("No repositories use Cobol."));
    }

    #[test]
    fn distribution_skips_rows_without_language() {
        let view = LanguagesView::build(&table(), None);
        assert_eq!(view.stars_distribution.len(), 2);
        let python = &view.stars_distribution[0];
        assert_eq!(python.language, "Python");
        assert_eq!(python.median, 20.0);
    }

    #[test]
    fn empty_dataset_has_no_selection() {
        let view = LanguagesView::build(&RepositoryTable::default(), None);
        assert!(view.selected_language.is_none());
        assert!(view.to_text().contains("No languages in the dataset."));
    }

    #[test]
    fn markdown_lists_counts() {
        let md = LanguagesView::build(&table(), None).to_markdown();
        assert!(md.starts_with("# Language Trends"));
        assert!(md.contains("| Python | 2 |"));
        assert!(md.contains("| Go | 1 |"));
    }
}
