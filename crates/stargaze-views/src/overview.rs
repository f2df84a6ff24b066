//! Data Overview: top repositories, language popularity over time, yearly
//! engagement, derived metrics per repository, and the insight gauges for
//! one repository.

use std::fmt::Write;

use serde::Serialize;
use stargaze_data::Dataset;
use stargaze_metrics::derive::{derive_repository_metrics, DerivedRepositoryMetrics};
use stargaze_metrics::engagement::{engagement_by_year, YearlyEngagement};
use stargaze_metrics::gauge::{select_gauges, GaugeSet};
use stargaze_metrics::insights::{top_by_stars, RankedRepository};
use stargaze_metrics::popularity::{
    build_language_popularity_with, LanguagePopularityTable, PopularityOptions,
};

use crate::chart::{
    bar_chart, format_number, format_percent, gauge_bar, markdown_table, sparkline, text_table,
};
use crate::{heading, subheading, View};

const BAR_WIDTH: usize = 40;
const GAUGE_WIDTH: usize = 30;

/// Inputs for [`OverviewView::build`].
#[derive(Debug, Clone, Default)]
pub struct OverviewOptions {
    /// Number of repositories in the top-by-stars chart.
    pub top_repositories: usize,
    /// Popularity table settings.
    pub popularity: PopularityOptions,
    /// Repository for the gauges; the first time series row when `None`.
    pub repository: Option<String>,
}

/// The Data Overview view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewView {
    /// Most starred repositories.
    pub top_repositories: Vec<RankedRepository>,
    /// Language popularity per bucket.
    pub language_popularity: LanguagePopularityTable,
    /// Engagement totals and growth per creation year.
    pub engagement: Vec<YearlyEngagement>,
    /// Composite metrics per time series row, in file order.
    pub derived_metrics: Vec<DerivedRepositoryMetrics>,
    /// Repository the gauges were requested for.
    pub selected_repository: Option<String>,
    /// Gauges for the selected repository; absent when it does not exist.
    pub gauges: Option<GaugeSet>,
}

impl OverviewView {
    /// Build the view from the time series table.
    ///
    /// # Examples
    ///
    /// ```
    /// use stargaze_data::Dataset;
    /// use stargaze_views::{OverviewOptions, OverviewView};
    ///
    /// let view = OverviewView::build(&Dataset::default(), &OverviewOptions::default());
    /// assert!(view.top_repositories.is_empty());
    /// assert!(view.gauges.is_none());
    /// ```
    pub fn build(dataset: &Dataset, options: &OverviewOptions) -> Self {
        let records = &dataset.time_series.records;
        let selected = options
            .repository
            .clone()
            .or_else(|| records.first().map(|r| r.name.clone()));
        let gauges = selected
            .as_deref()
            .and_then(|name| select_gauges(records, name));

        Self {
            top_repositories: top_by_stars(records, options.top_repositories),
            language_popularity: build_language_popularity_with(records, &options.popularity),
            engagement: engagement_by_year(records),
            derived_metrics: derive_repository_metrics(records),
            selected_repository: selected,
            gauges,
        }
    }

    fn popularity_rows(&self) -> Vec<Vec<String>> {
        let table = &self.language_popularity;
        table
            .buckets
            .iter()
            .zip(&table.rows)
            .map(|(bucket, row)| {
                std::iter::once(bucket.clone())
                    .chain(row.iter().map(u64::to_string))
                    .collect()
            })
            .collect()
    }

    fn popularity_headers(&self) -> Vec<&str> {
        let table = &self.language_popularity;
        let first = match table.bucket {
            stargaze_core::Bucket::Year => "Year",
            stargaze_core::Bucket::Month => "Month",
        };
        std::iter::once(first)
            .chain(table.columns.iter().map(String::as_str))
            .collect()
    }

    fn derived_rows(&self) -> Vec<Vec<String>> {
        self.derived_metrics
            .iter()
            .map(|m| {
                vec![
                    m.name.clone(),
                    format_number(m.issue_resolution_efficiency),
                    format_number(m.popularity_index),
                    format_number(m.community_involvement),
                ]
            })
            .collect()
    }

    fn engagement_rows(&self) -> Vec<Vec<String>> {
        self.engagement
            .iter()
            .map(|e| {
                vec![
                    e.year.to_string(),
                    e.stars.to_string(),
                    e.forks.to_string(),
                    e.watchers.to_string(),
                    format_percent(e.stars_growth),
                    format_percent(e.forks_growth),
                    format_percent(e.watchers_growth),
                ]
            })
            .collect()
    }
}

const ENGAGEMENT_HEADERS: [&str; 7] = [
    "Year",
    "Stars",
    "Forks",
    "Watchers",
    "Stars growth",
    "Forks growth",
    "Watchers growth",
];

const DERIVED_HEADERS: [&str; 4] = [
    "Repository",
    "Issue resolution efficiency",
    "Popularity index",
    "Community involvement",
];

impl View for OverviewView {
    fn title(&self) -> &'static str {
        "Data Overview"
    }

    fn to_text(&self) -> String {
        let mut out = heading(self.title());

        out.push_str(&subheading(&format!(
            "Top {} Repositories by Stars",
            self.top_repositories.len()
        )));
        let bars: Vec<(String, f64)> = self
            .top_repositories
            .iter()
            .map(|r| (r.name.clone(), r.value as f64))
            .collect();
        out.push_str(&bar_chart(&bars, BAR_WIDTH));

        out.push_str(&subheading("Language Popularity Over the Years"));
        if self.language_popularity.is_empty() {
            out.push_str("  No repositories.\n");
        } else {
            out.push_str(&text_table(&self.popularity_headers(), &self.popularity_rows()));
            out.push('\n');
            let width = self
                .language_popularity
                .columns
                .iter()
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0);
            for column in &self.language_popularity.columns {
                let series = self.language_popularity.series(column).unwrap_or_default();
                let _ = writeln!(out, "  {column:<width$}  {}", sparkline(&series));
            }
        }

        out.push_str(&subheading("User Engagement Over Time"));
        out.push_str(&text_table(&ENGAGEMENT_HEADERS, &self.engagement_rows()));

        out.push_str(&subheading("Derived Metrics"));
        out.push_str(&text_table(&DERIVED_HEADERS, &self.derived_rows()));

        out.push_str(&subheading("Repository Insights"));
        match (&self.selected_repository, &self.gauges) {
            (_, Some(gauges)) => {
                let _ = writeln!(out, "  {}", gauges.repository);
                let width = gauges
                    .readings()
                    .iter()
                    .map(|g| g.title.chars().count())
                    .max()
                    .unwrap_or(0);
                for g in gauges.readings() {
                    let _ = writeln!(
                        out,
                        "  {:<width$}  {}",
                        g.title,
                        gauge_bar(g.value, g.max, GAUGE_WIDTH)
                    );
                }
            }
            (Some(name), None) => {
                let _ = writeln!(out, "  Repository not found: {name}");
            }
            (None, None) => out.push_str("  No repositories.\n"),
        }

        out
    }

    fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n\n", self.title());

        let _ = writeln!(
            out,
            "## Top {} Repositories by Stars\n",
            self.top_repositories.len()
        );
        let rows: Vec<Vec<String>> = self
            .top_repositories
            .iter()
            .enumerate()
            .map(|(i, r)| vec![(i + 1).to_string(), format!("`{}`", r.name), r.value.to_string()])
            .collect();
        out.push_str(&markdown_table(&["#", "Repository", "Stars"], &rows));

        out.push_str("\n## Language Popularity Over the Years\n\n");
        out.push_str(&markdown_table(&self.popularity_headers(), &self.popularity_rows()));

        out.push_str("\n## User Engagement Over Time\n\n");
        out.push_str(&markdown_table(&ENGAGEMENT_HEADERS, &self.engagement_rows()));

        out.push_str("\n## Derived Metrics\n\n");
        out.push_str(&markdown_table(&DERIVED_HEADERS, &self.derived_rows()));

        out.push_str("\n## Repository Insights\n\n");
        if let Some(gauges) = &self.gauges {
            let _ = writeln!(out, "Repository: `{}`\n", gauges.repository);
            let rows: Vec<Vec<String>> = gauges
                .readings()
                .iter()
                .map(|g| {
                    vec![
                        g.title.clone(),
                        format_number(g.value),
                        format_number(g.max),
                        format!("{:.0}%", g.fraction() * 100.0),
                    ]
                })
                .collect();
            out.push_str(&markdown_table(&["Metric", "Value", "Max", "Of max"], &rows));
        } else if let Some(name) = &self.selected_repository {
            let _ = writeln!(out, "Repository not found: `{name}`");
        }

        out
    }
}
