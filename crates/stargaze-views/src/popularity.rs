//! Popularity Insights: stars against forks and pull requests, and
//! watchers per repository.

use std::fmt::Write;

use serde::Serialize;
use stargaze_data::Dataset;
use stargaze_metrics::insights::{
    stars_vs_forks, stars_vs_pull_requests, watchers_by_repository, RankedRepository,
    ScatterPoint,
};

use crate::chart::{bar_chart, markdown_table, scatter_plot};
use crate::{heading, subheading, View};

const PLOT_WIDTH: usize = 60;
const PLOT_HEIGHT: usize = 15;
const BAR_WIDTH: usize = 40;

/// Closing remark shown under the charts.
pub const NOTE: &str = "Stars indicate how much attention a repository gets \
from the community, and forks, the number of times other users copied it, \
are another sign of popularity. Pull requests represent active contributions. \
Comparing them shows whether a repository's popularity matches how actively \
people contribute to it.";

/// The Popularity Insights view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularityView {
    /// One point per aggregate row.
    pub stars_vs_forks: Vec<ScatterPoint>,
    /// One point per aggregate row.
    pub stars_vs_pull_requests: Vec<ScatterPoint>,
    /// Largest watcher count per time series repository.
    pub watchers: Vec<RankedRepository>,
    /// Explanatory remark.
    pub note: &'static str,
}

impl PopularityView {
    /// Build the view. Scatters come from the aggregate dataset, watchers
    /// from the time series.
    pub fn build(dataset: &Dataset) -> Self {
        Self {
            stars_vs_forks: stars_vs_forks(&dataset.repositories.records),
            stars_vs_pull_requests: stars_vs_pull_requests(&dataset.repositories.records),
            watchers: watchers_by_repository(&dataset.time_series.records),
            note: NOTE,
        }
    }
}

fn points(series: &[ScatterPoint]) -> Vec<(u64, u64)> {
    series.iter().map(|p| (p.x, p.y)).collect()
}

fn scatter_rows(series: &[ScatterPoint]) -> Vec<Vec<String>> {
    series
        .iter()
        .map(|p| vec![p.label.clone(), p.x.to_string(), p.y.to_string()])
        .collect()
}

impl View for PopularityView {
    fn title(&self) -> &'static str {
        "Popularity Insights"
    }

    fn to_text(&self) -> String {
        let mut out = heading(self.title());

        out.push_str(&subheading("Stars vs Forks (x: stars, y: forks)"));
        out.push_str(&scatter_plot(&points(&self.stars_vs_forks), PLOT_WIDTH, PLOT_HEIGHT));

        out.push_str(&subheading(
            "Stars vs Pull Requests (x: stars, y: pull requests)",
        ));
        out.push_str(&scatter_plot(
            &points(&self.stars_vs_pull_requests),
            PLOT_WIDTH,
            PLOT_HEIGHT,
        ));

        out.push_str(&subheading("Watchers by Repository"));
        let bars: Vec<(String, f64)> = self
            .watchers
            .iter()
            .map(|w| (w.name.clone(), w.value as f64))
            .collect();
        out.push_str(&bar_chart(&bars, BAR_WIDTH));

        let _ = writeln!(out, "\n{}", self.note);
        out
    }

    fn to_markdown(&self) -> String {
        let mut out = format!("# {}\n\n", self.title());

        out.push_str("## Stars vs Forks\n\n");
        out.push_str(&markdown_table(
            &["Repository", "Stars", "Forks"],
            &scatter_rows(&self.stars_vs_forks),
        ));

        out.push_str("\n## Stars vs Pull Requests\n\n");
        out.push_str(&markdown_table(
            &["Repository", "Stars", "Pull requests"],
            &scatter_rows(&self.stars_vs_pull_requests),
        ));

        out.push_str("\n## Watchers by Repository\n\n");
        let rows: Vec<Vec<String>> = self
            .watchers
            .iter()
            .map(|w| vec![w.name.clone(), w.value.to_string()])
            .collect();
        out.push_str(&markdown_table(&["Repository", "Watchers"], &rows));

        let _ = writeln!(out, "\n> {}", self.note);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use stargaze_data::{
        RepositoryRecord, RepositoryTable, RepositoryTimeSeriesRecord, TimeSeriesTable,
    };

    fn dataset() -> Dataset {
        let mut repo = RepositoryRecord::named("octo/cat");
        repo.stars_count = 100;
        repo.forks_count = 20;
        repo.pull_requests = 7;
        let series = |name: &str, watchers: u64| RepositoryTimeSeriesRecord {
            name: name.into(),
            created_at: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            stars_count: 0,
            forks_count: 0,
            watchers,
            pull_requests: 0,
            commit_count: 0,
            languages_used: vec![],
        };
        Dataset {
            repositories: RepositoryTable {
                source: "repos.csv".into(),
                count_columns: vec!["stars_count", "forks_count", "pull_requests"],
                records: vec![repo],
            },
            time_series: TimeSeriesTable {
                source: "series.csv".into(),
                records: vec![series("zeta", 4), series("alpha", 2), series("zeta", 9)],
            },
        }
    }

    #[test]
    fn scatters_use_aggregate_rows() {
        let view = PopularityView::build(&dataset());
        assert_eq!(view.stars_vs_forks[0].y, 20);
        assert_eq!(view.stars_vs_pull_requests[0].y, 7);
    }

    #[test]
    fn watchers_take_max_per_name() {
        let view = PopularityView::build(&dataset());
        let watchers: Vec<_> = view.watchers.iter().map(|w| (w.name.as_str(), w.value)).collect();
        assert_eq!(watchers, vec![("alpha", 2), ("zeta", 9)]);
    }

    #[test]
    fn text_ends_with_note() {
        let text = PopularityView::build(&dataset()).to_text();
        assert!(text.contains("Stars vs Forks"));
        assert!(text.trim_end().ends_with("contribute to it."));
    }

    #[test]
    fn markdown_quotes_note() {
        let md = PopularityView::build(&dataset()).to_markdown();
        assert!(md.contains("| octo/cat | 100 | 20 |"));
        assert!(md.contains("> Stars indicate how much attention"));
        assert!(md.starts_with("# Popularity Insights"));
    }
}
