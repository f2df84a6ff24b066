//! Plain-text chart primitives shared by the views.

use std::fmt::Write;

const BAR: char = '\u{2588}';
const SPARKS: [char; 8] = [
    '\u{2581}', '\u{2582}', '\u{2583}', '\u{2584}', '\u{2585}', '\u{2586}', '\u{2587}', '\u{2588}',
];
const SHADES: [char; 5] = [' ', '\u{2591}', '\u{2592}', '\u{2593}', '\u{2588}'];

/// Horizontal bar chart, one labelled bar per row, scaled to the largest value.
///
/// # Examples
///
/// ```
/// use stargaze_views::chart::bar_chart;
///
/// let out = bar_chart(&[("a".into(), 10.0), ("b".into(), 5.0)], 10);
/// assert!(out.contains("a  ██████████ 10"));
/// assert!(out.contains("b  █████ 5"));
/// ```
pub fn bar_chart(rows: &[(String, f64)], width: usize) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max = rows.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);

    let mut out = String::new();
    for (label, value) in rows {
        let len = if max > 0.0 {
            ((value / max) * width as f64).round() as usize
        } else {
            0
        };
        let bar: String = std::iter::repeat(BAR).take(len).collect();
        let _ = writeln!(
            out,
            "{label:<label_width$}  {bar} {}",
            format_number(*value)
        );
    }
    out
}

/// One-line sparkline of `values`, scaled to their maximum.
///
/// # Examples
///
/// ```
/// use stargaze_views::chart::sparkline;
///
/// assert_eq!(sparkline(&[0, 3, 7]), "▁▄█");
/// assert_eq!(sparkline(&[0, 0]), "▁▁");
/// ```
pub fn sparkline(values: &[u64]) -> String {
    let max = values.iter().copied().max().unwrap_or(0);
    values
        .iter()
        .map(|&v| {
            if max == 0 {
                SPARKS[0]
            } else {
                let idx = (v as f64 / max as f64 * (SPARKS.len() - 1) as f64).round() as usize;
                SPARKS[idx.min(SPARKS.len() - 1)]
            }
        })
        .collect()
}

/// Gauge as a bracketed meter: `[██████····]  6.00 / 10.00`.
///
/// # Examples
///
/// ```
/// use stargaze_views::chart::gauge_bar;
///
/// assert_eq!(gauge_bar(5.0, 10.0, 4), "[██··] 5.00 / 10.00");
/// ```
pub fn gauge_bar(value: f64, max: f64, width: usize) -> String {
    let fraction = if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (fraction * width as f64).round() as usize;
    let bar: String = std::iter::repeat(BAR)
        .take(filled)
        .chain(std::iter::repeat('\u{b7}').take(width - filled))
        .collect();
    format!("[{bar}] {value:.2} / {max:.2}")
}

/// Shade character for a correlation coefficient: darker means stronger,
/// regardless of sign.
pub fn shade(r: Option<f64>) -> char {
    match r {
        None => '?',
        Some(r) => {
            let idx = (r.abs() * (SHADES.len() - 1) as f64).round() as usize;
            SHADES[idx.min(SHADES.len() - 1)]
        }
    }
}

/// Scatter plot on a character grid. Overlapping points are drawn once.
///
/// # Examples
///
/// ```
/// use stargaze_views::chart::scatter_plot;
///
/// let out = scatter_plot(&[(0, 0), (10, 10)], 11, 3);
/// let lines: Vec<&str> = out.lines().collect();
/// assert!(lines[0].ends_with('*'));
/// assert!(lines[2].contains("|*"));
/// ```
pub fn scatter_plot(points: &[(u64, u64)], width: usize, height: usize) -> String {
    if points.is_empty() || width == 0 || height == 0 {
        return String::new();
    }
    let max_x = points.iter().map(|p| p.0).max().unwrap_or(0).max(1) as f64;
    let max_y = points.iter().map(|p| p.1).max().unwrap_or(0).max(1) as f64;

    let mut grid = vec![vec![' '; width]; height];
    for &(x, y) in points {
        let col = ((x as f64 / max_x) * (width - 1) as f64).round() as usize;
        let row = ((y as f64 / max_y) * (height - 1) as f64).round() as usize;
        grid[height - 1 - row][col] = '*';
    }

    let top = format_number(max_y);
    let axis_width = top.chars().count().max(1);
    let mut out = String::new();
    for (i, row) in grid.iter().enumerate() {
        let label = if i == 0 {
            top.clone()
        } else if i == height - 1 {
            "0".to_string()
        } else {
            String::new()
        };
        let line: String = row.iter().collect();
        let _ = writeln!(out, "{label:>axis_width$} |{}", line.trim_end());
    }
    let _ = writeln!(
        out,
        "{:>axis_width$} +{}",
        "",
        "-".repeat(width)
    );
    let right = format_number(max_x);
    let _ = writeln!(
        out,
        "{:>axis_width$}  0{right:>pad$}",
        "",
        pad = width.saturating_sub(1)
    );
    out
}

/// Left-aligned text table with a dashed rule under the header. Columns
/// after the first are right-aligned.
///
/// # Examples
///
/// ```
/// use stargaze_views::chart::text_table;
///
/// let out = text_table(&["name", "stars"], &[vec!["a".into(), "10".into()]]);
/// assert_eq!(out.lines().next(), Some("name  stars"));
/// assert_eq!(out.lines().nth(2), Some("a        10"));
/// ```
pub fn text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        if i == 0 {
            let _ = write!(line, "{cell:<width$}");
        } else {
            let _ = write!(line, "  {cell:>width$}");
        }
    }
    let _ = writeln!(out, "{}", line.trim_end());
}

/// GitHub-flavored Markdown table.
///
/// # Examples
///
/// ```
/// use stargaze_views::chart::markdown_table;
///
/// let out = markdown_table(&["a", "b"], &[vec!["1".into(), "2".into()]]);
/// assert_eq!(out, "| a | b |\n|---|---|\n| 1 | 2 |\n");
/// ```
pub fn markdown_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "| {} |", headers.join(" | "));
    let _ = writeln!(out, "|{}", "---|".repeat(headers.len()));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| c.replace('|', "\\|")).collect();
        let _ = writeln!(out, "| {} |", cells.join(" | "));
    }
    out
}

/// Format a value without a trailing `.00` when it is whole.
///
/// # Examples
///
/// ```
/// use stargaze_views::chart::format_number;
///
/// assert_eq!(format_number(12.0), "12");
/// assert_eq!(format_number(0.5), "0.50");
/// ```
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Format an optional percentage, `-` when undefined.
pub fn format_percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:+.1}%"))
}
