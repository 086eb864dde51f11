use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde_json::json;

use crate::models::{DailyCounts, HeatmapGrid};

/// Trailing window length, ending today inclusive.
pub const WINDOW_DAYS: i64 = 60;

/// Counts above this cap all map to the top of the color scale. Hover text
/// still shows the true count.
pub const COUNT_CAP: u64 = 25;

const CELL_PX: u64 = 20;
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Continuous 4-stop color gradient: empty, low, medium, high.
const COLORSCALE: [(f64, &str); 4] = [
    (0.0, "#ebedf0"),
    (0.25, "#e74c3c"),
    (0.5, "#f1c40f"),
    (1.0, "#2ecc71"),
];

/// Lays the trailing window onto the weekday-by-week grid. Every date in
/// the window gets a cell, zero-count dates included; the few cells past
/// the window remain at their defaults.
pub fn build_grid(counts: &DailyCounts, today: NaiveDate) -> HeatmapGrid {
    let start_date = today - Duration::days(WINDOW_DAYS - 1);
    let weeks = (WINDOW_DAYS as usize).div_ceil(7);
    let mut grid = HeatmapGrid::empty(weeks);

    for offset in 0..WINDOW_DAYS {
        let date = start_date + Duration::days(offset);
        let week_idx = (offset / 7) as usize;
        let day_idx = date.weekday().num_days_from_monday() as usize;
        let count = counts.get(&date).copied().unwrap_or(0);

        grid.z[day_idx][week_idx] = count.min(COUNT_CAP);
        grid.hover[day_idx][week_idx] = Some(hover_label(date, count));
    }

    grid
}

fn hover_label(date: NaiveDate, count: u64) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{date}: {count} application{suffix}")
}

/// Renders the grid as a self-contained HTML document. Plotly.js comes from
/// the CDN; interaction chrome is disabled except hover tooltips.
pub fn render_html(grid: &HeatmapGrid) -> String {
    let colorscale: Vec<_> = COLORSCALE
        .iter()
        .map(|(position, color)| json!([position, color]))
        .collect();

    let trace = json!({
        "type": "heatmap",
        "z": grid.z,
        "text": grid.hover,
        "hoverinfo": "text",
        "x": (0..grid.weeks).collect::<Vec<_>>(),
        "y": (0..7).collect::<Vec<_>>(),
        "colorscale": colorscale,
        "showscale": false,
        "xgap": 2,
        "ygap": 2,
        "zmin": 0,
        "zmax": COUNT_CAP,
    });

    let layout = json!({
        "width": grid.weeks as u64 * CELL_PX,
        "height": 7 * CELL_PX,
        "margin": { "l": 10, "r": 10, "t": 10, "b": 10 },
        "paper_bgcolor": "rgba(0,0,0,0)",
        "plot_bgcolor": "rgba(0,0,0,0)",
        "xaxis": {
            "visible": false,
            "showgrid": false,
            "zeroline": false,
            "scaleanchor": "y",
        },
        "yaxis": {
            "visible": false,
            "showgrid": false,
            "zeroline": false,
            "autorange": "reversed",
        },
    });

    let config = json!({ "displayModeBar": false });

    let mut html = String::new();
    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html>");
    let _ = writeln!(html, "<head>");
    let _ = writeln!(html, "<meta charset=\"utf-8\">");
    let _ = writeln!(html, "<title>Application Heatmap</title>");
    let _ = writeln!(html, "<script src=\"{PLOTLY_CDN}\"></script>");
    let _ = writeln!(html, "</head>");
    let _ = writeln!(html, "<body>");
    let _ = writeln!(html, "<div id=\"heatmap\"></div>");
    let _ = writeln!(html, "<script>");
    let _ = writeln!(
        html,
        "Plotly.newPlot(\"heatmap\", [{trace}], {layout}, {config});"
    );
    let _ = writeln!(html, "</script>");
    let _ = writeln!(html, "</body>");
    let _ = writeln!(html, "</html>");

    html
}

/// Builds the grid for the window ending today and writes the chart file,
/// creating the output directory if needed.
pub fn write_heatmap(counts: &DailyCounts, out: &Path) -> anyhow::Result<()> {
    let grid = build_grid(counts, Local::now().date_naive());
    let html = render_html(&grid);

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    std::fs::write(out, html)
        .with_context(|| format!("failed to write {}", out.display()))?;

    println!("Interactive grid saved to {}.", out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyCounts;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn populated_cells(grid: &HeatmapGrid) -> usize {
        grid.hover
            .iter()
            .flatten()
            .filter(|label| label.is_some())
            .count()
    }

    #[test]
    fn empty_counts_fill_every_window_cell_with_zero() {
        let today = date(2026, 8, 23);
        let grid = build_grid(&DailyCounts::new(), today);

        assert_eq!(grid.weeks, 9);
        assert_eq!(populated_cells(&grid), 60);
        assert!(grid.z.iter().flatten().all(|&z| z == 0));

        let today_label = grid
            .hover
            .iter()
            .flatten()
            .flatten()
            .find(|label| label.starts_with("2026-08-23"))
            .expect("today must have a cell");
        assert_eq!(today_label, "2026-08-23: 0 applications");
    }

    #[test]
    fn remainder_cells_stay_at_defaults() {
        let grid = build_grid(&DailyCounts::new(), date(2026, 8, 23));
        let total = grid.weeks * 7;
        assert_eq!(total - populated_cells(&grid), 3);
    }

    #[test]
    fn single_application_today_marks_one_cell() {
        let today = date(2026, 8, 23);
        let mut counts = DailyCounts::new();
        counts.insert(today, 1);

        let grid = build_grid(&counts, today);
        let nonzero: Vec<_> = grid
            .z
            .iter()
            .flatten()
            .filter(|&&z| z != 0)
            .collect();
        assert_eq!(nonzero, vec![&1]);

        // today is the last day of the window: offset 59, column 8
        let day_idx = today.weekday().num_days_from_monday() as usize;
        assert_eq!(grid.z[day_idx][8], 1);
        assert_eq!(
            grid.hover[day_idx][8].as_deref(),
            Some("2026-08-23: 1 application")
        );
    }

    #[test]
    fn counts_clamp_for_color_but_not_for_hover() {
        let today = date(2026, 8, 23);
        let busy_day = today - Duration::days(1);
        let capped_day = today - Duration::days(2);

        let mut counts = DailyCounts::new();
        counts.insert(busy_day, 40);
        counts.insert(capped_day, 25);

        let grid = build_grid(&counts, today);
        let cell = |d: NaiveDate| {
            let offset = (d - (today - Duration::days(WINDOW_DAYS - 1))).num_days();
            let day_idx = d.weekday().num_days_from_monday() as usize;
            (day_idx, (offset / 7) as usize)
        };

        let (busy_row, busy_col) = cell(busy_day);
        let (capped_row, capped_col) = cell(capped_day);
        assert_eq!(grid.z[busy_row][busy_col], grid.z[capped_row][capped_col]);
        assert_eq!(grid.z[busy_row][busy_col], COUNT_CAP);
        assert_eq!(
            grid.hover[busy_row][busy_col].as_deref(),
            Some(format!("{busy_day}: 40 applications").as_str())
        );
    }

    #[test]
    fn window_cells_never_collide() {
        let mut seen = std::collections::HashSet::new();
        let today = date(2026, 8, 23);
        let start = today - Duration::days(WINDOW_DAYS - 1);
        for offset in 0..WINDOW_DAYS {
            let d = start + Duration::days(offset);
            let coords = (
                d.weekday().num_days_from_monday(),
                (offset / 7) as u32,
            );
            assert!(seen.insert(coords), "duplicate cell {coords:?}");
        }
    }

    #[test]
    fn html_is_self_contained_with_hover_only_chrome() {
        let grid = build_grid(&DailyCounts::new(), date(2026, 8, 23));
        let html = render_html(&grid);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains("\"displayModeBar\":false"));
        assert!(html.contains("\"hoverinfo\":\"text\""));
        assert!(html.contains("\"showscale\":false"));
        assert!(html.contains("2026-08-23: 0 applications"));
    }

    #[test]
    fn render_is_deterministic() {
        let mut counts = DailyCounts::new();
        counts.insert(date(2026, 8, 20), 3);
        let today = date(2026, 8, 23);

        let first = render_html(&build_grid(&counts, today));
        let second = render_html(&build_grid(&counts, today));
        assert_eq!(first, second);
    }
}
