//! One-call rendering with the default theme.
//!
//! Each function is pure and returns a styled string, or an empty string
//! for zero width, zero rows or an empty series. Use the widget builders
//! for themes, thresholds and colour overrides.

use crate::widgets::{Graph, GraphWithGrid, Sparkline, VLine};

/// One-row braille sparkline scaled to the series maximum.
#[must_use]
pub fn render_sparkline(series: &[f64], width: usize) -> String {
    Sparkline::new(series, width).render()
}

/// `rows`-high braille graph. A `ceiling` of zero or less scales to the
/// series maximum.
#[must_use]
pub fn render_graph(series: &[f64], width: usize, rows: usize, ceiling: f64) -> String {
    Graph::new(series, width, rows)
        .with_ceiling(ceiling)
        .render()
}

/// [`render_graph`] plus gridlines at `grid_percents` of the ceiling and
/// time markers at `vlines`.
#[must_use]
pub fn render_graph_with_grid(
    series: &[f64],
    width: usize,
    rows: usize,
    ceiling: f64,
    grid_percents: &[f64],
    vlines: &[VLine],
) -> String {
    GraphWithGrid::new(Graph::new(series, width, rows).with_ceiling(ceiling))
        .with_gridlines(grid_percents.iter().copied())
        .with_vlines(vlines.iter().cloned())
        .render()
}
