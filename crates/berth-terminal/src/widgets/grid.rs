//! Severity gridlines and time markers drawn over a [`Graph`].
//!
//! Overlay glyphs only ever occupy cells the data left empty, so the plotted
//! series is never hidden. Gridlines are dashed (`─` on even columns) and
//! become `┼` where they cross a time marker; markers are `│` on every third
//! row. Marker labels sit on one row, centred on their column, and are
//! dropped left to right when they would collide.

use super::graph::Graph;
use super::symbols::{GRID_CROSS, GRID_HORIZONTAL, GRID_VERTICAL};
use crate::glyph::{Glyph, GlyphGrid, Tone};
use std::time::Duration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Vertical time marker.
#[derive(Debug, Clone, PartialEq)]
pub struct VLine {
    /// 0.0 is the newest sample (right edge), 1.0 the oldest (left edge).
    pub position: f64,
    pub label: Option<String>,
}

impl VLine {
    #[must_use]
    pub fn new(position: f64) -> Self {
        Self {
            position,
            label: None,
        }
    }

    #[must_use]
    pub fn labeled(position: f64, label: impl Into<String>) -> Self {
        Self {
            position,
            label: Some(label.into()),
        }
    }

    /// Column of the marker in a graph `width` cells wide.
    #[must_use]
    pub fn column(&self, width: usize) -> Option<usize> {
        if width == 0 || !self.position.is_finite() {
            return None;
        }
        let pos = self.position.clamp(0.0, 1.0);
        Some(((1.0 - pos) * (width - 1) as f64).round() as usize)
    }
}

/// Evenly spaced markers labelled with their age, e.g. `-30s`, `-5m`, `-1h`.
///
/// `samples` is how many samples span the graph and `sample_interval` the
/// time between two of them. A marker is placed every `every`, starting one
/// step back from the newest sample; ages past the graph's span are skipped.
#[must_use]
pub fn time_markers(sample_interval: Duration, samples: usize, every: Duration) -> Vec<VLine> {
    let span = sample_interval.saturating_mul(samples.saturating_sub(1) as u32);
    if every.is_zero() || span.is_zero() {
        return Vec::new();
    }
    let mut markers = Vec::new();
    let mut age = every;
    while age <= span {
        let position = age.as_secs_f64() / span.as_secs_f64();
        markers.push(VLine::labeled(position, format_age(age)));
        age += every;
    }
    markers
}

/// Compact relative age: `-45s`, `-5m`, `-1h`, `-1h30m`.
#[must_use]
pub fn format_age(age: Duration) -> String {
    let secs = age.as_secs();
    match (secs / 3600, (secs % 3600) / 60, secs % 60) {
        (0, 0, s) => format!("-{s}s"),
        (0, m, 0) => format!("-{m}m"),
        (0, m, s) => format!("-{m}m{s}s"),
        (h, 0, _) => format!("-{h}h"),
        (h, m, _) => format!("-{h}h{m}m"),
    }
}

/// [`Graph`] with threshold gridlines and time markers.
#[derive(Debug, Clone)]
pub struct GraphWithGrid<'a> {
    graph: Graph<'a>,
    /// Threshold heights in percent of the ceiling.
    gridlines: Vec<f64>,
    vlines: Vec<VLine>,
    label_row: Option<usize>,
}

impl<'a> GraphWithGrid<'a> {
    #[must_use]
    pub fn new(graph: Graph<'a>) -> Self {
        Self {
            graph,
            gridlines: Vec::new(),
            vlines: Vec::new(),
            label_row: None,
        }
    }

    #[must_use]
    pub fn with_gridlines(mut self, percents: impl IntoIterator<Item = f64>) -> Self {
        self.gridlines = percents.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_vlines(mut self, vlines: impl IntoIterator<Item = VLine>) -> Self {
        self.vlines = vlines.into_iter().collect();
        self
    }

    /// Row carrying marker labels; defaults to the bottom row.
    #[must_use]
    pub fn with_label_row(mut self, row: usize) -> Self {
        self.label_row = Some(row);
        self
    }

    /// Uncoloured glyphs; empty for degenerate input.
    #[must_use]
    pub fn glyphs(&self) -> GlyphGrid {
        let mut grid = self.graph.glyphs();
        if grid.is_empty() {
            return grid;
        }
        let width = grid.width();
        let mut columns: Vec<usize> = self.vlines.iter().filter_map(|v| v.column(width)).collect();
        columns.sort_unstable();
        columns.dedup();

        for percent in &self.gridlines {
            if let Some(row) = gridline_row(*percent, grid.rows()) {
                draw_gridline(&mut grid, row, &columns);
            }
        }
        for col in &columns {
            draw_marker(&mut grid, *col);
        }
        self.draw_labels(&mut grid);
        grid
    }

    /// Styled string; empty for degenerate input.
    #[must_use]
    pub fn render(&self) -> String {
        self.graph.theme().paint(&self.glyphs(), self.graph.color())
    }

    fn draw_labels(&self, grid: &mut GlyphGrid) {
        let width = grid.width();
        let row = self
            .label_row
            .unwrap_or(usize::MAX)
            .min(grid.rows().saturating_sub(1));

        let mut labels: Vec<(usize, &str)> = self
            .vlines
            .iter()
            .filter_map(|v| Some((v.column(width)?, v.label.as_deref()?)))
            .filter(|(_, label)| !label.is_empty())
            .collect();
        labels.sort_by_key(|(col, _)| *col);

        let mut prev_end: Option<usize> = None;
        for (col, label) in labels {
            let len = UnicodeWidthStr::width(label);
            if len == 0 || len > width {
                continue;
            }
            let start = col.saturating_sub(len / 2).min(width - len);
            if prev_end.is_some_and(|end| start <= end) {
                continue;
            }
            write_label(grid, row, start, label);
            prev_end = Some(start + len);
        }
    }
}

/// Character row of a gridline at `percent` of the ceiling.
fn gridline_row(percent: f64, rows: usize) -> Option<usize> {
    if !percent.is_finite() || rows == 0 {
        return None;
    }
    let dot_rows = rows * 4;
    let dot = (percent.clamp(0.0, 100.0) / 100.0 * dot_rows as f64).round() as usize;
    let dot = dot.min(dot_rows - 1);
    Some(rows - 1 - dot / 4)
}

fn draw_gridline(grid: &mut GlyphGrid, row: usize, markers: &[usize]) {
    for col in 0..grid.width() {
        if !grid.get(col, row).is_some_and(Glyph::is_blank) {
            continue;
        }
        if markers.binary_search(&col).is_ok() {
            grid.set(col, row, Glyph::new(GRID_CROSS, Tone::Grid));
        } else if col % 2 == 0 {
            grid.set(col, row, Glyph::new(GRID_HORIZONTAL, Tone::Grid));
        }
    }
}

fn draw_marker(grid: &mut GlyphGrid, col: usize) {
    for row in (0..grid.rows()).step_by(3) {
        if grid.get(col, row).is_some_and(Glyph::is_blank) {
            grid.set(col, row, Glyph::new(GRID_VERTICAL, Tone::Marker));
        }
    }
}

fn write_label(grid: &mut GlyphGrid, row: usize, start: usize, label: &str) {
    let mut col = start;
    for ch in label.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w == 0 {
            continue;
        }
        grid.set(col, row, Glyph::new(ch, Tone::Label));
        for extra in 1..w {
            grid.set(col + extra, row, Glyph::CONTINUATION);
        }
        col += w;
    }
}
