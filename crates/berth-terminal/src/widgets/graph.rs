//! Multi-row braille time-series graph.

use super::braille::encode;
use crate::color::Rgb;
use crate::glyph::{GlyphGrid, Tone};
use crate::severity::SeverityThresholds;
use crate::theme::Theme;

/// Braille graph whose rows are coloured by their height band.
#[derive(Debug, Clone)]
pub struct Graph<'a> {
    series: &'a [f64],
    width: usize,
    rows: usize,
    ceiling: f64,
    thresholds: SeverityThresholds,
    theme: Theme,
    color: Option<Rgb>,
}

impl<'a> Graph<'a> {
    #[must_use]
    pub fn new(series: &'a [f64], width: usize, rows: usize) -> Self {
        Self {
            series,
            width,
            rows,
            ceiling: 0.0,
            thresholds: SeverityThresholds::default(),
            theme: Theme::default(),
            color: None,
        }
    }

    /// Fixed ceiling; zero or negative means the observed maximum.
    #[must_use]
    pub fn with_ceiling(mut self, ceiling: f64) -> Self {
        self.ceiling = ceiling;
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: SeverityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Pin every data glyph to one colour instead of tier colours.
    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub(crate) fn theme(&self) -> &Theme {
        &self.theme
    }

    pub(crate) fn color(&self) -> Option<Rgb> {
        self.color
    }

    /// Uncoloured glyphs; empty for degenerate input.
    #[must_use]
    pub fn glyphs(&self) -> GlyphGrid {
        let Some(encoded) = encode(self.series, self.width, self.rows, self.ceiling) else {
            return GlyphGrid::new(0, 0);
        };
        let mut grid = encoded.grid;
        let rows = self.rows as f64;
        for row in 0..self.rows {
            // Midpoint of the row's vertical band, as a fraction of the ceiling.
            let band = (rows - row as f64 - 0.5) / rows;
            let tier = self.thresholds.classify(band);
            for col in 0..self.width {
                if let Some(mut glyph) = grid.get(col, row).copied() {
                    if let Tone::Data(_) = glyph.tone {
                        glyph.tone = Tone::Data(tier);
                        grid.set(col, row, glyph);
                    }
                }
            }
        }
        grid
    }

    /// Styled string; empty for degenerate input.
    #[must_use]
    pub fn render(&self) -> String {
        self.theme.paint(&self.glyphs(), self.color)
    }
}
