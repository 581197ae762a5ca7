//! Single-row braille sparkline.

use super::braille::encode;
use crate::color::Rgb;
use crate::glyph::{GlyphGrid, Tone};
use crate::severity::SeverityThresholds;
use crate::theme::Theme;

/// One-row braille graph coloured by the severity of its newest sample.
#[derive(Debug, Clone)]
pub struct Sparkline<'a> {
    series: &'a [f64],
    width: usize,
    ceiling: f64,
    thresholds: SeverityThresholds,
    theme: Theme,
    color: Option<Rgb>,
}

impl<'a> Sparkline<'a> {
    #[must_use]
    pub fn new(series: &'a [f64], width: usize) -> Self {
        Self {
            series,
            width,
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

    /// Uncoloured glyphs; empty for degenerate input.
    #[must_use]
    pub fn glyphs(&self) -> GlyphGrid {
        let Some(encoded) = encode(self.series, self.width, 1, self.ceiling) else {
            return GlyphGrid::new(0, 0);
        };
        let tier = self.thresholds.classify_value(encoded.last, encoded.ceiling);
        let mut grid = encoded.grid;
        for col in 0..grid.width() {
            if let Some(mut glyph) = grid.get(col, 0).copied() {
                if let Tone::Data(_) = glyph.tone {
                    glyph.tone = Tone::Data(tier);
                    grid.set(col, 0, glyph);
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
