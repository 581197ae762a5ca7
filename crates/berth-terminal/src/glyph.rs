//! Uncoloured glyph matrices produced by the encoders.
//!
//! Geometry and colour are separate stages: widgets fill a [`GlyphGrid`] with
//! characters tagged by a semantic [`Tone`], and a
//! [`Theme`](crate::Theme) later maps tones to terminal colours.

use crate::severity::SeverityTier;
use crate::widgets::symbols::BRAILLE_BLANK;

/// Semantic tag deciding how a glyph is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    /// Part of the plotted series.
    Data(SeverityTier),
    /// Horizontal threshold gridline.
    Grid,
    /// Vertical time marker.
    Marker,
    /// Marker label text.
    Label,
    /// Nothing drawn.
    #[default]
    Blank,
}

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub tone: Tone,
}

impl Glyph {
    pub const BLANK: Self = Self {
        ch: BRAILLE_BLANK,
        tone: Tone::Blank,
    };

    /// Right half of a double-width label character; never printed.
    pub const CONTINUATION: Self = Self {
        ch: '\0',
        tone: Tone::Label,
    };

    #[must_use]
    pub const fn new(ch: char, tone: Tone) -> Self {
        Self { ch, tone }
    }

    /// True when nothing but an empty braille cell occupies this position.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.ch == BRAILLE_BLANK && matches!(self.tone, Tone::Blank | Tone::Data(_))
    }

    #[must_use]
    pub fn is_continuation(&self) -> bool {
        *self == Self::CONTINUATION
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Self::BLANK
    }
}

/// Row-major `rows × width` matrix of glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphGrid {
    width: usize,
    rows: usize,
    cells: Vec<Glyph>,
}

impl GlyphGrid {
    /// Grid filled with blank braille cells.
    #[must_use]
    pub fn new(width: usize, rows: usize) -> Self {
        Self {
            width,
            rows,
            cells: vec![Glyph::BLANK; width * rows],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn get(&self, col: usize, row: usize) -> Option<&Glyph> {
        if col < self.width && row < self.rows {
            self.cells.get(row * self.width + col)
        } else {
            None
        }
    }

    /// Overwrite one cell; out-of-bounds writes are ignored.
    pub fn set(&mut self, col: usize, row: usize, glyph: Glyph) {
        if col < self.width && row < self.rows {
            self.cells[row * self.width + col] = glyph;
        }
    }

    /// One row, left to right.
    #[must_use]
    pub fn row(&self, row: usize) -> &[Glyph] {
        if row < self.rows {
            &self.cells[row * self.width..(row + 1) * self.width]
        } else {
            &[]
        }
    }

    /// Rows top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Glyph]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    /// Characters only, rows joined by `\n`.
    #[must_use]
    pub fn to_plain(&self) -> String {
        self.iter_rows()
            .map(|row| {
                row.iter()
                    .filter(|g| !g.is_continuation())
                    .map(|g| g.ch)
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_new_is_blank() {
        let grid = GlyphGrid::new(3, 2);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.to_plain(), "⠀⠀⠀\n⠀⠀⠀");
        assert!(grid.get(2, 1).is_some_and(Glyph::is_blank));
    }

    #[test]
    fn test_grid_zero_size() {
        assert!(GlyphGrid::new(0, 4).is_empty());
        assert_eq!(GlyphGrid::new(5, 0).to_plain(), "");
    }

    #[test]
    fn test_grid_set_and_get() {
        let mut grid = GlyphGrid::new(2, 2);
        grid.set(1, 0, Glyph::new('⡇', Tone::Data(SeverityTier::Critical)));
        grid.set(7, 7, Glyph::new('x', Tone::Label));
        assert_eq!(grid.get(1, 0).map(|g| g.ch), Some('⡇'));
        assert!(grid.get(7, 7).is_none());
        assert_eq!(grid.to_plain(), "⠀⡇\n⠀⠀");
    }

    #[test]
    fn test_grid_row_out_of_range() {
        let grid = GlyphGrid::new(2, 1);
        assert_eq!(grid.row(0).len(), 2);
        assert!(grid.row(1).is_empty());
    }

    #[test]
    fn test_continuation_not_printed() {
        let mut grid = GlyphGrid::new(3, 1);
        grid.set(0, 0, Glyph::new('日', Tone::Label));
        grid.set(1, 0, Glyph::CONTINUATION);
        assert_eq!(grid.to_plain(), "日⠀");
    }

    #[test]
    fn test_glyph_is_blank() {
        assert!(Glyph::BLANK.is_blank());
        assert!(Glyph::new(BRAILLE_BLANK, Tone::Data(SeverityTier::Normal)).is_blank());
        assert!(!Glyph::new('─', Tone::Grid).is_blank());
        assert!(!Glyph::new('⣀', Tone::Data(SeverityTier::Normal)).is_blank());
    }
}
