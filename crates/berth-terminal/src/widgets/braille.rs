//! Braille cell encoder shared by [`Sparkline`](super::Sparkline) and
//! [`Graph`](super::Graph).
//!
//! Each cell covers two samples horizontally and four dots vertically, so a
//! `width × rows` area shows up to `width * 2` samples at `rows * 4` levels.

use super::symbols::{braille, column_bits, LEFT_DOTS, RIGHT_DOTS};
use crate::glyph::{Glyph, GlyphGrid, Tone};
use crate::severity::SeverityTier;
use berth_core::fit_to_width;

/// Output of [`encode`]: uncoloured data glyphs plus the scale they were
/// drawn against.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    pub grid: GlyphGrid,
    /// Value mapped to the top dot row.
    pub ceiling: f64,
    /// Most recent plotted sample.
    pub last: f64,
}

/// Ceiling to plot against: `requested` when positive, else the largest
/// finite sample, else 1.
#[must_use]
pub fn resolve_ceiling(samples: &[f64], requested: f64) -> f64 {
    if requested.is_finite() && requested > 0.0 {
        return requested;
    }
    let max = samples
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

/// Lit dots for `value` out of `dot_rows`. Any positive value shows at
/// least one dot; negative and non-finite values show none.
#[must_use]
pub fn dot_height(value: f64, ceiling: f64, dot_rows: usize) -> usize {
    if !value.is_finite() || value <= 0.0 || ceiling <= 0.0 {
        return 0;
    }
    let scaled = (value / ceiling * dot_rows as f64).floor();
    let height = if scaled >= dot_rows as f64 {
        dot_rows
    } else {
        scaled as usize
    };
    height.max(1)
}

/// Encode `series` into a `width × rows` braille grid.
///
/// Returns `None` for a zero-sized area or an empty series. Data anchors to
/// the right edge; unused cells on the left stay blank.
#[must_use]
pub fn encode(series: &[f64], width: usize, rows: usize, ceiling: f64) -> Option<Encoded> {
    if width == 0 || rows == 0 || series.is_empty() {
        return None;
    }
    let samples = fit_to_width(series, width * 2);
    let ceiling = resolve_ceiling(&samples, ceiling);
    let dot_rows = rows * 4;
    let heights: Vec<usize> = samples
        .iter()
        .map(|v| dot_height(*v, ceiling, dot_rows))
        .collect();

    let cells = heights.len().div_ceil(2);
    let pad = width.saturating_sub(cells);
    let mut grid = GlyphGrid::new(width, rows);

    for (i, pair) in heights.chunks(2).enumerate() {
        let left = pair[0];
        let right = pair.get(1).copied().unwrap_or(0);
        for row in 0..rows {
            let bottom_dot = (rows - 1 - row) * 4;
            let bits = column_bits(&LEFT_DOTS, left.saturating_sub(bottom_dot))
                | column_bits(&RIGHT_DOTS, right.saturating_sub(bottom_dot));
            grid.set(
                pad + i,
                row,
                Glyph::new(braille(bits), Tone::Data(SeverityTier::Normal)),
            );
        }
    }

    let last = samples.last().copied().unwrap_or(0.0);
    Some(Encoded {
        grid,
        ceiling,
        last,
    })
}
