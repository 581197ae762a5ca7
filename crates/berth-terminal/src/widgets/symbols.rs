//! Braille and box-drawing symbols for graph rendering.
//!
//! A braille cell is `U+2800 | bits` with a 2×4 dot matrix:
//!
//! ```text
//! 0x01 0x08
//! 0x02 0x10
//! 0x04 0x20
//! 0x40 0x80
//! ```
//!
//! The tables below are indexed by dot offset counted from the bottom of the
//! cell, so index 0 is the lowest dot of each sub-column.

/// Empty braille cell.
pub const BRAILLE_BLANK: char = '\u{2800}';

/// Fully lit braille cell.
pub const BRAILLE_FULL: char = '\u{28FF}';

/// Left sub-column bits, bottom to top.
pub(crate) const LEFT_DOTS: [u8; 4] = [0x40, 0x04, 0x02, 0x01];

/// Right sub-column bits, bottom to top.
pub(crate) const RIGHT_DOTS: [u8; 4] = [0x80, 0x20, 0x10, 0x08];

/// Dashed horizontal gridline segment.
pub(crate) const GRID_HORIZONTAL: char = '─';

/// Vertical time marker tick.
pub(crate) const GRID_VERTICAL: char = '│';

/// Gridline crossing a time marker.
pub(crate) const GRID_CROSS: char = '┼';

/// Braille character with the given dot bits set.
#[inline]
#[must_use]
pub(crate) fn braille(bits: u8) -> char {
    char::from_u32(0x2800 + u32::from(bits)).unwrap_or(BRAILLE_BLANK)
}

/// Bits lighting the lowest `height` dots of one sub-column (0..=4).
#[inline]
#[must_use]
pub(crate) fn column_bits(dots: &[u8; 4], height: usize) -> u8 {
    dots.iter().take(height).fold(0, |acc, bit| acc | bit)
}

/// True for any braille pattern, blank included.
#[inline]
#[must_use]
pub fn is_braille(ch: char) -> bool {
    ('\u{2800}'..='\u{28FF}').contains(&ch)
}
