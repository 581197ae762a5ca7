//! Braille graph widgets.
//!
//! Every widget produces an uncoloured [`GlyphGrid`](crate::GlyphGrid) via
//! `glyphs()` and a styled string via `render()`.

mod braille;
mod graph;
mod grid;
mod sparkline;
pub(crate) mod symbols;

pub use braille::{dot_height, encode, resolve_ceiling, Encoded};
pub use graph::Graph;
pub use grid::{format_age, time_markers, GraphWithGrid, VLine};
pub use sparkline::Sparkline;
pub use symbols::{is_braille, BRAILLE_BLANK, BRAILLE_FULL};
