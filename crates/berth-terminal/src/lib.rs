//! Braille graph rendering for the berth container dashboard.
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::cast_lossless)]
//!
//! Turns numeric histories retained by `berth_core` into Unicode braille
//! graphs. Rendering happens in two stages:
//!
//! 1. Geometry: [`Sparkline`], [`Graph`] and [`GraphWithGrid`] encode a
//!    series into a [`GlyphGrid`] whose cells carry a semantic [`Tone`].
//! 2. Colour: a [`Theme`] maps tones to terminal colours for the detected
//!    [`ColorMode`] and emits ANSI escapes.
//!
//! [`render_sparkline`], [`render_graph`] and [`render_graph_with_grid`]
//! run both stages with the default theme.
//!
//! # Quick start
//!
//! ```
//! use berth_terminal::render_graph;
//!
//! let cpu = [10.0, 20.0, 30.0, 40.0, 100.0];
//! let out = render_graph(&cpu, 3, 1, 0.0);
//! assert!(out.contains('⡇'));
//! ```

mod color;
mod error;
mod glyph;
mod render;
mod severity;
mod theme;
pub mod widgets;

pub use color::{ColorMode, Rgb};
pub use error::ThemeError;
pub use glyph::{Glyph, GlyphGrid, Tone};
pub use render::{render_graph, render_graph_with_grid, render_sparkline};
pub use severity::{SeverityThresholds, SeverityTier};
pub use theme::{Theme, ThemeSlot};
pub use widgets::{time_markers, Graph, GraphWithGrid, Sparkline, VLine};
