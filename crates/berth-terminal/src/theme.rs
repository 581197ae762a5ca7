//! Themes: the colouring stage applied to encoded glyph grids.
//!
//! Palettes follow the usual dark terminal schemes. Data glyphs take the
//! colour of their severity tier unless the caller pins a fixed colour.

use crate::color::{ColorMode, Rgb};
use crate::error::ThemeError;
use crate::glyph::{GlyphGrid, Tone};
use crate::severity::SeverityTier;
use crossterm::style::Stylize;

/// A themeable colour slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSlot {
    Tier(SeverityTier),
    Grid,
    Marker,
    Label,
}

/// Colours for each [`Tone`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub normal: Rgb,
    pub elevated: Rgb,
    pub critical: Rgb,
    pub grid: Rgb,
    pub marker: Rgb,
    pub label: Rgb,
    pub mode: ColorMode,
}

impl Default for Theme {
    fn default() -> Self {
        Self::tokyo_night()
    }
}

impl Theme {
    pub const NAMES: [&'static str; 4] = ["tokyo_night", "dracula", "nord", "monokai"];

    /// Tokyo Night theme (dark, modern).
    #[must_use]
    pub fn tokyo_night() -> Self {
        Self::preset(
            "tokyo_night",
            [
                Rgb::new(0x9e, 0xce, 0x6a),
                Rgb::new(0xe0, 0xaf, 0x68),
                Rgb::new(0xf7, 0x76, 0x8e),
                Rgb::new(0x41, 0x48, 0x68),
                Rgb::new(0x56, 0x5f, 0x89),
                Rgb::new(0xc0, 0xca, 0xf5),
            ],
        )
    }

    /// Dracula theme (dark, purple).
    #[must_use]
    pub fn dracula() -> Self {
        Self::preset(
            "dracula",
            [
                Rgb::new(0x50, 0xfa, 0x7b),
                Rgb::new(0xf1, 0xfa, 0x8c),
                Rgb::new(0xff, 0x55, 0x55),
                Rgb::new(0x44, 0x47, 0x5a),
                Rgb::new(0x62, 0x72, 0xa4),
                Rgb::new(0xf8, 0xf8, 0xf2),
            ],
        )
    }

    /// Nord theme (cool, arctic).
    #[must_use]
    pub fn nord() -> Self {
        Self::preset(
            "nord",
            [
                Rgb::new(0xa3, 0xbe, 0x8c),
                Rgb::new(0xeb, 0xcb, 0x8b),
                Rgb::new(0xbf, 0x61, 0x6a),
                Rgb::new(0x3b, 0x42, 0x52),
                Rgb::new(0x4c, 0x56, 0x6a),
                Rgb::new(0xec, 0xef, 0xf4),
            ],
        )
    }

    /// Monokai theme (classic).
    #[must_use]
    pub fn monokai() -> Self {
        Self::preset(
            "monokai",
            [
                Rgb::new(0xa6, 0xe2, 0x2e),
                Rgb::new(0xe6, 0xdb, 0x74),
                Rgb::new(0xf9, 0x26, 0x72),
                Rgb::new(0x49, 0x48, 0x3e),
                Rgb::new(0x75, 0x71, 0x5e),
                Rgb::new(0xf8, 0xf8, 0xf2),
            ],
        )
    }

    /// Built-in theme by name.
    pub fn by_name(name: &str) -> Result<Self, ThemeError> {
        match name {
            "tokyo_night" => Ok(Self::tokyo_night()),
            "dracula" => Ok(Self::dracula()),
            "nord" => Ok(Self::nord()),
            "monokai" => Ok(Self::monokai()),
            other => Err(ThemeError::UnknownTheme(other.to_string())),
        }
    }

    fn preset(name: &str, [normal, elevated, critical, grid, marker, label]: [Rgb; 6]) -> Self {
        Self {
            name: name.to_string(),
            normal,
            elevated,
            critical,
            grid,
            marker,
            label,
            mode: ColorMode::default(),
        }
    }

    /// Replace one slot from a hex string.
    pub fn with_hex(mut self, slot: ThemeSlot, hex: &str) -> Result<Self, ThemeError> {
        let color = Rgb::from_hex(hex)?;
        match slot {
            ThemeSlot::Tier(SeverityTier::Normal) => self.normal = color,
            ThemeSlot::Tier(SeverityTier::Elevated) => self.elevated = color,
            ThemeSlot::Tier(SeverityTier::Critical) => self.critical = color,
            ThemeSlot::Grid => self.grid = color,
            ThemeSlot::Marker => self.marker = color,
            ThemeSlot::Label => self.label = color,
        }
        Ok(self)
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ColorMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn tier_color(&self, tier: SeverityTier) -> Rgb {
        match tier {
            SeverityTier::Normal => self.normal,
            SeverityTier::Elevated => self.elevated,
            SeverityTier::Critical => self.critical,
        }
    }

    /// Colour for `tone`, with `data_override` replacing tier colours.
    #[must_use]
    pub fn tone_color(&self, tone: Tone, data_override: Option<Rgb>) -> Option<Rgb> {
        match tone {
            Tone::Data(tier) => Some(data_override.unwrap_or_else(|| self.tier_color(tier))),
            Tone::Grid => Some(self.grid),
            Tone::Marker => Some(self.marker),
            Tone::Label => Some(self.label),
            Tone::Blank => None,
        }
    }

    /// Render `grid` to a string with ANSI colour escapes, rows joined by
    /// `\n`. Adjacent cells of the same colour share one escape sequence.
    #[must_use]
    pub fn paint(&self, grid: &GlyphGrid, data_override: Option<Rgb>) -> String {
        let mut out = String::new();
        for (r, row) in grid.iter_rows().enumerate() {
            if r > 0 {
                out.push('\n');
            }
            let mut run = String::new();
            let mut run_color: Option<Rgb> = None;
            for glyph in row.iter().filter(|g| !g.is_continuation()) {
                let color = self.tone_color(glyph.tone, data_override);
                if color != run_color && !run.is_empty() {
                    self.flush(&mut out, &run, run_color);
                    run.clear();
                }
                run_color = color;
                run.push(glyph.ch);
            }
            self.flush(&mut out, &run, run_color);
        }
        out
    }

    fn flush(&self, out: &mut String, run: &str, color: Option<Rgb>) {
        match color.and_then(|c| self.mode.to_crossterm(c)) {
            Some(c) => out.push_str(&run.with(c).to_string()),
            None => out.push_str(run),
        }
    }
}
