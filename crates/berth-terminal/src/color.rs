//! RGB colours and terminal colour capability detection.

use crate::error::ThemeError;
use crossterm::style::Color as CrosstermColor;
use std::fmt;
use std::str::FromStr;

/// 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> Result<Self, ThemeError> {
        let invalid = |reason| ThemeError::InvalidHex {
            input: hex.to_string(),
            reason,
        };
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid("expected 6 hex digits"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid("not a hex digit"))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl FromStr for Rgb {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Terminal colour capability mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// 24-bit true colour (COLORTERM=truecolor or 24bit).
    #[default]
    TrueColor,
    /// 256 colour palette.
    Color256,
    /// 16 ANSI colours.
    Color16,
    /// No colour escapes at all.
    Mono,
}

impl ColorMode {
    /// Auto-detect terminal colour capabilities.
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_with_env(
            std::env::var("COLORTERM").ok().as_deref(),
            std::env::var("TERM").ok().as_deref(),
        )
    }

    /// Detect colour mode from environment variable values.
    #[must_use]
    pub fn detect_with_env(colorterm: Option<&str>, term: Option<&str>) -> Self {
        if matches!(colorterm, Some("truecolor" | "24bit")) {
            return Self::TrueColor;
        }
        match term {
            Some(t) if t.contains("256color") => Self::Color256,
            Some("dumb") | None => Self::Mono,
            _ => Self::Color16,
        }
    }

    /// Closest terminal colour for `color`; `None` in monochrome mode.
    #[must_use]
    pub fn to_crossterm(self, color: Rgb) -> Option<CrosstermColor> {
        let Rgb { r, g, b } = color;
        match self {
            Self::TrueColor => Some(CrosstermColor::Rgb { r, g, b }),
            Self::Color256 => Some(CrosstermColor::AnsiValue(rgb_to_256(r, g, b))),
            Self::Color16 => Some(rgb_to_16(r, g, b)),
            Self::Mono => None,
        }
    }
}

/// Index into the xterm 256-colour palette.
fn rgb_to_256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        return match r {
            0..=7 => 16,
            249..=255 => 231,
            _ => 232 + ((r - 8) / 10).min(23),
        };
    }
    let idx = |c: u8| (u16::from(c) * 5 / 255) as u8;
    16 + 36 * idx(r) + 6 * idx(g) + idx(b)
}

/// ANSI colours indexed by channel mask (`r | g << 1 | b << 2`), as
/// `[dim, bright]` pairs.
const ANSI_16: [[CrosstermColor; 2]; 8] = [
    [CrosstermColor::Black, CrosstermColor::DarkGrey],
    [CrosstermColor::DarkRed, CrosstermColor::Red],
    [CrosstermColor::DarkGreen, CrosstermColor::Green],
    [CrosstermColor::DarkYellow, CrosstermColor::Yellow],
    [CrosstermColor::DarkBlue, CrosstermColor::Blue],
    [CrosstermColor::DarkMagenta, CrosstermColor::Magenta],
    [CrosstermColor::DarkCyan, CrosstermColor::Cyan],
    [CrosstermColor::Grey, CrosstermColor::White],
];

/// Nearest of the 16 ANSI colours: channels above half the strongest one
/// pick the hue, perceived luminance picks the intensity.
fn rgb_to_16(r: u8, g: u8, b: u8) -> CrosstermColor {
    let luminance = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
    let threshold = r.max(g).max(b) / 2;
    let mask = [r, g, b]
        .iter()
        .enumerate()
        .filter(|(_, c)| **c > threshold)
        .fold(0, |acc, (i, _)| acc | (1 << i));
    ANSI_16[mask][usize::from(luminance > 127)]
}
