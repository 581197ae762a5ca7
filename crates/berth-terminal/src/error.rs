//! Error types for berth-terminal.

use thiserror::Error;

/// Errors raised while building a theme.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    /// Hex colour string was malformed.
    #[error("invalid hex colour {input:?}: {reason}")]
    InvalidHex { input: String, reason: &'static str },

    /// No built-in theme has this name.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
}
