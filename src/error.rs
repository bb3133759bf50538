//! Error types shared across the crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while bringing up the terminal or loading a theme.
///
/// Everything except [`Error::Terminal`] is recoverable: callers log it and
/// fall back to default colors.
#[derive(Debug, Error)]
pub enum Error {
    /// The terminal could not be put into raw/alternate-screen mode.
    #[error("terminal initialization failed: {0}")]
    Terminal(#[from] io::Error),

    /// A theme file could not be read from disk.
    #[error("failed to read theme {}: {source}", path.display())]
    ThemeRead {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A theme file was read but is not valid TOML for the theme schema.
    #[error("failed to parse theme: {0}")]
    ThemeParse(#[from] toml::de::Error),

    /// A theme color was not `#rgb` or `#rrggbb`.
    #[error("invalid color {0:?}")]
    InvalidColor(String),

    /// The high-depth palette already holds as many colors as the hardware supports.
    #[error("palette is full ({0} entries)")]
    PaletteFull(usize),
}

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
