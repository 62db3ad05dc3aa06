//! Error type shared by every stage of stylesheet generation.

use std::io;
use std::path::PathBuf;

use n_color::ColorError;
use thiserror::Error;

/// Convenience alias used throughout n-theme.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A hex string in a color table, override or template did not parse.
    #[error(transparent)]
    Format(#[from] ColorError),

    /// Unknown color id, unknown state, or a child id on a literal color.
    #[error("invalid color id: \"{0}\"")]
    InvalidColorId(String),

    /// Structurally invalid custom colors (e.g. a `[dark]` block that is not
    /// a mapping).
    #[error("invalid custom colors: {0}")]
    InvalidOverride(String),

    #[error("unsupported theme: \"{0}\" (expected dark, light or auto)")]
    UnsupportedTheme(String),

    #[error("invalid corner shape: \"{0}\" (expected rounded or sharp)")]
    InvalidCornerShape(String),

    /// Malformed directive, placeholder, filter call or version comparison.
    #[error("{directive}: {message}")]
    PatchSyntax { directive: String, message: String },

    #[error("unknown icon: \"{0}\"")]
    UnknownIcon(String),

    /// Writing a generated SVG failed. The renderer logs and skips these.
    #[error("failed to write asset {}: {source}", .path.display())]
    AssetWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("replacement pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for [`Error::PatchSyntax`].
    pub fn syntax(directive: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PatchSyntax {
            directive: directive.into(),
            message: message.into(),
        }
    }
}
