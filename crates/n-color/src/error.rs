use thiserror::Error;

/// Errors produced by the color model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Wrong length or a non-hex character.
    #[error("invalid hex color: \"{0}\"")]
    InvalidHex(String),
}
