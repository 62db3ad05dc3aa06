//! Explicit memo for hex parsing.
//!
//! Templates reference the same handful of hex strings hundreds of times.
//! The cache is owned by whoever renders (never global), so tests and long
//! running hosts can drop or [`clear`](ColorCache::clear) it at will.

use std::collections::HashMap;

use crate::color::Color;
use crate::error::ColorError;

/// Memoizes [`Color::from_hex`] by input string.
#[derive(Debug, Default, Clone)]
pub struct ColorCache {
    hex: HashMap<String, Color>,
}

impl ColorCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `hex`, reusing a previous result for the same input.
    ///
    /// Failures are not cached.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidHex`] for malformed input.
    pub fn from_hex(&mut self, hex: &str) -> Result<Color, ColorError> {
        if let Some(color) = self.hex.get(hex) {
            return Ok(*color);
        }
        let color = Color::from_hex(hex)?;
        self.hex.insert(hex.to_owned(), color);
        Ok(color)
    }

    /// Number of memoized inputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hex.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hex.is_empty()
    }

    pub fn clear(&mut self) {
        self.hex.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
