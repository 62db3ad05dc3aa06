//! # n-color — the color model behind n-style
//!
//! Stylesheet colors are stored as RGBA and adjusted in HSL space:
//!
//! ```text
//! "#8ab4f7" ──from_hex──► Color ──lighten/darken/transparent──► Color
//!                           │
//!                           ├─ Display     → "#8ab4f7" / "rgba(…)"  (stylesheets)
//!                           ├─ to_hex      → "8ab4f7ff"             (file names)
//!                           └─ to_hex_argb → "ff8ab4f7"             (palettes)
//! ```
//!
//! - **[`color`]** — `Rgba`, `Hsla`, `Hsva` and the unifying `Color`
//! - **[`contrast`]** — WCAG luminance, contrast ratio, lighter/darker picks
//! - **[`cache`]** — explicit hex parsing memo owned by the caller

// Single-char math variables are standard in color science.
#![allow(clippy::many_single_char_names)]
// Hue/saturation/lightness variable names are inherently similar.
#![allow(clippy::similar_names)]

pub mod cache;
pub mod color;
pub mod contrast;
pub mod error;

pub use cache::ColorCache;
pub use color::{Color, Hsla, Hsva, Rgba};
pub use contrast::{contrast_ratio, get_darker_color, get_lighter_color, relative_luminance};
pub use error::ColorError;
