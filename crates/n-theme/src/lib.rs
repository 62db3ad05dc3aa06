//! # n-theme — stylesheet generation for n-style
//!
//! Turns a color table plus user choices into a widget stylesheet, a
//! toolkit palette and the tinted SVG icons the stylesheet points at.
//!
//! # Architecture
//!
//! ```text
//! StyleLoader (theme choice, accent, overrides)
//!     │
//!     ▼
//! builtin.rs:  embedded color tables + templates
//!     │
//!     ▼
//! merge.rs:    apply CustomColors (atomic, validated)
//!     │
//!     ▼
//! patch.rs:    $type_patch / $env_patch → replacements → patched text
//!     │
//!     ▼
//! template.rs: scan once; {{ head | filters }} and $url{} → output
//!     │                       (filter.rs)          (asset.rs)
//!     ▼
//! stylesheet String      palette.rs: Palette      <cache>/v*/*.svg
//! ```
//!
//! # Template syntax
//!
//! | construct                                      | meaning                              |
//! |------------------------------------------------|--------------------------------------|
//! | `{{ primary\|color(state="hover") }}`          | color of `primary` in state `hover`  |
//! | `$type_patch{"types": "dark", "value": ...};`  | text only for the listed themes      |
//! | `$env_patch{"version": ">=6.0", "value": ...}` | text only for matching toolkits      |
//! | `$url{"icon": "check", "id": "primary"}`       | `url(...)` of a tinted icon          |

pub mod asset;
pub mod builtin;
pub mod env;
pub mod error;
pub mod filter;
pub mod loader;
pub mod merge;
pub mod options;
pub mod palette;
pub mod patch;
pub mod scan;
pub mod table;
pub mod template;
pub mod version;

pub use asset::{AssetDescriptor, AssetEmitter, BuiltinIcons, Emitted, IconSource};
pub use env::Environment;
pub use error::{Error, Result};
pub use loader::{
    FixedAppearance, NoDetection, PaletteOptions, StyleLoader, StylesheetOptions,
    SystemAppearance,
};
pub use merge::{merge, CustomColors};
pub use options::{CornerShape, RenderOptions, Theme, ThemeChoice};
pub use palette::{ColorGroup, ColorRole, Palette};
pub use table::{ColorId, ColorSpec, ColorTable, StateValue, Transform};
pub use template::Renderer;
pub use version::{Comparison, Version};
