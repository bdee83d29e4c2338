//! # CLI UI Module
//!
//! Styling and formatting layer for citekit CLI output.
//!
//! ## Design Principles
//!
//! 1. **Scannable**: Users should identify success/failure at a glance
//! 2. **Accessible**: Work without colors (respect `NO_COLOR`)
//! 3. **Scriptable**: Machine-parseable with `--json` flag
//!
//! ## Module Structure
//!
//! - `color`: Color mode detection and terminal capability checks
//! - `style`: Message types, prefixes, and styling functions
//! - `format`: Text truncation for snippets

pub mod color;
pub mod format;
pub mod style;

pub use color::ColorMode;
pub use style::{MessageType, Style};
