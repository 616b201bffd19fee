//! # CLI UI Module
//!
//! Styling and formatting layer for docsearch CLI output.
//!
//! ## Design Principles
//!
//! 1. **Scannable**: success or failure is visible at a glance
//! 2. **Consistent**: same prefixes and tables across commands
//! 3. **Accessible**: work without colors (respect `NO_COLOR`)
//! 4. **Scriptable**: machine-parseable with `--json`
//!
//! ## Module Structure
//!
//! - `color`: Color mode detection and terminal capability checks
//! - `style`: Message types, prefixes, and styling functions
//! - `format`: Utility formatters (truncation, durations, optional values)
//! - `table`: Table rendering with comfy-table
//! - `progress`: Spinner shown while a search is in flight

pub mod color;
pub mod format;
pub mod progress;
pub mod style;
pub mod table;

pub use color::ColorMode;
pub use progress::{Progress, ProgressMode};
pub use style::{MessageType, Style};
