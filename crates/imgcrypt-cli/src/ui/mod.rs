//! UI primitives for the imgcrypt CLI.
//!
//! - **context**: TTY/color detection and output mode
//! - **theme**: Badge tokens and styles
//! - **render**: Receipts, key-value lines, tables, errors
//! - **progress**: Busy spinner while the worker runs a task

mod context;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::{OutputMode, UiContext};
pub use theme::Badge;

pub use progress::Spinner;
pub use render::{badge, kv, print_error, property_table, receipt};
