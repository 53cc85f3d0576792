//! User interface components and theming.
//!
//! Field controls draw themselves; this module holds the shared pieces they
//! are built from.

pub mod components;
pub mod theme;

pub use components::{render_context_help, Spinner};
pub use theme::{init_theme, theme, Theme};
