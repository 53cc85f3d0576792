//! Event handling for the application.
//!
//! This module turns terminal input into application events and provides
//! the key hints shown in the footer.

mod handler;
mod keys;

use crossterm::event::{KeyEvent, MouseEvent};

pub use handler::EventHandler;
pub use keys::{get_context_hints, KeyContext};

/// Application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse button or wheel event.
    Mouse(MouseEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// No input within the tick rate.
    Tick,
    /// The application should exit.
    Quit,
}
