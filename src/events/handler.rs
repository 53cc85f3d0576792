//! Event handler implementation.
//!
//! Polls for terminal events and converts them to application events.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};

use super::Event;

/// The default tick rate for the event loop in milliseconds.
pub const TICK_RATE_MS: u64 = 100;

/// Handles application events by polling crossterm for terminal events.
pub struct EventHandler {
    /// The tick rate duration.
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler with the default tick rate.
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(TICK_RATE_MS),
        }
    }

    /// Create a new event handler with a custom tick rate.
    ///
    /// Used with `Settings::tick_rate_ms`.
    pub fn with_tick_rate(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event.
    ///
    /// This method blocks until an event is available or the tick rate elapses.
    /// Returns `Event::Tick` if no event occurred within the tick rate.
    pub fn next(&self) -> std::io::Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Only presses; release and repeat reports would double-type
                CrosstermEvent::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    Ok(Event::Key(key_event))
                }
                CrosstermEvent::Key(_) => Ok(Event::Tick),
                CrosstermEvent::Mouse(mouse_event) => Ok(Event::Mouse(mouse_event)),
                CrosstermEvent::Resize(width, height) => Ok(Event::Resize(width, height)),
                // Terminal focus and paste are not used by the form
                CrosstermEvent::FocusGained | CrosstermEvent::FocusLost => Ok(Event::Tick),
                CrosstermEvent::Paste(_) => Ok(Event::Tick),
            }
        } else {
            // No event within tick rate, return tick event
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
