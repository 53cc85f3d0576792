//! Loading spinner shown while remote options are being fetched.

use ratatui::{layout::Rect, style::Style, text::Span, widgets::Paragraph, Frame};

use crate::ui::theme::theme;

/// Spinner animation frames.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An animated spinner advanced by tick events.
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    /// Current frame index.
    frame: usize,
}

impl Spinner {
    /// Create a spinner at its first frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the animation. Call on each tick.
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
    }

    /// The current frame glyph.
    pub fn glyph(&self) -> &'static str {
        SPINNER_FRAMES[self.frame]
    }

    /// Render the spinner followed by a message.
    pub fn render(&self, frame: &mut Frame, area: Rect, message: &str) {
        let text = format!("{} {}", self.glyph(), message);
        let paragraph = Paragraph::new(Span::styled(text, Style::default().fg(theme().accent)));
        frame.render_widget(paragraph, area);
    }
}
