//! Theme and styling configuration.

use std::sync::OnceLock;

use ratatui::style::Color;

/// Color theme for the application.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Primary background color.
    pub bg: Color,
    /// Accent color for focused elements and the highlighted candidate.
    pub accent: Color,
    /// Border color of unfocused controls.
    pub border: Color,
    /// Border color of the focused control.
    pub border_focused: Color,
    /// Input text color.
    pub input_fg: Color,
    /// Placeholder text color.
    pub input_placeholder: Color,
    /// Background of tag chips.
    pub tag_bg: Color,
    /// Foreground of tag chips.
    pub tag_fg: Color,
    /// Color for muted text (descriptions, disabled content).
    pub muted: Color,
    /// Color for error messages.
    pub error: Color,
}

impl Theme {
    /// The dark palette.
    pub fn dark() -> Self {
        Self {
            fg: Color::White,
            bg: Color::Black,
            accent: Color::Cyan,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            input_fg: Color::White,
            input_placeholder: Color::DarkGray,
            tag_bg: Color::Blue,
            tag_fg: Color::White,
            muted: Color::Gray,
            error: Color::Red,
        }
    }

    /// The light palette.
    pub fn light() -> Self {
        Self {
            fg: Color::Black,
            bg: Color::White,
            accent: Color::Blue,
            border: Color::Gray,
            border_focused: Color::Blue,
            input_fg: Color::Black,
            input_placeholder: Color::Gray,
            tag_bg: Color::LightBlue,
            tag_fg: Color::Black,
            muted: Color::DarkGray,
            error: Color::Red,
        }
    }

    /// Look up a palette by name, falling back to dark.
    pub fn by_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme with the given name. Only the first call takes effect.
pub fn init_theme(name: &str) {
    let _ = THEME.set(Theme::by_name(name));
}

/// The active theme.
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}
