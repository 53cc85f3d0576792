//! Key hint definitions.

use crate::taglist::DropdownState;

/// What the keyboard currently drives, for help hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    /// No field has focus.
    Idle,
    /// A field has focus and its dropdown is open.
    Editing,
    /// A field has focus and its dropdown was dismissed with Esc.
    Escaped,
}

impl KeyContext {
    /// Derive the context from the focused control's dropdown state.
    pub fn from_state(state: Option<DropdownState>) -> Self {
        match state {
            None | Some(DropdownState::Closed) => KeyContext::Idle,
            Some(DropdownState::Open) => KeyContext::Editing,
            Some(DropdownState::Escaped) => KeyContext::Escaped,
        }
    }
}

/// Get the hint line for a context.
pub fn get_context_hints(context: KeyContext) -> &'static str {
    match context {
        KeyContext::Idle => "[Tab] focus field  [click] focus  [q] quit & print values",
        KeyContext::Editing => {
            "[type] filter  [↑/↓] move  [Enter] select  [Bksp] remove last  [Esc] close  [Tab] next"
        }
        KeyContext::Escaped => "[Enter] reopen list  [type] filter  [Bksp] remove last  [Tab] next",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_state() {
        assert_eq!(KeyContext::from_state(None), KeyContext::Idle);
        assert_eq!(KeyContext::from_state(Some(DropdownState::Open)), KeyContext::Editing);
        assert_eq!(KeyContext::from_state(Some(DropdownState::Escaped)), KeyContext::Escaped);
    }

    #[test]
    fn test_hints_mention_escape_recovery() {
        assert!(get_context_hints(KeyContext::Escaped).contains("[Enter]"));
    }
}
