//! Focus, keyboard and dropdown state machine of the tag list.
//!
//! The controller owns only ephemeral UI state: the filter text and the
//! dropdown state. Selection changes leave as [`TagIntent`]s for the host to
//! apply; the controller never holds the value itself.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

use crate::form::{OptionValue, SelectOption};

/// Dropdown state of the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropdownState {
    /// Input not focused.
    #[default]
    Closed,
    /// Input focused, dropdown shown.
    Open,
    /// Input focused, dropdown suppressed by Escape until Enter, a filter
    /// edit or a click on the input.
    Escaped,
}

/// A requested change to the host-owned selection.
#[derive(Debug, Clone, PartialEq)]
pub enum TagIntent {
    /// Append a value.
    Select(OptionValue),
    /// Remove a value.
    Deselect(OptionValue),
}

impl TagIntent {
    /// Compute the complete new selection.
    ///
    /// Selecting appends to the end; deselecting filters the value out and
    /// keeps the remaining order.
    pub fn apply(&self, selection: &[OptionValue]) -> Vec<OptionValue> {
        match self {
            TagIntent::Select(value) => {
                let mut next = selection.to_vec();
                next.push(value.clone());
                next
            }
            TagIntent::Deselect(value) => selection
                .iter()
                .filter(|v| *v != value)
                .cloned()
                .collect(),
        }
    }
}

/// Result of feeding a key to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Key had no meaning for the controller.
    Ignored,
    /// Key was consumed without further effect (e.g. caret keys).
    Intercepted,
    /// Key changed local state.
    Handled,
    /// Key produced a selection change.
    Intent(TagIntent),
}

/// The tag list interaction state machine.
#[derive(Debug, Clone, Default)]
pub struct TaglistController {
    state: DropdownState,
    filter: String,
}

impl TaglistController {
    /// Create a controller in the `Closed` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current dropdown state.
    pub fn state(&self) -> DropdownState {
        self.state
    }

    /// Current filter text.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Check whether the input has focus.
    pub fn is_focused(&self) -> bool {
        self.state != DropdownState::Closed
    }

    /// Whether the candidate dropdown should be drawn.
    pub fn dropdown_visible(&self, disabled: bool) -> bool {
        !disabled && self.state == DropdownState::Open
    }

    /// The input gained focus.
    pub fn focus(&mut self) {
        if self.state == DropdownState::Closed {
            self.transition(DropdownState::Open);
        }
    }

    /// The input lost focus. Clears the filter text.
    pub fn blur(&mut self) {
        if self.state != DropdownState::Closed {
            self.transition(DropdownState::Closed);
        }
        self.filter.clear();
    }

    /// Replace the filter text. Clears the escape latch.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
        if self.state == DropdownState::Escaped {
            self.transition(DropdownState::Open);
        }
    }

    /// The input box was clicked: focus it, or clear the escape latch.
    pub fn input_clicked(&mut self) {
        match self.state {
            DropdownState::Closed | DropdownState::Escaped => self.transition(DropdownState::Open),
            DropdownState::Open => {}
        }
    }

    /// Escape was pressed.
    pub fn escape(&mut self) {
        if self.state == DropdownState::Open {
            self.transition(DropdownState::Escaped);
        }
    }

    /// Enter was pressed. Returns `true` if it lifted the escape latch.
    ///
    /// When this returns `false` the key belongs to the dropdown list.
    pub fn enter(&mut self) -> bool {
        if self.state == DropdownState::Escaped {
            self.transition(DropdownState::Open);
            true
        } else {
            false
        }
    }

    /// A candidate was picked. Only valid while the dropdown is open.
    pub fn select(&mut self, option: &SelectOption) -> Option<TagIntent> {
        if self.state != DropdownState::Open {
            return None;
        }
        self.filter.clear();
        Some(TagIntent::Select(option.value.clone()))
    }

    /// A tag's remove affordance was used.
    pub fn deselect(&self, option: &SelectOption) -> TagIntent {
        TagIntent::Deselect(option.value.clone())
    }

    /// Backspace with an empty filter removes the last selected tag.
    pub fn backspace(&self, selected: &[&SelectOption]) -> Option<TagIntent> {
        if !self.is_focused() || !self.filter.is_empty() {
            return None;
        }
        selected.last().map(|option| self.deselect(option))
    }

    /// Feed a key press to the controller.
    ///
    /// `selected` is the projected selection, used by Backspace.
    pub fn handle_key(&mut self, key: KeyEvent, selected: &[&SelectOption]) -> KeyOutcome {
        if !self.is_focused() {
            return KeyOutcome::Ignored;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Up, _) | (KeyCode::Down, _) => KeyOutcome::Intercepted,
            (KeyCode::Esc, _) => {
                self.escape();
                KeyOutcome::Handled
            }
            (KeyCode::Enter, _) => {
                if self.enter() {
                    KeyOutcome::Handled
                } else {
                    KeyOutcome::Ignored
                }
            }
            (KeyCode::Backspace, _) => {
                if self.filter.is_empty() {
                    match self.backspace(selected) {
                        Some(intent) => KeyOutcome::Intent(intent),
                        None => KeyOutcome::Handled,
                    }
                } else {
                    let mut text = self.filter.clone();
                    text.pop();
                    self.set_filter(text);
                    KeyOutcome::Handled
                }
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let mut text = self.filter.clone();
                text.push(c);
                self.set_filter(text);
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn transition(&mut self, next: DropdownState) {
        trace!(from = ?self.state, to = ?next, "Taglist state transition");
        self.state = next;
    }
}
