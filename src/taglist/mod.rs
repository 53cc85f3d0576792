//! Multi-select tag list control.
//!
//! The control is fully controlled by its host: the selected values arrive as
//! a prop every cycle and changes leave as [`ChangeEvent`]s carrying the
//! complete new value list. Only the ephemeral UI state (filter text,
//! dropdown state, highlighted candidate) and the resolved options live here.

pub mod controller;
pub mod filter;
pub mod selection;
pub mod view;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Position, Rect},
    Frame,
};
use tracing::debug;

use crate::form::{FieldDefinition, OptionValue, SelectOption};
use crate::source::{self, FetchRequest, OptionSource, OptionSourceConfig};
use crate::ui::components::{DropdownList, DropdownListAction};

pub use controller::{DropdownState, KeyOutcome, TagIntent, TaglistController};
pub use view::{TaglistLayout, TaglistView, ALL_SELECTED, NO_RESULTS};

/// Default placeholder of the filter input.
pub const DEFAULT_PLACEHOLDER: &str = "Search";

/// Props supplied by the host on every cycle.
#[derive(Debug, Clone, Copy)]
pub struct TaglistProps<'a> {
    /// Whether the control accepts input.
    pub disabled: bool,
    /// Display-only error messages.
    pub errors: &'a [String],
    /// The field definition.
    pub field: &'a FieldDefinition,
    /// The current selection.
    pub value: &'a [OptionValue],
}

/// A new value for a field.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// Id of the field that changed.
    pub field_id: String,
    /// The complete new selection.
    pub value: Vec<OptionValue>,
}

/// Result of routing a mouse event to the control.
#[derive(Debug, Clone, PartialEq)]
pub enum MouseOutcome {
    /// The event did not hit the control.
    Outside,
    /// The control was clicked and wants focus.
    Focus,
    /// The event hit the control without further effect.
    Handled,
    /// The event changed the selection.
    Changed(ChangeEvent),
}

/// A tag list control instance.
#[derive(Debug)]
pub struct Taglist {
    /// Id of the field this control renders.
    field_id: String,
    /// Focus and dropdown state machine.
    controller: TaglistController,
    /// Resolved options.
    source: OptionSource,
    /// Candidate highlight.
    list: DropdownList,
    /// Placeholder of the filter input.
    placeholder: String,
    /// Hit areas from the last render.
    layout: TaglistLayout,
}

impl Taglist {
    /// Create a control for a field. Options are resolved on the first sync.
    pub fn new(field: &FieldDefinition) -> Self {
        Self {
            field_id: field.id.clone(),
            controller: TaglistController::new(),
            source: OptionSource::new(),
            list: DropdownList::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            layout: TaglistLayout::default(),
        }
    }

    /// Set the placeholder of the filter input.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Id of the field this control renders.
    pub fn field_id(&self) -> &str {
        &self.field_id
    }

    /// Current dropdown state.
    pub fn state(&self) -> DropdownState {
        self.controller.state()
    }

    /// Current filter text.
    pub fn filter(&self) -> &str {
        self.controller.filter()
    }

    /// Check whether the control has focus.
    pub fn is_focused(&self) -> bool {
        self.controller.is_focused()
    }

    /// Whether the candidate dropdown is shown.
    pub fn is_dropdown_visible(&self, props: &TaglistProps) -> bool {
        self.controller.dropdown_visible(props.disabled)
    }

    /// Whether a remote fetch for the current configuration is outstanding.
    pub fn is_loading(&self) -> bool {
        self.source.is_pending()
    }

    /// The resolved options.
    pub fn options(&self) -> &[SelectOption] {
        self.source.options()
    }

    /// The selected options that resolve, in selection order.
    pub fn selected<'a>(&'a self, value: &[OptionValue]) -> Vec<&'a SelectOption> {
        selection::project(value, self.source.options())
    }

    /// The candidates the dropdown offers for the current filter.
    pub fn candidates<'a>(&'a self, value: &[OptionValue]) -> Vec<&'a SelectOption> {
        filter::candidates(self.controller.filter(), self.source.options(), value)
    }

    /// Re-resolve options if the field's source configuration changed.
    ///
    /// Returns the fetch the host must run for a remote source.
    pub fn sync(&mut self, field: &FieldDefinition) -> Option<FetchRequest> {
        self.source.sync(&OptionSourceConfig::from_field(field))
    }

    /// Apply the result of a fetch issued by [`Taglist::sync`].
    pub fn apply_resolution(
        &mut self,
        seq: u64,
        result: source::Result<Vec<SelectOption>>,
    ) -> bool {
        let applied = self.source.apply(seq, result);
        if applied {
            self.list.reset();
        }
        applied
    }

    /// Give the control focus. Disabled controls cannot be focused.
    pub fn focus(&mut self, props: &TaglistProps) {
        if props.disabled {
            return;
        }
        self.controller.focus();
        self.list.reset();
    }

    /// Take focus away from the control.
    pub fn blur(&mut self) {
        self.controller.blur();
        self.list.reset();
        self.layout.candidate_rows.clear();
    }

    /// Handle a key press while the control has focus.
    pub fn handle_key(&mut self, key: KeyEvent, props: &TaglistProps) -> Option<ChangeEvent> {
        if props.disabled {
            return None;
        }

        let filter_before = self.controller.filter().to_string();
        let selected = selection::project(props.value, self.source.options());
        let outcome = self.controller.handle_key(key, &selected);
        let dropdown_visible = self.controller.dropdown_visible(props.disabled);

        match outcome {
            KeyOutcome::Intent(intent) => Some(self.change(&intent, props.value)),
            KeyOutcome::Intercepted if dropdown_visible => {
                let options = self.source.options();
                let len = filter::candidates(self.controller.filter(), options, props.value).len();
                self.list.handle_input(key, len);
                None
            }
            KeyOutcome::Ignored if dropdown_visible && key.code == KeyCode::Enter => {
                let options = self.source.options();
                let candidates = filter::candidates(self.controller.filter(), options, props.value);
                match self.list.handle_input(key, candidates.len()) {
                    Some(DropdownListAction::Select(idx)) => {
                        let intent = self.controller.select(candidates[idx])?;
                        self.list.reset();
                        Some(self.change(&intent, props.value))
                    }
                    None => None,
                }
            }
            KeyOutcome::Handled => {
                if self.controller.filter() != filter_before {
                    self.list.reset();
                }
                None
            }
            _ => None,
        }
    }

    /// Handle a mouse event against the last rendered layout.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, props: &TaglistProps) -> MouseOutcome {
        let pos = Position::new(mouse.column, mouse.row);
        let hit = self.layout.area.contains(pos)
            || self.layout.candidate_at(pos).is_some();

        if props.disabled || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return if hit { MouseOutcome::Handled } else { MouseOutcome::Outside };
        }

        if self.controller.dropdown_visible(props.disabled) {
            if let Some(idx) = self.layout.candidate_at(pos) {
                let options = self.source.options();
                let candidates = filter::candidates(self.controller.filter(), options, props.value);
                if let Some(option) = candidates.get(idx) {
                    if let Some(intent) = self.controller.select(option) {
                        self.list.reset();
                        return MouseOutcome::Changed(self.change(&intent, props.value));
                    }
                }
                return MouseOutcome::Handled;
            }
        }

        if let Some(tag_idx) = self.layout.remove_button_at(pos) {
            let selected = selection::project(props.value, self.source.options());
            if let Some(option) = selected.get(tag_idx) {
                let intent = self.controller.deselect(option);
                return MouseOutcome::Changed(self.change(&intent, props.value));
            }
            return MouseOutcome::Handled;
        }

        if self.layout.area.contains(pos) {
            self.controller.input_clicked();
            return MouseOutcome::Focus;
        }

        MouseOutcome::Outside
    }

    fn change(&self, intent: &TagIntent, value: &[OptionValue]) -> ChangeEvent {
        let next = intent.apply(value);
        debug!(field_id = %self.field_id, ?intent, count = next.len(), "Taglist value change");
        ChangeEvent {
            field_id: self.field_id.clone(),
            value: next,
        }
    }

    fn view<'a>(
        &'a self,
        props: &TaglistProps<'a>,
        tags: &'a [&'a SelectOption],
    ) -> TaglistView<'a> {
        TaglistView {
            label: props.field.label.as_deref(),
            description: props.field.description.as_deref(),
            errors: props.errors,
            disabled: props.disabled,
            focused: self.controller.is_focused(),
            tags,
            filter: self.controller.filter(),
            placeholder: &self.placeholder,
        }
    }

    /// Rows needed to draw the field body at `width` columns.
    pub fn height(&self, props: &TaglistProps, width: u16) -> u16 {
        let tags = selection::project(props.value, self.source.options());
        self.view(props, &tags).height(width)
    }

    /// Screen positions from the last render.
    pub fn layout(&self) -> &TaglistLayout {
        &self.layout
    }

    /// Forget the hit areas of the last render, for a control not drawn this frame.
    pub fn clear_layout(&mut self) {
        self.layout = TaglistLayout::default();
    }

    /// Draw the field body.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, props: &TaglistProps) {
        let tags = selection::project(props.value, self.source.options());
        let layout = view::render(frame, area, &self.view(props, &tags));
        self.layout = layout;
    }

    /// Draw the candidate dropdown, if visible.
    ///
    /// Call after every field body has been drawn so the overlay stays on top.
    pub fn render_overlay(&mut self, frame: &mut Frame, props: &TaglistProps) {
        if !self.controller.dropdown_visible(props.disabled) {
            self.layout.candidate_rows.clear();
            return;
        }
        if self.layout.area.is_empty() {
            // Body not drawn this frame, so there is nothing to anchor to
            self.layout.candidate_rows.clear();
            self.list.hide();
            return;
        }

        let options = self.source.options();
        let candidates = filter::candidates(self.controller.filter(), options, props.value);
        let selected = selection::project(props.value, options);
        self.list.clamp(candidates.len());

        let rows = view::render_dropdown(
            frame,
            self.layout.input,
            &mut self.list,
            &candidates,
            filter::has_remaining_options(&selected, options),
        );
        self.layout.candidate_rows = rows;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn field() -> FieldDefinition {
        FieldDefinition::new(
            "tags",
            "Tags",
            vec![SelectOption::new("a", "A"), SelectOption::new("b", "B")],
        )
    }

    fn props<'a>(field: &'a FieldDefinition, value: &'a [OptionValue]) -> TaglistProps<'a> {
        TaglistProps {
            disabled: false,
            errors: &[],
            field,
            value,
        }
    }

    fn mounted(field: &FieldDefinition) -> Taglist {
        let mut taglist = Taglist::new(field);
        assert!(taglist.sync(field).is_none());
        taglist
    }

    fn type_text(taglist: &mut Taglist, text: &str, props: &TaglistProps) {
        for c in text.chars() {
            assert!(taglist.handle_key(key(KeyCode::Char(c)), props).is_none());
        }
    }

    fn draw(taglist: &mut Taglist, props: &TaglistProps) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(40, 14)).unwrap();
        terminal
            .draw(|frame| {
                taglist.render(frame, Rect::new(0, 0, 40, 4), props);
                taglist.render_overlay(frame, props);
            })
            .unwrap();
        terminal
    }

    #[test]
    fn test_type_filter_then_select() {
        let field = field();
        let value: Vec<OptionValue> = vec![];
        let props = props(&field, &value);
        let mut taglist = mounted(&field);

        taglist.focus(&props);
        type_text(&mut taglist, "a", &props);

        let candidates = taglist.candidates(&value);
        assert_eq!(candidates, vec![&SelectOption::new("a", "A")]);

        let change = taglist.handle_key(key(KeyCode::Enter), &props).unwrap();
        assert_eq!(change.field_id, "tags");
        assert_eq!(change.value, vec![OptionValue::from("a")]);
        assert!(taglist.filter().is_empty());
        assert_eq!(taglist.state(), DropdownState::Open);
    }

    #[test]
    fn test_backspace_removes_last_tag() {
        let field = field();
        let value = vec![OptionValue::from("a"), OptionValue::from("b")];
        let props = props(&field, &value);
        let mut taglist = mounted(&field);

        taglist.focus(&props);
        let change = taglist.handle_key(key(KeyCode::Backspace), &props).unwrap();
        assert_eq!(change.value, vec![OptionValue::from("a")]);
    }

    #[test]
    fn test_backspace_skips_stale_identifiers() {
        let field = field();
        let value = vec![OptionValue::from("a"), OptionValue::from("gone")];
        let props = props(&field, &value);
        let mut taglist = mounted(&field);

        taglist.focus(&props);
        let change = taglist.handle_key(key(KeyCode::Backspace), &props).unwrap();
        // "a" is the last tag that resolves; the stale id stays untouched.
        assert_eq!(change.value, vec![OptionValue::from("gone")]);
    }

    #[test]
    fn test_arrow_navigation_then_enter() {
        let field = field();
        let value: Vec<OptionValue> = vec![];
        let props = props(&field, &value);
        let mut taglist = mounted(&field);

        taglist.focus(&props);
        assert!(taglist.handle_key(key(KeyCode::Down), &props).is_none());
        let change = taglist.handle_key(key(KeyCode::Enter), &props).unwrap();
        assert_eq!(change.value, vec![OptionValue::from("b")]);
    }

    #[test]
    fn test_escape_then_enter_reopens_without_selecting() {
        let field = field();
        let value: Vec<OptionValue> = vec![];
        let props = props(&field, &value);
        let mut taglist = mounted(&field);

        taglist.focus(&props);
        taglist.handle_key(key(KeyCode::Esc), &props);
        assert_eq!(taglist.state(), DropdownState::Escaped);
        assert!(!taglist.is_dropdown_visible(&props));
        assert!(taglist.is_focused());

        assert!(taglist.handle_key(key(KeyCode::Enter), &props).is_none());
        assert_eq!(taglist.state(), DropdownState::Open);
        assert!(taglist.is_dropdown_visible(&props));
    }

    #[test]
    fn test_escaped_dropdown_not_rendered() {
        let field = field();
        let value: Vec<OptionValue> = vec![];
        let props = props(&field, &value);
        let mut taglist = mounted(&field);

        taglist.focus(&props);
        draw(&mut taglist, &props);
        assert_eq!(taglist.layout.candidate_rows.len(), 2);

        taglist.handle_key(key(KeyCode::Esc), &props);
        draw(&mut taglist, &props);
        assert!(taglist.layout.candidate_rows.is_empty());
    }

    #[test]
    fn test_disabled_ignores_input() {
        let field = field();
        let value = vec![OptionValue::from("a")];
        let mut props = props(&field, &value);
        props.disabled = true;
        let mut taglist = mounted(&field);

        taglist.focus(&props);
        assert!(!taglist.is_focused());
        assert!(taglist.handle_key(key(KeyCode::Backspace), &props).is_none());
        assert!(!taglist.is_dropdown_visible(&props));
    }

    #[test]
    fn test_blur_clears_filter() {
        let field = field();
        let value: Vec<OptionValue> = vec![];
        let props = props(&field, &value);
        let mut taglist = mounted(&field);

        taglist.focus(&props);
        type_text(&mut taglist, "b", &props);
        taglist.blur();
        assert!(taglist.filter().is_empty());
        assert_eq!(taglist.state(), DropdownState::Closed);
    }

    #[test]
    fn test_all_selected_leaves_no_candidates() {
        let field = field();
        let value = vec![OptionValue::from("a"), OptionValue::from("b")];
        let props = props(&field, &value);
        let mut taglist = mounted(&field);

        taglist.focus(&props);
        assert!(taglist.candidates(&value).is_empty());
        assert!(taglist.handle_key(key(KeyCode::Enter), &props).is_none());

        let terminal = draw(&mut taglist, &props);
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let rows: Vec<String> = buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect();
        assert!(rows.iter().any(|row| row.contains(ALL_SELECTED)));
    }

    #[test]
    fn test_remote_options_replace_static_values() {
        let field = field().with_data_source("http://localhost/options");
        let value: Vec<OptionValue> = vec![];
        let props = props(&field, &value);
        let mut taglist = Taglist::new(&field);

        let request = taglist.sync(&field).unwrap();
        assert!(taglist.options().is_empty());

        taglist.apply_resolution(request.seq, Ok(vec![SelectOption::new("x", "X")]));
        taglist.focus(&props);
        assert_eq!(taglist.candidates(&value), vec![&SelectOption::new("x", "X")]);
    }

    #[test]
    fn test_click_candidate_selects() {
        let field = field();
        let value: Vec<OptionValue> = vec![];
        let props = props(&field, &value);
        let mut taglist = mounted(&field);

        taglist.focus(&props);
        draw(&mut taglist, &props);
        let (_, row) = taglist.layout.candidate_rows[1];

        let outcome = taglist.handle_mouse(click(row.x, row.y), &props);
        assert_eq!(
            outcome,
            MouseOutcome::Changed(ChangeEvent {
                field_id: "tags".to_string(),
                value: vec![OptionValue::from("b")],
            })
        );
    }

    #[test]
    fn test_click_remove_affordance_deselects() {
        let field = field();
        let value = vec![OptionValue::from("a"), OptionValue::from("b")];
        let props = props(&field, &value);
        let mut taglist = mounted(&field);

        draw(&mut taglist, &props);
        let (_, cell) = taglist.layout.remove_buttons[0];

        let outcome = taglist.handle_mouse(click(cell.x, cell.y), &props);
        match outcome {
            MouseOutcome::Changed(change) => {
                assert_eq!(change.value, vec![OptionValue::from("b")])
            }
            other => panic!("Expected change, got {:?}", other),
        }
        // Removing a tag does not move focus.
        assert!(!taglist.is_focused());
    }

    #[test]
    fn test_click_input_focuses_and_clears_latch() {
        let field = field();
        let value: Vec<OptionValue> = vec![];
        let props = props(&field, &value);
        let mut taglist = mounted(&field);

        draw(&mut taglist, &props);
        let input = taglist.layout.input;
        let inside = click(input.x + 20, input.y + 1);
        assert_eq!(taglist.handle_mouse(inside, &props), MouseOutcome::Focus);
        assert_eq!(taglist.state(), DropdownState::Open);

        taglist.handle_key(key(KeyCode::Esc), &props);
        taglist.handle_mouse(inside, &props);
        assert_eq!(taglist.state(), DropdownState::Open);
    }

    #[test]
    fn test_click_outside() {
        let field = field();
        let value: Vec<OptionValue> = vec![];
        let props = props(&field, &value);
        let mut taglist = mounted(&field);

        draw(&mut taglist, &props);
        assert_eq!(taglist.handle_mouse(click(5, 30), &props), MouseOutcome::Outside);
    }

    #[test]
    fn test_enter_selects_the_drawn_highlight_when_dropdown_is_cut_short() {
        let options: Vec<SelectOption> = (0..10)
            .map(|i| SelectOption::new(format!("v{i}"), format!("Opt{i}")))
            .collect();
        let field = FieldDefinition::new("tags", "Tags", options);
        let value: Vec<OptionValue> = vec![];
        let props = props(&field, &value);
        let mut taglist = mounted(&field);
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        let mut frame_once = |taglist: &mut Taglist| {
            terminal
                .draw(|frame| {
                    taglist.render(frame, Rect::new(0, 0, 40, 4), &props);
                    taglist.render_overlay(frame, &props);
                })
                .unwrap();
            let buffer = terminal.backend().buffer().clone();
            let width = buffer.area.width as usize;
            buffer
                .content()
                .chunks(width)
                .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
                .enumerate()
                .find(|(_, row)| row.contains("> "))
                .map(|(y, row)| (y as u16, row))
        };

        taglist.focus(&props);
        frame_once(&mut taglist);
        for _ in 0..3 {
            taglist.handle_key(key(KeyCode::Down), &props);
            frame_once(&mut taglist);
        }

        let (y, row) = frame_once(&mut taglist).unwrap();
        assert!(row.contains("Opt3"));
        assert_eq!(taglist.layout.candidate_at(Position::new(2, y)), Some(3));

        let change = taglist.handle_key(key(KeyCode::Enter), &props).unwrap();
        assert_eq!(change.value, vec![OptionValue::from("v3")]);
    }
}
