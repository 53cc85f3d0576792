//! Main application state and event loop.
//!
//! This module implements The Elm Architecture (TEA) pattern: the [`App`]
//! owns the form values and feeds them to its controls as props, the
//! controls report changes back, and [`App::view`] draws purely from state.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use serde_json::{Map, Value};
use tracing::{debug, info, trace, warn};

use crate::events::{Event, KeyContext};
use crate::form::{FieldDefinition, FormData, FormErrors, OptionValue, TAGLIST};
use crate::source::OptionClient;
use crate::taglist::{ChangeEvent, MouseOutcome, Taglist, TaglistProps};
use crate::tasks::{SourceMessage, TaskSpawner};
use crate::ui::{render_context_help, theme, Spinner};

/// Blank rows between two fields.
const FIELD_SPACING: u16 = 1;

/// The main application struct that holds all state.
pub struct App {
    /// Title shown in the header.
    title: String,
    /// Field definitions, in schema order.
    fields: Vec<FieldDefinition>,
    /// One control per field, same order as `fields`.
    controls: Vec<Taglist>,
    /// Current values by field id.
    values: HashMap<String, Vec<OptionValue>>,
    /// Display-only messages by field id.
    errors: FormErrors,
    /// Whether every field is read-only.
    disabled: bool,
    /// Index of the focused field.
    focused: Option<usize>,
    /// Client for remote option sources.
    client: OptionClient,
    /// Spawner for background fetches.
    spawner: TaskSpawner,
    /// Spinner shown while options load.
    spinner: Spinner,
    /// Whether the application should quit.
    should_quit: bool,
}

impl App {
    /// Create an application for a set of fields.
    ///
    /// Initial values are taken from `data` by field key. Call
    /// [`App::sync_sources`] afterwards to resolve options.
    pub fn new(
        fields: Vec<FieldDefinition>,
        data: &FormData,
        errors: FormErrors,
        client: OptionClient,
        spawner: TaskSpawner,
    ) -> Self {
        let empty = TAGLIST.empty_value();
        let values = fields
            .iter()
            .map(|f| (f.id.clone(), data.values_for(f.value_key(), &empty)))
            .collect();
        let controls = fields.iter().map(Taglist::new).collect();

        debug!(field_count = fields.len(), "Creating application");

        Self {
            title: "formfield".to_string(),
            fields,
            controls,
            values,
            errors,
            disabled: false,
            focused: None,
            client,
            spawner,
            spinner: Spinner::new(),
            should_quit: false,
        }
    }

    /// Make every field read-only.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the placeholder of every filter input.
    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.controls = self
            .controls
            .into_iter()
            .map(|c| c.with_placeholder(placeholder))
            .collect();
        self
    }

    /// Set the header title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Id of the focused field.
    pub fn focused_field(&self) -> Option<&str> {
        self.focused.map(|i| self.fields[i].id.as_str())
    }

    /// Current value of a field.
    pub fn value(&self, field_id: &str) -> &[OptionValue] {
        self.values.get(field_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Control of a field.
    pub fn control(&self, field_id: &str) -> Option<&Taglist> {
        self.controls.iter().find(|c| c.field_id() == field_id)
    }

    /// Re-resolve options of every control whose source changed.
    ///
    /// Remote sources are fetched in the background; results arrive as
    /// [`SourceMessage`]s.
    pub fn sync_sources(&mut self) {
        for (field, control) in self.fields.iter().zip(self.controls.iter_mut()) {
            if let Some(request) = control.sync(field) {
                self.spawner
                    .spawn_resolve_options(&self.client, field.id.clone(), request);
            }
        }
    }

    /// Route a background task result to its control.
    pub fn handle_source_message(&mut self, msg: SourceMessage) {
        match msg {
            SourceMessage::OptionsResolved {
                field_id,
                seq,
                result,
            } => match self.controls.iter_mut().find(|c| c.field_id() == field_id) {
                Some(control) => {
                    control.apply_resolution(seq, result);
                }
                None => warn!(%field_id, "Options resolved for unknown field"),
            },
        }
    }

    /// Update the application state based on an event.
    ///
    /// This implements the Update part of The Elm Architecture (TEA).
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Quit => {
                info!("Quit event received");
                self.should_quit = true;
            }
            Event::Key(key_event) => {
                trace!(key = ?key_event.code, modifiers = ?key_event.modifiers, "Key event");
                self.handle_key_event(key_event);
            }
            Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event),
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::Tick => {
                if self.controls.iter().any(Taglist::is_loading) {
                    self.spinner.tick();
                }
            }
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            info!("Ctrl+C pressed, quitting");
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.focus_next(true);
                return;
            }
            KeyCode::BackTab => {
                self.focus_next(false);
                return;
            }
            _ => {}
        }

        let Some(idx) = self.focused else {
            if key.code == KeyCode::Char('q') {
                info!("Quit requested");
                self.should_quit = true;
            }
            return;
        };

        let props = props_for(&self.fields[idx], &self.values, &self.errors, self.disabled);
        if let Some(change) = self.controls[idx].handle_key(key, &props) {
            self.apply_change(change);
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        // The focused control goes first: its dropdown overlays the fields below.
        let order: Vec<usize> = self
            .focused
            .into_iter()
            .chain((0..self.controls.len()).filter(|i| Some(*i) != self.focused))
            .collect();

        for idx in order {
            let props = props_for(&self.fields[idx], &self.values, &self.errors, self.disabled);
            match self.controls[idx].handle_mouse(mouse, &props) {
                MouseOutcome::Outside => continue,
                MouseOutcome::Focus => self.set_focus(Some(idx)),
                MouseOutcome::Handled => {}
                MouseOutcome::Changed(change) => self.apply_change(change),
            }
            return;
        }

        if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
            self.set_focus(None);
        }
    }

    fn apply_change(&mut self, change: ChangeEvent) {
        debug!(field_id = %change.field_id, count = change.value.len(), "Field value changed");
        self.values.insert(change.field_id, change.value);
    }

    /// Move focus to the next (or previous) visible, enabled field.
    fn focus_next(&mut self, forward: bool) {
        if self.disabled {
            return;
        }
        let visible: Vec<usize> = (0..self.fields.len())
            .filter(|&i| !self.fields[i].is_hidden() && !self.fields[i].disabled)
            .collect();
        if visible.is_empty() {
            return;
        }

        let pos = self
            .focused
            .and_then(|current| visible.iter().position(|&i| i == current));
        let next = match (pos, forward) {
            (None, true) => 0,
            (None, false) => visible.len() - 1,
            (Some(p), true) => (p + 1) % visible.len(),
            (Some(p), false) => (p + visible.len() - 1) % visible.len(),
        };
        self.set_focus(Some(visible[next]));
    }

    fn set_focus(&mut self, next: Option<usize>) {
        if self.focused == next {
            return;
        }
        if let Some(prev) = self.focused {
            self.controls[prev].blur();
        }
        if let Some(idx) = next {
            let props = props_for(&self.fields[idx], &self.values, &self.errors, self.disabled);
            self.controls[idx].focus(&props);
        }
        debug!(from = ?self.focused, to = ?next, "Focus changed");
        self.focused = next;
    }

    /// Render the application UI.
    ///
    /// This implements the View part of The Elm Architecture (TEA).
    pub fn view(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(1),    // Fields
                Constraint::Length(1), // Help
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        self.render_fields(frame, chunks[1]);

        // The open dropdown is drawn last so it stays on top of later fields.
        if let Some(idx) = self.focused {
            let props = props_for(&self.fields[idx], &self.values, &self.errors, self.disabled);
            self.controls[idx].render_overlay(frame, &props);
        }

        let context = KeyContext::from_state(self.focused.map(|i| self.controls[i].state()));
        render_context_help(frame, chunks[2], context);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(t.border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let title = Paragraph::new(self.title.as_str())
            .style(Style::default().fg(t.accent))
            .alignment(Alignment::Center);
        frame.render_widget(title, inner);

        if self.controls.iter().any(Taglist::is_loading) {
            self.spinner.render(frame, inner, "Loading options");
        }
    }

    /// Draw the visible fields top to bottom.
    ///
    /// Drawing starts late enough for the focused field to be on screen and
    /// stops at the first field that does not fit.
    fn render_fields(&mut self, frame: &mut Frame, area: Rect) {
        for control in &mut self.controls {
            control.clear_layout();
        }

        let heights: Vec<(usize, u16)> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, field)| !field.is_hidden())
            .map(|(idx, field)| {
                let props = props_for(field, &self.values, &self.errors, self.disabled);
                (idx, self.controls[idx].height(&props, area.width))
            })
            .collect();

        let first = first_drawn_field(&heights, self.focused, area.height);
        let bottom = area.y + area.height;
        let mut y = area.y;

        for &(idx, height) in &heights[first..] {
            if y + height > bottom {
                break;
            }
            let props = props_for(&self.fields[idx], &self.values, &self.errors, self.disabled);
            self.controls[idx].render(frame, Rect::new(area.x, y, area.width, height), &props);
            y += height + FIELD_SPACING;
        }
    }

    /// The current values keyed by field key, as printed on exit.
    pub fn values_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|field| {
                let values = self
                    .value(&field.id)
                    .iter()
                    .map(|v| v.as_json().clone())
                    .collect();
                (field.value_key().to_string(), Value::Array(values))
            })
            .collect();
        Value::Object(map)
    }
}

/// Position in `heights` of the first field to draw so that the focused
/// field fits in `available` rows below it.
fn first_drawn_field(heights: &[(usize, u16)], focused: Option<usize>, available: u16) -> usize {
    let Some(last) = focused.and_then(|f| heights.iter().position(|&(idx, _)| idx == f)) else {
        return 0;
    };
    let rows_from = |first: usize| -> u16 {
        heights[first..=last]
            .iter()
            .map(|&(_, height)| height + FIELD_SPACING)
            .sum::<u16>()
            - FIELD_SPACING
    };

    let mut first = 0;
    while first < last && rows_from(first) > available {
        first += 1;
    }
    first
}

fn props_for<'a>(
    field: &'a FieldDefinition,
    values: &'a HashMap<String, Vec<OptionValue>>,
    errors: &'a FormErrors,
    disabled: bool,
) -> TaglistProps<'a> {
    TaglistProps {
        disabled: disabled || field.disabled,
        errors: errors.for_field(&field.id),
        field,
        value: values.get(&field.id).map(Vec::as_slice).unwrap_or(&[]),
    }
}
