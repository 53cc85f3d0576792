//! Rendering of the tag list.
//!
//! Pure wiring of state into widgets. The returned [`TaglistLayout`] records
//! where the interactive parts landed so that mouse input can be mapped back.

use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::form::SelectOption;
use crate::ui::components::{
    render_description, render_errors, render_label, text_height, DropdownList,
};
use crate::ui::theme::theme;

/// Rows taken by the borders of the tag box.
const TAG_BOX_BORDERS: u16 = 2;

/// Columns kept free for the filter input before it wraps to its own row.
const MIN_INPUT_WIDTH: u16 = 8;

/// Glyph of the remove affordance on a tag chip.
const REMOVE_GLYPH: &str = "×";

/// Message for an empty dropdown while unselected options remain.
pub const NO_RESULTS: &str = "No results";

/// Message for an empty dropdown once everything is selected.
pub const ALL_SELECTED: &str = "All values selected";

/// Everything the view needs to draw the field body.
#[derive(Debug)]
pub struct TaglistView<'a> {
    pub label: Option<&'a str>,
    pub description: Option<&'a str>,
    pub errors: &'a [String],
    pub disabled: bool,
    pub focused: bool,
    pub tags: &'a [&'a SelectOption],
    pub filter: &'a str,
    pub placeholder: &'a str,
}

impl TaglistView<'_> {
    /// Rows needed to draw the field body at `width` columns.
    ///
    /// The tag box grows by one row for every row of wrapped chips.
    pub fn height(&self, width: u16) -> u16 {
        text_height(self.label)
            + self.tag_box_height(width)
            + text_height(self.description)
            + self.errors.len() as u16
    }

    fn tag_box_height(&self, width: u16) -> u16 {
        let inner_width = width.saturating_sub(TAG_BOX_BORDERS);
        wrap_tags(self, inner_width).lines.len() as u16 + TAG_BOX_BORDERS
    }
}

/// Screen positions of the interactive parts, from the last render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaglistLayout {
    /// The whole field body.
    pub area: Rect,
    /// The bordered box holding the tags and the filter input.
    pub input: Rect,
    /// Remove affordances as `(tag index, cell)`.
    pub remove_buttons: Vec<(usize, Rect)>,
    /// Dropdown rows as `(candidate index, row)`. Empty while hidden.
    pub candidate_rows: Vec<(usize, Rect)>,
}

impl TaglistLayout {
    /// Tag whose remove affordance is at `pos`.
    pub fn remove_button_at(&self, pos: Position) -> Option<usize> {
        self.remove_buttons
            .iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(idx, _)| *idx)
    }

    /// Candidate drawn at `pos`.
    pub fn candidate_at(&self, pos: Position) -> Option<usize> {
        self.candidate_rows
            .iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(idx, _)| *idx)
    }
}

/// Draw the field body: label, tag box, description and errors.
pub fn render(frame: &mut Frame, area: Rect, view: &TaglistView) -> TaglistLayout {
    let t = theme();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(text_height(view.label)),
            Constraint::Length(view.tag_box_height(area.width)),
            Constraint::Length(text_height(view.description)),
            Constraint::Length(view.errors.len() as u16),
        ])
        .split(area);

    render_label(frame, chunks[0], view.label, view.focused);

    let border_style = if view.disabled {
        Style::default().fg(t.muted)
    } else if view.focused {
        Style::default().fg(t.border_focused)
    } else {
        Style::default().fg(t.border)
    };
    let block = Block::default().borders(Borders::ALL).border_style(border_style);
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    let rows = wrap_tags(view, inner.width);
    let lines: Vec<Line> = rows.lines.into_iter().map(Line::from).collect();
    frame.render_widget(Paragraph::new(lines), inner);

    let remove_buttons = rows
        .remove_buttons
        .into_iter()
        .map(|(idx, x, y)| (idx, Rect::new(inner.x + x, inner.y + y, 1, 1)))
        .collect();

    if view.focused && !view.disabled {
        let (x, y) = rows.cursor;
        if x < inner.width && y < inner.height {
            frame.set_cursor_position(Position::new(inner.x + x, inner.y + y));
        }
    }

    render_description(frame, chunks[2], view.description);
    render_errors(frame, chunks[3], view.errors);

    TaglistLayout {
        area,
        input: chunks[1],
        remove_buttons,
        candidate_rows: Vec::new(),
    }
}

/// Chips and input laid out over the rows of the tag box.
///
/// Positions are relative to the inner area of the box.
struct TagRows<'a> {
    lines: Vec<Vec<Span<'a>>>,
    /// Remove affordances as `(tag index, x, row)`.
    remove_buttons: Vec<(usize, u16, u16)>,
    /// Caret position at the end of the filter text.
    cursor: (u16, u16),
}

fn text_width(text: &str) -> u16 {
    Span::raw(text).width() as u16
}

/// Longest prefix of `text` that fits in `max` columns.
fn fit_prefix(text: &str, max: u16) -> &str {
    let mut end = text.len();
    while text_width(&text[..end]) > max {
        match text[..end].char_indices().last() {
            Some((idx, _)) => end = idx,
            None => break,
        }
    }
    &text[..end]
}

/// Longest suffix of `text` that fits in `max` columns.
fn fit_suffix(text: &str, max: u16) -> &str {
    let mut start = 0;
    while text_width(&text[start..]) > max {
        match text[start..].chars().next() {
            Some(c) => start += c.len_utf8(),
            None => break,
        }
    }
    &text[start..]
}

/// Flow the chips left to right, wrapping to a new row when a chip does not
/// fit, then place the filter input after the last chip.
///
/// Labels too wide for a whole row are cut so every chip keeps its remove
/// affordance on screen. The input moves to its own row when fewer than
/// [`MIN_INPUT_WIDTH`] columns remain.
fn wrap_tags<'a>(view: &TaglistView<'a>, width: u16) -> TagRows<'a> {
    let t = theme();
    let chip_style = if view.disabled {
        Style::default().fg(t.muted).add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(t.tag_fg).bg(t.tag_bg)
    };
    let remove_style = chip_style.add_modifier(Modifier::BOLD);
    let affordance: u16 = if view.disabled { 0 } else { 2 };

    let mut lines = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut remove_buttons = Vec::new();
    let mut x: u16 = 0;

    for (idx, tag) in view.tags.iter().enumerate() {
        let label = tag.display_label();
        let label = fit_prefix(&label, width.saturating_sub(2 + affordance));
        let chip_width = text_width(label) + 2 + affordance;
        if x > 0 && x.saturating_add(chip_width) > width {
            lines.push(std::mem::take(&mut current));
            x = 0;
        }
        let row = lines.len() as u16;

        current.push(Span::styled(format!(" {label} "), chip_style));
        if !view.disabled {
            remove_buttons.push((idx, x + chip_width - affordance, row));
            current.push(Span::styled(REMOVE_GLYPH, remove_style));
            current.push(Span::styled(" ", chip_style));
        }
        x = x.saturating_add(chip_width);

        if x < width {
            current.push(Span::raw(" "));
            x += 1;
        }
    }

    let text = if view.filter.is_empty() {
        view.placeholder
    } else {
        view.filter
    };
    let needed = (text_width(text) + 1).clamp(MIN_INPUT_WIDTH.min(width), width.max(1));
    if x > 0 && x.saturating_add(needed) > width {
        lines.push(std::mem::take(&mut current));
        x = 0;
    }
    let row = lines.len() as u16;
    let available = width.saturating_sub(x);

    let cursor = if view.filter.is_empty() {
        let style = if view.focused {
            Style::default()
                .fg(t.input_placeholder)
                .add_modifier(Modifier::ITALIC)
        } else {
            Style::default().fg(t.input_placeholder)
        };
        current.push(Span::styled(fit_prefix(view.placeholder, available), style));
        (x, row)
    } else {
        // Keep the end of a long filter in view, with room for the caret
        let shown = fit_suffix(view.filter, available.saturating_sub(1));
        current.push(Span::styled(shown, Style::default().fg(t.input_fg)));
        (x + text_width(shown), row)
    };
    lines.push(current);

    TagRows {
        lines,
        remove_buttons,
        cursor,
    }
}

/// Draw the candidate dropdown below the tag box.
///
/// Returns the rows of the visible candidates.
pub fn render_dropdown(
    frame: &mut Frame,
    anchor: Rect,
    list: &mut DropdownList,
    candidates: &[&SelectOption],
    has_remaining_options: bool,
) -> Vec<(usize, Rect)> {
    let labels: Vec<String> = candidates.iter().map(|c| c.display_label()).collect();
    let empty_message = if has_remaining_options {
        NO_RESULTS
    } else {
        ALL_SELECTED
    };
    let area = DropdownList::area(labels.len(), anchor, frame.area());
    if area.height == 0 {
        list.hide();
        return Vec::new();
    }
    list.render(frame, area, &labels, empty_message)
}
