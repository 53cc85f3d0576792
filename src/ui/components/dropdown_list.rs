//! Candidate list shown below a selection input.
//!
//! The list does not own its items. The parent passes the current candidates
//! on every call, and the list only tracks which row is highlighted. Keys are
//! delivered by the parent from its own input, so the caret of the input box
//! and the highlight move independently.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::ui::theme::theme;

/// Maximum number of rows shown at once.
pub const MAX_VISIBLE_ITEMS: usize = 8;

/// Action resulting from dropdown list input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownListAction {
    /// The candidate at this index was chosen.
    Select(usize),
}

/// Highlight state of a candidate list.
#[derive(Debug, Clone, Default)]
pub struct DropdownList {
    /// Index of the highlighted candidate.
    highlighted: usize,
    /// Index of the first visible candidate.
    offset: usize,
    /// Rows available on the last render. `None` until first drawn.
    viewport: Option<usize>,
}

impl DropdownList {
    /// Create a list with the first candidate highlighted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the highlighted candidate.
    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Highlight the first candidate again.
    pub fn reset(&mut self) {
        self.highlighted = 0;
        self.offset = 0;
    }

    /// Keep the highlight inside a list of `len` candidates.
    pub fn clamp(&mut self, len: usize) {
        if self.highlighted >= len {
            self.highlighted = len.saturating_sub(1);
        }
        self.scroll_into_view();
    }

    /// Handle a key forwarded from the input.
    ///
    /// Up/Down move the highlight, Enter chooses the highlighted candidate.
    pub fn handle_input(&mut self, key: KeyEvent, len: usize) -> Option<DropdownListAction> {
        match key.code {
            KeyCode::Down => {
                if len > 0 && self.highlighted < len - 1 {
                    self.highlighted += 1;
                    self.scroll_into_view();
                }
                None
            }
            KeyCode::Up => {
                if self.highlighted > 0 {
                    self.highlighted -= 1;
                    self.scroll_into_view();
                }
                None
            }
            KeyCode::Enter if self.highlighted < len && self.visible_rows() > 0 => {
                Some(DropdownListAction::Select(self.highlighted))
            }
            _ => None,
        }
    }

    /// Number of candidate rows the list can show.
    ///
    /// Smaller than [`MAX_VISIBLE_ITEMS`] when the last render was cut short
    /// by the edge of the screen.
    pub fn visible_rows(&self) -> usize {
        self.viewport.unwrap_or(MAX_VISIBLE_ITEMS)
    }

    /// Record that the list could not be drawn at all.
    pub fn hide(&mut self) {
        self.viewport = Some(0);
    }

    fn scroll_into_view(&mut self) {
        let rows = self.visible_rows();
        if rows == 0 {
            return;
        }
        if self.highlighted < self.offset {
            self.offset = self.highlighted;
        } else if self.highlighted >= self.offset + rows {
            self.offset = self.highlighted + 1 - rows;
        }
    }

    /// Area the list occupies when anchored below `anchor`.
    ///
    /// An empty list still takes one row for its message.
    pub fn area(len: usize, anchor: Rect, screen: Rect) -> Rect {
        let height = (len.clamp(1, MAX_VISIBLE_ITEMS) + 2) as u16;
        let y = anchor.y + anchor.height;
        let space_below = (screen.y + screen.height).saturating_sub(y);
        Rect::new(anchor.x, y, anchor.width, height.min(space_below))
    }

    /// Render the list and return the screen rows of visible candidates.
    ///
    /// Each returned pair is `(candidate index, row area)`. The highlighted
    /// candidate is always among them, so Enter never chooses a row the
    /// user cannot see.
    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        labels: &[String],
        empty_message: &str,
    ) -> Vec<(usize, Rect)> {
        let t = theme();

        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.border_focused))
            .style(Style::default().bg(t.bg));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.viewport = Some(inner.height as usize);
        self.scroll_into_view();

        if labels.is_empty() {
            let message = Paragraph::new(empty_message).style(Style::default().fg(t.muted));
            frame.render_widget(message, inner);
            return Vec::new();
        }

        let items: Vec<ListItem> = labels
            .iter()
            .skip(self.offset)
            .take(inner.height as usize)
            .map(|label| ListItem::new(label.clone()).style(Style::default().fg(t.fg)))
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(t.bg)
                    .bg(t.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(self.highlighted.checked_sub(self.offset));
        frame.render_stateful_widget(list, inner, &mut state);

        (0..inner.height as usize)
            .map(|row| self.offset + row)
            .filter(|&idx| idx < labels.len())
            .map(|idx| {
                let y = inner.y + (idx - self.offset) as u16;
                (idx, Rect::new(inner.x, y, inner.width, 1))
            })
            .collect()
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

    #[test]
    fn test_navigation() {
        let mut list = DropdownList::new();
        list.handle_input(key(KeyCode::Down), 3);
        list.handle_input(key(KeyCode::Down), 3);
        assert_eq!(list.highlighted(), 2);

        // Can't go past the end
        list.handle_input(key(KeyCode::Down), 3);
        assert_eq!(list.highlighted(), 2);

        list.handle_input(key(KeyCode::Up), 3);
        assert_eq!(list.highlighted(), 1);
    }

    #[test]
    fn test_enter_selects_highlighted() {
        let mut list = DropdownList::new();
        list.handle_input(key(KeyCode::Down), 2);
        assert_eq!(
            list.handle_input(key(KeyCode::Enter), 2),
            Some(DropdownListAction::Select(1))
        );
    }

    #[test]
    fn test_enter_on_empty_list() {
        let mut list = DropdownList::new();
        assert_eq!(list.handle_input(key(KeyCode::Enter), 0), None);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut list = DropdownList::new();
        for _ in 0..4 {
            list.handle_input(key(KeyCode::Down), 5);
        }
        list.clamp(2);
        assert_eq!(list.highlighted(), 1);
        list.clamp(0);
        assert_eq!(list.highlighted(), 0);
    }

    #[test]
    fn test_area_below_anchor() {
        let screen = Rect::new(0, 0, 40, 30);
        let anchor = Rect::new(2, 3, 20, 3);
        let area = DropdownList::area(3, anchor, screen);
        assert_eq!(area, Rect::new(2, 6, 20, 5));

        let area = DropdownList::area(0, anchor, screen);
        assert_eq!(area.height, 3);
    }

    #[test]
    fn test_render_rows() {
        let backend = TestBackend::new(30, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let labels = vec!["Alpha".to_string(), "Beta".to_string()];
        let mut list = DropdownList::new();

        let mut rows = Vec::new();
        terminal
            .draw(|frame| {
                rows = list.render(frame, Rect::new(0, 0, 20, 4), &labels, "No results");
            })
            .unwrap();

        assert_eq!(rows, vec![(0, Rect::new(1, 1, 18, 1)), (1, Rect::new(1, 2, 18, 1))]);
    }

    #[test]
    fn test_render_empty_message() {
        let backend = TestBackend::new(30, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut list = DropdownList::new();

        let mut rows = vec![(9, Rect::default())];
        terminal
            .draw(|frame| {
                rows = list.render(frame, Rect::new(0, 0, 26, 3), &[], "All values selected");
            })
            .unwrap();

        assert!(rows.is_empty());
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let line: String = buffer.content()[width..2 * width]
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(line.contains("All values selected"));
    }

    fn labels(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("Option {i}")).collect()
    }

    /// Draw the list and return the returned rows plus the label on the
    /// row carrying the highlight symbol.
    fn draw(
        terminal: &mut Terminal<TestBackend>,
        list: &mut DropdownList,
        area: Rect,
        labels: &[String],
    ) -> (Vec<(usize, Rect)>, Option<(u16, String)>) {
        let mut rows = Vec::new();
        terminal
            .draw(|frame| rows = list.render(frame, area, labels, "No results"))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let highlighted = buffer
            .content()
            .chunks(width)
            .enumerate()
            .map(|(y, cells)| (y as u16, cells.iter().map(|c| c.symbol()).collect::<String>()))
            .find(|(_, line)| line.contains("> "))
            .map(|(y, line)| (y, line.replace('│', "").replace("> ", "").trim().to_string()));
        (rows, highlighted)
    }

    #[test]
    fn test_scrolls_past_max_visible_items() {
        let backend = TestBackend::new(30, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let labels = labels(12);
        let mut list = DropdownList::new();
        let area = Rect::new(0, 0, 30, (MAX_VISIBLE_ITEMS + 2) as u16);

        draw(&mut terminal, &mut list, area, &labels);
        for _ in 0..10 {
            list.handle_input(key(KeyCode::Down), labels.len());
        }
        let (rows, highlighted) = draw(&mut terminal, &mut list, area, &labels);

        assert_eq!(rows.len(), MAX_VISIBLE_ITEMS);
        assert_eq!(rows.last().map(|(idx, _)| *idx), Some(10));
        let (y, text) = highlighted.unwrap();
        assert_eq!(text, "Option 10");
        let chosen = list.handle_input(key(KeyCode::Enter), labels.len());
        assert_eq!(chosen, Some(DropdownListAction::Select(10)));
        assert!(rows.iter().any(|(idx, rect)| *idx == 10 && rect.y == y));
    }

    #[test]
    fn test_highlight_stays_on_screen_when_cut_short() {
        // Only two candidate rows fit between the anchor and the bottom edge
        let backend = TestBackend::new(40, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        let labels = labels(10);
        let mut list = DropdownList::new();
        let area = DropdownList::area(labels.len(), Rect::new(0, 1, 40, 3), Rect::new(0, 0, 40, 8));
        assert_eq!(area.height, 4);

        draw(&mut terminal, &mut list, area, &labels);
        assert_eq!(list.visible_rows(), 2);
        for _ in 0..3 {
            list.handle_input(key(KeyCode::Down), labels.len());
        }
        let (rows, highlighted) = draw(&mut terminal, &mut list, area, &labels);

        assert_eq!(rows.iter().map(|(idx, _)| *idx).collect::<Vec<_>>(), vec![2, 3]);
        let (y, text) = highlighted.unwrap();
        assert_eq!(text, "Option 3");
        assert_eq!(
            list.handle_input(key(KeyCode::Enter), labels.len()),
            Some(DropdownListAction::Select(3))
        );
        assert!(rows.iter().any(|(idx, rect)| *idx == 3 && rect.y == y));
    }

    #[test]
    fn test_shrinking_screen_rescrolls_on_render() {
        let mut terminal = Terminal::new(TestBackend::new(30, 20)).unwrap();
        let labels = labels(10);
        let mut list = DropdownList::new();
        for _ in 0..5 {
            list.handle_input(key(KeyCode::Down), labels.len());
        }

        let (rows, highlighted) = draw(&mut terminal, &mut list, Rect::new(0, 0, 30, 5), &labels);

        assert_eq!(rows.iter().map(|(idx, _)| *idx).collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(highlighted.map(|(_, text)| text), Some("Option 5".to_string()));
    }

    #[test]
    fn test_enter_ignored_when_nothing_drawn() {
        let mut list = DropdownList::new();
        list.hide();
        assert_eq!(list.handle_input(key(KeyCode::Enter), 3), None);
    }
}
