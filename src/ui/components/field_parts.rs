//! Presentational parts shared by form fields: label, description, errors.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::theme::theme;

/// Render a field label. Renders nothing for an empty label.
pub fn render_label(frame: &mut Frame, area: Rect, label: Option<&str>, focused: bool) {
    let Some(label) = label.filter(|l| !l.is_empty()) else {
        return;
    };
    let t = theme();
    let style = if focused {
        Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(t.fg)
    };
    frame.render_widget(Paragraph::new(Span::styled(label.to_string(), style)), area);
}

/// Render the help text below a field.
pub fn render_description(frame: &mut Frame, area: Rect, description: Option<&str>) {
    let Some(description) = description.filter(|d| !d.is_empty()) else {
        return;
    };
    let paragraph =
        Paragraph::new(description.to_string()).style(Style::default().fg(theme().muted));
    frame.render_widget(paragraph, area);
}

/// Render a field's error messages, one per line.
pub fn render_errors(frame: &mut Frame, area: Rect, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    let style = Style::default().fg(theme().error);
    let lines: Vec<Line> = errors
        .iter()
        .map(|e| Line::from(Span::styled(e.clone(), style)))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

/// Rows needed for an optional single-line text.
pub fn text_height(text: Option<&str>) -> u16 {
    match text {
        Some(t) if !t.is_empty() => 1,
        _ => 0,
    }
}
