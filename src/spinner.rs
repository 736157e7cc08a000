//! Loading indicator.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

const LABEL: &str = "⠿ Loading…";

/// Draw the indicator centred in `area`.  Always the same visual.
pub fn render(frame: &mut Frame, area: Rect) {
    let line = Line::from(LABEL).style(Style::default().fg(Color::Yellow));
    frame.render_widget(Paragraph::new(line).centered(), area);
}
