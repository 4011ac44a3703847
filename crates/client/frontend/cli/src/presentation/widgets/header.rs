//! Header widget: title and connection state.

use client_frontend_core::view_model::ArenaViewModel;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render(frame: &mut Frame, area: Rect, view_model: &ArenaViewModel) {
    let connection = if view_model.connected {
        Span::styled("● connected", Style::default().fg(Color::Green))
    } else {
        Span::styled("○ No connection", Style::default().fg(Color::Red))
    };

    let line = Line::from(vec![
        Span::styled(
            "Boss Arena",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        connection,
    ]);

    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}
