//! Footer widget displaying key bindings.

use client_frontend_core::view_model::ArenaViewModel;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render(frame: &mut Frame, area: Rect, view_model: &ArenaViewModel) {
    let attack = if view_model.can_attack {
        Span::raw("[a/Space/Enter] Attack | ")
    } else {
        Span::styled(
            "[a/Space/Enter] Attack | ",
            Style::default().fg(Color::DarkGray),
        )
    };

    let line = Line::from(vec![attack, Span::raw("[q/Esc] Quit")]);
    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}
