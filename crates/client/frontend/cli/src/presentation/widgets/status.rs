//! Status line: hit toast, attack phase or the last error.

use battle::ActionPhase;
use client_frontend_core::{
    message::MessageLevel,
    view_model::{ArenaViewModel, PresentationMapper},
};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render<T: PresentationMapper<Style = Style>>(
    frame: &mut Frame,
    area: Rect,
    view_model: &ArenaViewModel,
    theme: &T,
) {
    let line = match (&view_model.toast, view_model.phase) {
        (Some(toast), _) => Line::from(Span::styled(toast.clone(), theme.style_toast())),
        (None, ActionPhase::Submitting) => Line::from(Span::styled(
            "Attacking…",
            theme.style_phase(ActionPhase::Submitting),
        )),
        (None, phase) => match &view_model.last_error {
            Some(notice) => Line::from(Span::styled(
                notice.clone(),
                theme.style_message(MessageLevel::Error),
            )),
            None => Line::from(Span::styled("Ready", theme.style_phase(phase))),
        },
    };

    let paragraph = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}
