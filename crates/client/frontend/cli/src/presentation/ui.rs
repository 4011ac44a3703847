//! Composes the arena widgets into one frame.
use anyhow::Result;
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

use client_frontend_core::{message::MessageLog, view_model::ArenaViewModel};

use crate::presentation::{theme::RatatuiTheme, widgets};

/// Rendering context containing all state and configuration needed for UI rendering.
pub struct RenderContext<'a> {
    pub view_model: &'a ArenaViewModel,
    pub messages: &'a MessageLog,
    pub message_panel_height: u16,
}

pub fn render<B: Backend>(terminal: &mut Terminal<B>, ctx: &RenderContext) -> Result<()> {
    let theme = RatatuiTheme;
    terminal.draw(|frame| draw(frame, ctx, &theme))?;
    Ok(())
}

fn draw(frame: &mut Frame, ctx: &RenderContext, theme: &RatatuiTheme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                        // Header
            Constraint::Min(8),                           // Arena
            Constraint::Length(3),                        // Status
            Constraint::Length(ctx.message_panel_height), // Messages
            Constraint::Length(3),                        // Footer
        ])
        .split(frame.area());

    widgets::header::render(frame, chunks[0], ctx.view_model);

    if ctx.view_model.connected {
        render_arena(frame, chunks[1], ctx.view_model, theme);
    } else {
        render_disconnected(frame, chunks[1]);
    }

    widgets::status::render(frame, chunks[2], ctx.view_model, theme);

    let recent_messages: Vec<_> = ctx
        .messages
        .recent(ctx.message_panel_height as usize)
        .cloned()
        .collect();
    widgets::messages::render(
        frame,
        chunks[3],
        &recent_messages,
        ctx.message_panel_height,
        theme,
    );

    widgets::footer::render(frame, chunks[4], ctx.view_model);
}

fn render_arena(frame: &mut Frame, area: Rect, view_model: &ArenaViewModel, theme: &RatatuiTheme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    widgets::actor_card::render(frame, columns[0], "Boss", view_model.boss.as_ref(), theme);
    widgets::actor_card::render(
        frame,
        columns[1],
        "Your character",
        view_model.character.as_ref(),
        theme,
    );
}

fn render_disconnected(frame: &mut Frame, area: Rect) {
    let placeholder = Paragraph::new("No connection")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(placeholder, centered_rect(50, 40, area));
}

/// Create a centered rectangle inside `r`.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle::{ActionPhase, BattleView};
    use client_blockchain_core::{BossState, CharacterState};
    use ratatui::backend::TestBackend;

    fn screen(view: &BattleView, messages: &MessageLog) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let view_model = ArenaViewModel::from_view(view);
        let ctx = RenderContext {
            view_model: &view_model,
            messages,
            message_panel_height: 6,
        };
        render(&mut terminal, &ctx).unwrap();

        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn disconnected_screen_shows_no_boss() {
        let text = screen(&BattleView::default(), &MessageLog::new(4));
        assert!(text.contains("No connection"));
        assert!(!text.contains("Your character"));
    }

    #[test]
    fn connected_screen_shows_both_cards_and_toast() {
        let view = BattleView {
            connected: true,
            boss: Some(BossState::new("Grave Colossus", "boss.png", 225, 250, 20).unwrap()),
            character: Some(CharacterState::new(0, "Rook", "rook.png", 580, 600, 25).unwrap()),
            phase: ActionPhase::Confirmed,
            hit_visible: true,
            last_error: None,
        };
        let mut messages = MessageLog::new(4);
        messages.info("Grave Colossus appears");

        let text = screen(&view, &messages);
        assert!(text.contains("Grave Colossus"));
        assert!(text.contains("Rook"));
        assert!(text.contains("225 / 250 HP"));
        assert!(text.contains("was hit for 25!"));
    }
}
