//! Card widget for one combatant: name, portrait URI, health gauge, damage.

use client_frontend_core::view_model::{ActorCard, PresentationMapper};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

/// Render `card` inside a bordered block titled `title`.
///
/// A missing card renders a placeholder (the boss before the first read lands).
pub fn render<T: PresentationMapper<Style = Style>>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    card: Option<&ActorCard>,
    theme: &T,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(card) = card else {
        let waiting = Paragraph::new(Span::styled(
            "Loading…",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(waiting, inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Name and portrait
            Constraint::Length(1), // Health gauge
            Constraint::Min(0),    // Damage
        ])
        .split(inner);

    let name_style = if card.is_defeated() {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };

    let identity = Paragraph::new(vec![
        Line::from(Span::styled(card.name.clone(), name_style)),
        Line::from(Span::styled(
            card.image_uri.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(identity, chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(theme.style_health(card.hp, card.max_hp))
        .ratio(card.health_ratio())
        .label(card.health_label());
    frame.render_widget(gauge, chunks[1]);

    let damage = Paragraph::new(Line::from(vec![
        Span::styled("Attack damage: ", Style::default().fg(Color::White)),
        Span::raw(card.attack_damage.to_string()),
    ]));
    frame.render_widget(damage, chunks[2]);
}
