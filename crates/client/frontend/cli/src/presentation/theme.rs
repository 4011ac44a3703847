//! Ratatui theme implementation of PresentationMapper.

use battle::ActionPhase;
use client_frontend_core::{message::MessageLevel, view_model::PresentationMapper};
use ratatui::style::{Color, Modifier, Style};

/// Ratatui-specific theme implementing PresentationMapper.
#[derive(Debug, Default, Clone, Copy)]
pub struct RatatuiTheme;

impl PresentationMapper for RatatuiTheme {
    type Style = Style;

    fn style_health(&self, current: u64, maximum: u64) -> Self::Style {
        if maximum == 0 {
            return Style::default().fg(Color::Gray);
        }

        let percent = current.saturating_mul(100) / maximum;
        let color = match percent {
            75..=100 => Color::Green,
            50..=74 => Color::Yellow,
            25..=49 => Color::LightRed,
            _ => Color::Red,
        };

        Style::default().fg(color)
    }

    fn style_message(&self, level: MessageLevel) -> Self::Style {
        match level {
            MessageLevel::Info => Style::default().fg(Color::White),
            MessageLevel::Success => Style::default().fg(Color::LightGreen),
            MessageLevel::Warning => Style::default().fg(Color::Yellow),
            MessageLevel::Error => Style::default().fg(Color::LightRed),
        }
    }

    fn style_phase(&self, phase: ActionPhase) -> Self::Style {
        match phase {
            ActionPhase::Idle => Style::default().fg(Color::DarkGray),
            ActionPhase::Submitting => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::SLOW_BLINK),
            ActionPhase::Confirmed => Style::default().fg(Color::Green),
        }
    }

    fn style_toast(&self) -> Self::Style {
        Style::default()
            .fg(Color::LightYellow)
            .add_modifier(Modifier::BOLD)
    }
}
