//! Battle log panel.
//!
//! Each entry gets a one-glyph marker for its level so hits and failures stay
//! distinguishable without color. Confirmed hits are drawn bold.

use client_frontend_core::{
    message::{MessageEntry, MessageLevel},
    view_model::PresentationMapper,
};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListDirection, ListItem},
};

/// Render the battle log.
///
/// `messages` is newest first; the list is drawn bottom-to-top so the newest
/// entry sits right above the footer.
pub fn render<T: PresentationMapper<Style = Style>>(
    frame: &mut Frame,
    area: Rect,
    messages: &[MessageEntry],
    panel_height: u16,
    theme: &T,
) {
    let rows = usize::from(panel_height);
    let items: Vec<ListItem> = messages
        .iter()
        .map(|entry| ListItem::new(entry_line(entry, theme.style_message(entry.level))))
        .chain(std::iter::repeat_with(|| ListItem::new("")))
        .take(rows.max(messages.len()))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title(messages)))
        .direction(ListDirection::BottomToTop);

    frame.render_widget(list, area);
}

fn marker(level: MessageLevel) -> &'static str {
    match level {
        MessageLevel::Info => "·",
        MessageLevel::Success => "+",
        MessageLevel::Warning => "!",
        MessageLevel::Error => "x",
    }
}

fn entry_line(entry: &MessageEntry, style: Style) -> Line<'static> {
    let style = if entry.level == MessageLevel::Success {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    };

    Line::from(vec![
        Span::styled(format!("{} ", marker(entry.level)), style),
        Span::styled(entry.text.clone(), style),
    ])
}

/// Shows the number of confirmed hits among the visible entries.
fn title(messages: &[MessageEntry]) -> String {
    let hits = messages
        .iter()
        .filter(|entry| entry.level == MessageLevel::Success)
        .count();
    match hits {
        0 => "Battle log".to_string(),
        n => format!("Battle log ({n} hit{})", if n == 1 { "" } else { "s" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn entries_are_prefixed_by_level() {
        let hit = MessageEntry::new("Hit! Boss HP 230", MessageLevel::Success);
        let failed = MessageEntry::new("Attack failed", MessageLevel::Error);

        assert_eq!(text_of(&entry_line(&hit, Style::default())), "+ Hit! Boss HP 230");
        assert_eq!(text_of(&entry_line(&failed, Style::default())), "x Attack failed");
    }

    #[test]
    fn only_hits_are_bold() {
        let hit = entry_line(
            &MessageEntry::new("Hit!", MessageLevel::Success),
            Style::default(),
        );
        let info = entry_line(
            &MessageEntry::new("Welcome", MessageLevel::Info),
            Style::default(),
        );

        assert!(hit.spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(!info.spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn title_counts_visible_hits() {
        let mut messages = vec![MessageEntry::new("Welcome", MessageLevel::Info)];
        assert_eq!(title(&messages), "Battle log");

        messages.push(MessageEntry::new("Hit!", MessageLevel::Success));
        assert_eq!(title(&messages), "Battle log (1 hit)");

        messages.push(MessageEntry::new("Hit!", MessageLevel::Success));
        assert_eq!(title(&messages), "Battle log (2 hits)");
    }
}
