//! Utilities for reacting to published battle views inside UI layers.
use battle::{ActionPhase, BattleView};
use client_blockchain_core::{BossState, CharacterState};

use crate::config::NoticeVisibility;
use crate::message::MessageLog;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewImpact {
    pub requires_redraw: bool,
}

impl ViewImpact {
    pub const fn none() -> Self {
        Self {
            requires_redraw: false,
        }
    }

    pub const fn redraw() -> Self {
        Self {
            requires_redraw: true,
        }
    }

    pub fn combine(self, other: Self) -> Self {
        Self {
            requires_redraw: self.requires_redraw || other.requires_redraw,
        }
    }
}

pub trait ViewConsumer {
    fn on_view(&mut self, view: &BattleView) -> ViewImpact;
    fn message_log(&self) -> &MessageLog;
    fn message_log_mut(&mut self) -> &mut MessageLog;
}

/// Turns successive [`BattleView`] snapshots into operator-facing messages.
///
/// Views are diffed against the previously observed one, so a snapshot that
/// the frontend sees twice produces no duplicate messages.
pub struct BattleNarrator {
    previous: Option<BattleView>,
    log: MessageLog,
    visibility: NoticeVisibility,
}

impl BattleNarrator {
    pub fn new(log: MessageLog, visibility: NoticeVisibility) -> Self {
        Self {
            previous: None,
            log,
            visibility,
        }
    }

    pub fn into_message_log(self) -> MessageLog {
        self.log
    }

    fn narrate_connection(&mut self, before: &BattleView, view: &BattleView, first: bool) {
        if !view.connected && (first || before.connected) {
            self.log
                .warning("No connection to the arena contract; attacks are disabled");
        }
    }

    fn narrate_boss(&mut self, before: Option<&BossState>, now: Option<&BossState>) {
        let Some(boss) = now else {
            return;
        };
        match before {
            None => self.log.info(format!(
                "{} appears ({} / {} HP)",
                boss.name, boss.hp, boss.max_hp
            )),
            Some(old) if old.hp != boss.hp => {
                if self.visibility.show_health {
                    self.log
                        .info(format!("{} HP {} → {}", boss.name, old.hp, boss.hp));
                }
                if boss.is_defeated() && !old.is_defeated() {
                    self.log.success(format!("{} has been defeated!", boss.name));
                }
            }
            Some(_) => {}
        }
    }

    fn narrate_character(&mut self, before: Option<&CharacterState>, now: Option<&CharacterState>) {
        let (Some(old), Some(character)) = (before, now) else {
            return;
        };
        if old.hp == character.hp {
            return;
        }
        if self.visibility.show_health {
            self.log.info(format!(
                "{} HP {} → {}",
                character.name, old.hp, character.hp
            ));
        }
        if character.is_defeated() && !old.is_defeated() {
            self.log.error(format!("{} has fallen", character.name));
        }
    }

    fn narrate_phase(&mut self, before: &BattleView, view: &BattleView) {
        if before.phase == view.phase {
            return;
        }
        let boss_name = view
            .boss
            .as_ref()
            .map(|boss| boss.name.as_str())
            .unwrap_or("the boss");

        match view.phase {
            ActionPhase::Submitting if self.visibility.show_phase => {
                self.log.info(format!("Attacking {boss_name}…"));
            }
            ActionPhase::Confirmed if view.hit_visible => {
                let damage = view
                    .character
                    .as_ref()
                    .map(|character| character.attack_damage)
                    .unwrap_or_default();
                self.log
                    .success(format!("💥 {boss_name} was hit for {damage}!"));
            }
            _ => {}
        }
    }

    fn narrate_error(&mut self, before: &BattleView, view: &BattleView) {
        match &view.last_error {
            Some(notice) if before.last_error.as_ref() != Some(notice) => {
                self.log.error(notice.clone());
            }
            _ => {}
        }
    }
}

impl ViewConsumer for BattleNarrator {
    fn on_view(&mut self, view: &BattleView) -> ViewImpact {
        let first = self.previous.is_none();
        let before = self.previous.take().unwrap_or_default();
        if !first && before == *view {
            self.previous = Some(before);
            return ViewImpact::none();
        }

        self.narrate_connection(&before, view, first);
        self.narrate_boss(before.boss.as_ref(), view.boss.as_ref());
        self.narrate_character(before.character.as_ref(), view.character.as_ref());
        self.narrate_phase(&before, view);
        self.narrate_error(&before, view);

        self.previous = Some(view.clone());
        ViewImpact::redraw()
    }

    fn message_log(&self) -> &MessageLog {
        &self.log
    }

    fn message_log_mut(&mut self) -> &mut MessageLog {
        &mut self.log
    }
}
