//! Actor state store and notification reconciliation.
//!
//! The boss and the character are two independent records. Both change only
//! through [`reconcile`] (and, for the boss, the initial read); the attack
//! path never writes them.
use client_blockchain_core::{BossState, CharacterState, NotificationPayload};
use tracing::warn;

/// Apply an authoritative notification to both actor records.
///
/// Only `hp` changes. Values above the record's maximum are clamped so the
/// stored invariant `hp <= max_hp` always holds.
pub fn reconcile(
    boss: &BossState,
    character: &CharacterState,
    payload: &NotificationPayload,
) -> (BossState, CharacterState) {
    let mut boss = boss.clone();
    let mut character = character.clone();
    boss.hp = clamp_health("boss", payload.boss_hp, boss.max_hp);
    character.hp = clamp_health("character", payload.player_hp, character.max_hp);
    (boss, character)
}

fn clamp_health(actor: &'static str, reported: u64, max_hp: u64) -> u64 {
    if reported > max_hp {
        warn!(actor, reported, max_hp, "Notified health exceeds maximum; clamping");
        max_hp
    } else {
        reported
    }
}

/// Owner of the cached boss and character records.
#[derive(Debug, Clone, Default)]
pub struct ActorStore {
    boss: Option<BossState>,
    character: Option<CharacterState>,
    /// Boss health from a notification that beat the initial read.
    pending_boss_hp: Option<u64>,
}

impl ActorStore {
    pub fn new(character: Option<CharacterState>) -> Self {
        Self {
            boss: None,
            character,
            pending_boss_hp: None,
        }
    }

    pub fn boss(&self) -> Option<&BossState> {
        self.boss.as_ref()
    }

    pub fn character(&self) -> Option<&CharacterState> {
        self.character.as_ref()
    }

    /// Store the result of the initial boss read.
    ///
    /// A notification that arrived earlier is newer than the read, so its
    /// health value is laid over the fresh record.
    pub fn load_boss(&mut self, boss: BossState) {
        let mut boss = boss;
        let hp = self.pending_boss_hp.take().unwrap_or(boss.hp);
        boss.hp = clamp_health("boss", hp, boss.max_hp);
        self.boss = Some(boss);
    }

    /// Reconcile a notification into whichever records are present.
    pub fn apply(&mut self, payload: &NotificationPayload) {
        match (self.boss.as_ref(), self.character.as_ref()) {
            (Some(boss), Some(character)) => {
                let (boss, character) = reconcile(boss, character, payload);
                self.boss = Some(boss);
                self.character = Some(character);
            }
            (Some(boss), None) => {
                let mut boss = boss.clone();
                boss.hp = clamp_health("boss", payload.boss_hp, boss.max_hp);
                self.boss = Some(boss);
            }
            (None, character) => {
                if let Some(character) = character {
                    let mut character = character.clone();
                    character.hp =
                        clamp_health("character", payload.player_hp, character.max_hp);
                    self.character = Some(character);
                }
                self.pending_boss_hp = Some(payload.boss_hp);
            }
        }
    }

    /// Drop the boss record; used when the contract handle is replaced.
    pub fn forget_boss(&mut self) {
        self.boss = None;
        self.pending_boss_hp = None;
    }
}
