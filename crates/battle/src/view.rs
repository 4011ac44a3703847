//! Read-only snapshot published to presentation.
use client_blockchain_core::{BossState, CharacterState};

use crate::phase::ActionPhase;

/// Everything a frontend needs to render the arena.
///
/// `boss` stays `None` until the initial read lands; with no live contract
/// handle it stays `None` for the controller's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BattleView {
    /// A contract handle is bound.
    pub connected: bool,
    pub boss: Option<BossState>,
    pub character: Option<CharacterState>,
    pub phase: ActionPhase,
    /// A confirmed hit is on display.
    pub hit_visible: bool,
    /// Notice from the last failed call, cleared by the next attack.
    pub last_error: Option<String>,
}

impl BattleView {
    /// Whether an attack request would be acted on.
    pub fn can_attack(&self) -> bool {
        self.connected && self.phase != ActionPhase::Submitting
    }
}
