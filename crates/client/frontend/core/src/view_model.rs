//! Presentation-ready projection of a [`BattleView`].
//!
//! Widgets never look at the raw snapshot; they read an [`ArenaViewModel`]
//! and ask a [`PresentationMapper`] for framework-specific styling.
use battle::{ActionPhase, BattleView};
use client_blockchain_core::{BossState, CharacterState};

use crate::message::MessageLevel;

/// Framework-agnostic styling hooks implemented by each frontend's theme.
pub trait PresentationMapper {
    type Style;

    fn style_health(&self, current: u64, maximum: u64) -> Self::Style;
    fn style_message(&self, level: MessageLevel) -> Self::Style;
    fn style_phase(&self, phase: ActionPhase) -> Self::Style;
    fn style_toast(&self) -> Self::Style;
}

/// One combatant as shown on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorCard {
    pub name: String,
    pub image_uri: String,
    pub hp: u64,
    pub max_hp: u64,
    pub attack_damage: u64,
}

impl ActorCard {
    /// Health as a fraction in `[0, 1]`.
    pub fn health_ratio(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        (self.hp as f64 / self.max_hp as f64).clamp(0.0, 1.0)
    }

    pub fn health_label(&self) -> String {
        format!("{} / {} HP", self.hp, self.max_hp)
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}

impl From<&BossState> for ActorCard {
    fn from(boss: &BossState) -> Self {
        Self {
            name: boss.name.clone(),
            image_uri: boss.image_uri.clone(),
            hp: boss.hp,
            max_hp: boss.max_hp,
            attack_damage: boss.attack_damage,
        }
    }
}

impl From<&CharacterState> for ActorCard {
    fn from(character: &CharacterState) -> Self {
        Self {
            name: character.name.clone(),
            image_uri: character.image_uri.clone(),
            hp: character.hp,
            max_hp: character.max_hp,
            attack_damage: character.attack_damage,
        }
    }
}

/// Everything the arena screen renders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArenaViewModel {
    pub connected: bool,
    pub boss: Option<ActorCard>,
    pub character: Option<ActorCard>,
    pub phase: ActionPhase,
    /// "💥 {boss} was hit for {damage}!" while the hit flag is set.
    pub toast: Option<String>,
    pub last_error: Option<String>,
    pub can_attack: bool,
}

impl ArenaViewModel {
    pub fn from_view(view: &BattleView) -> Self {
        let boss = view.boss.as_ref().map(ActorCard::from);
        let character = view.character.as_ref().map(ActorCard::from);

        let toast = match (&boss, &character) {
            (Some(boss), Some(character)) if view.hit_visible => Some(hit_toast(boss, character)),
            _ => None,
        };

        Self {
            connected: view.connected,
            can_attack: view.can_attack(),
            boss,
            character,
            phase: view.phase,
            toast,
            last_error: view.last_error.clone(),
        }
    }

    pub fn is_attacking(&self) -> bool {
        self.phase == ActionPhase::Submitting
    }
}

/// Toast text for a confirmed hit.
pub fn hit_toast(boss: &ActorCard, character: &ActorCard) -> String {
    format!("💥 {} was hit for {}!", boss.name, character.attack_damage)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> BattleView {
        BattleView {
            connected: true,
            boss: Some(BossState::new("Grave Colossus", "boss.png", 230, 250, 20).unwrap()),
            character: Some(CharacterState::new(0, "Rook", "rook.png", 580, 600, 25).unwrap()),
            ..BattleView::default()
        }
    }

    #[test]
    fn toast_only_while_hit_is_visible() {
        let mut view = view();
        assert_eq!(ArenaViewModel::from_view(&view).toast, None);

        view.phase = ActionPhase::Confirmed;
        view.hit_visible = true;
        assert_eq!(
            ArenaViewModel::from_view(&view).toast.as_deref(),
            Some("💥 Grave Colossus was hit for 25!")
        );
    }

    #[test]
    fn health_ratio_is_bounded() {
        let model = ArenaViewModel::from_view(&view());
        let boss = model.boss.unwrap();
        assert!((boss.health_ratio() - 0.92).abs() < 1e-9);
        assert_eq!(boss.health_label(), "230 / 250 HP");

        let broken = ActorCard {
            max_hp: 0,
            ..boss
        };
        assert_eq!(broken.health_ratio(), 0.0);
    }

    #[test]
    fn disconnected_view_has_no_cards() {
        let model = ArenaViewModel::from_view(&BattleView::default());
        assert!(!model.connected);
        assert!(model.boss.is_none());
        assert!(!model.can_attack);
    }
}
