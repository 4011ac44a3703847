//! Attack lifecycle state machine.
//!
//! ```text
//!          begin              confirm             expire
//!   Idle ────────→ Submitting ───────→ Confirmed ───────→ Idle
//!    ↑                 │                   │ begin
//!    └──── fail ───────┘                   └──────→ Submitting
//! ```
//!
//! The phase is presentation state only. It never influences reconciliation.

/// UI-facing phase of the operator's attack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActionPhase {
    #[default]
    Idle,
    /// An attack transaction is broadcast and awaiting ledger acceptance.
    Submitting,
    /// The ledger accepted the attack; shown for a fixed window.
    Confirmed,
}

/// Phase plus the transient "last hit" flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifecycle {
    phase: ActionPhase,
    hit_visible: bool,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    pub fn hit_visible(&self) -> bool {
        self.hit_visible
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == ActionPhase::Submitting
    }

    /// Enter `Submitting`. Returns `false` (and changes nothing) when an
    /// attack is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.phase = ActionPhase::Submitting;
        self.hit_visible = false;
        true
    }

    /// Ledger accepted the in-flight attack.
    pub fn confirm(&mut self) -> bool {
        if !self.is_submitting() {
            return false;
        }
        self.phase = ActionPhase::Confirmed;
        self.hit_visible = true;
        true
    }

    /// The in-flight attack failed; back to idle with no hit shown.
    pub fn fail(&mut self) {
        self.phase = ActionPhase::Idle;
        self.hit_visible = false;
    }

    /// Display window elapsed. Only a `Confirmed` phase reverts.
    pub fn expire(&mut self) -> bool {
        if self.phase != ActionPhase::Confirmed {
            return false;
        }
        self.phase = ActionPhase::Idle;
        self.hit_visible = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.phase(), ActionPhase::Idle);

        assert!(lifecycle.begin());
        assert_eq!(lifecycle.phase(), ActionPhase::Submitting);
        assert!(!lifecycle.hit_visible());

        assert!(lifecycle.confirm());
        assert_eq!(lifecycle.phase(), ActionPhase::Confirmed);
        assert!(lifecycle.hit_visible());

        assert!(lifecycle.expire());
        assert_eq!(lifecycle, Lifecycle::new());
    }

    #[test]
    fn begin_is_rejected_while_submitting() {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.begin());
        assert!(!lifecycle.begin());
        assert_eq!(lifecycle.phase(), ActionPhase::Submitting);
    }

    #[test]
    fn begin_from_confirmed_hides_previous_hit() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.begin();
        lifecycle.confirm();

        assert!(lifecycle.begin());
        assert_eq!(lifecycle.phase(), ActionPhase::Submitting);
        assert!(!lifecycle.hit_visible());
    }

    #[test]
    fn expire_leaves_other_phases_alone() {
        let mut lifecycle = Lifecycle::new();
        assert!(!lifecycle.expire());

        lifecycle.begin();
        assert!(!lifecycle.expire());
        assert_eq!(lifecycle.phase(), ActionPhase::Submitting);
    }

    #[test]
    fn fail_returns_to_idle() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.begin();
        lifecycle.fail();
        assert_eq!(lifecycle.phase(), ActionPhase::Idle);
        assert!(!lifecycle.hit_visible());
    }

    #[test]
    fn confirm_requires_submission() {
        let mut lifecycle = Lifecycle::new();
        assert!(!lifecycle.confirm());
        assert_eq!(lifecycle.phase(), ActionPhase::Idle);
    }

    #[test]
    fn phase_labels() {
        assert_eq!(ActionPhase::Submitting.to_string(), "submitting");
    }
}
