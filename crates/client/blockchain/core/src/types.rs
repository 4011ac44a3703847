//! Common types for arena contract interactions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::traits::{NotificationError, StateError};

/// Public state of the shared boss as stored on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossState {
    pub name: String,
    pub image_uri: String,
    pub hp: u64,
    pub max_hp: u64,
    /// Damage the boss deals back to every attacker.
    pub attack_damage: u64,
}

impl BossState {
    /// Builds a boss record, rejecting health values that break `hp <= max_hp`.
    pub fn new(
        name: impl Into<String>,
        image_uri: impl Into<String>,
        hp: u64,
        max_hp: u64,
        attack_damage: u64,
    ) -> Result<Self, StateError> {
        check_health(hp, max_hp)?;
        Ok(Self {
            name: name.into(),
            image_uri: image_uri.into(),
            hp,
            max_hp,
            attack_damage,
        })
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}

/// The operator's character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterState {
    /// Index of the character template the NFT was minted from.
    pub index: u64,
    pub name: String,
    pub image_uri: String,
    pub hp: u64,
    pub max_hp: u64,
    pub attack_damage: u64,
}

impl CharacterState {
    /// Builds a character record, rejecting health values that break `hp <= max_hp`.
    pub fn new(
        index: u64,
        name: impl Into<String>,
        image_uri: impl Into<String>,
        hp: u64,
        max_hp: u64,
        attack_damage: u64,
    ) -> Result<Self, StateError> {
        check_health(hp, max_hp)?;
        Ok(Self {
            index,
            name: name.into(),
            image_uri: image_uri.into(),
            hp,
            max_hp,
            attack_damage,
        })
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}

fn check_health(hp: u64, max_hp: u64) -> Result<(), StateError> {
    if max_hp == 0 {
        return Err(StateError::ZeroMaximum);
    }
    if hp > max_hp {
        return Err(StateError::HealthAboveMaximum { hp, max_hp });
    }
    Ok(())
}

/// Notification exactly as delivered by a backend.
///
/// Fields are optional because the backend only transports what the ledger
/// emitted; validation happens on conversion to [`NotificationPayload`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNotification {
    pub boss_hp: Option<u64>,
    pub player_hp: Option<u64>,
    /// Transaction that emitted the event, when the backend knows it.
    pub transaction_id: Option<TransactionId>,
}

/// Post-attack health of both participants, reported by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub boss_hp: u64,
    pub player_hp: u64,
}

impl NotificationPayload {
    pub const fn new(boss_hp: u64, player_hp: u64) -> Self {
        Self { boss_hp, player_hp }
    }
}

impl TryFrom<RawNotification> for NotificationPayload {
    type Error = NotificationError;

    fn try_from(raw: RawNotification) -> Result<Self, Self::Error> {
        let boss_hp = raw
            .boss_hp
            .ok_or(NotificationError::MissingField("boss_hp"))?;
        let player_hp = raw
            .player_hp
            .ok_or(NotificationError::MissingField("player_hp"))?;
        Ok(Self { boss_hp, player_hp })
    }
}

/// Backend-assigned key of one bound notification listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Generic transaction identifier (chain-specific hash bytes).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub Vec<u8>);

impl TransactionId {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Ledger acceptance of a submitted attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_id: TransactionId,
    pub block_number: u64,
}
