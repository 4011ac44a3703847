//! Arena contract abstraction traits.
//!
//! This module defines the seams between the client and a ledger backend:
//! - [`CombatContract`]: the deployed arena contract (reads, attacks, events)
//! - [`PendingAttack`]: a broadcast attack awaiting ledger acceptance
//! - [`ConnectionProvider`]: source of a live contract handle, if any
//! - [`CharacterReader`]: lookup of the operator's character

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::types::{
    BossState, CharacterState, RawNotification, SubscriptionId, TransactionId, TransactionReceipt,
};

// ============================================================================
// Error Types
// ============================================================================

/// Failures of remote contract calls.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ContractError {
    #[error("Action rejected by the ledger: {0}")]
    ActionRejected(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request cancelled: {0}")]
    Cancelled(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Invalid contract data: {0}")]
    InvalidData(String),

    #[error("No character found for the connected account")]
    CharacterNotFound,

    #[error("Subscription failed: {0}")]
    Subscription(String),
}

/// Actor records that violate the health invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("Maximum health must be positive")]
    ZeroMaximum,

    #[error("Health {hp} exceeds maximum {max_hp}")]
    HealthAboveMaximum { hp: u64, max_hp: u64 },
}

/// Notifications that cannot be turned into a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    #[error("Notification is missing field `{0}`")]
    MissingField(&'static str),
}

// ============================================================================
// Contract
// ============================================================================

/// Delivery end handed to a backend when a listener is bound.
pub type NotificationSink = mpsc::UnboundedSender<RawNotification>;

/// The deployed arena contract.
///
/// A handle is bound to the operator's signing identity: `attack_boss` is
/// always sent on the operator's behalf.
#[async_trait]
pub trait CombatContract: Send + Sync {
    /// Read the boss's current public state.
    async fn read_boss(&self) -> Result<BossState, ContractError>;

    /// Broadcast an attack. Returns once the ledger has the transaction,
    /// not once it is mined.
    async fn attack_boss(&self) -> Result<Box<dyn PendingAttack>, ContractError>;

    /// Bind a listener for `AttackComplete` notifications.
    ///
    /// Every notification emitted after this call is sent to `sink` until
    /// [`unsubscribe`](Self::unsubscribe) is called with the returned id.
    fn subscribe(&self, sink: NotificationSink) -> Result<SubscriptionId, ContractError>;

    /// Unbind a listener. Must take effect before returning; unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Short human-readable label for logs (network, address).
    fn label(&self) -> &str;
}

/// A broadcast attack transaction.
#[async_trait]
pub trait PendingAttack: Send {
    fn transaction_id(&self) -> &TransactionId;

    /// Wait until the ledger mines the transaction.
    ///
    /// Fails with [`ContractError::ActionRejected`] when the transaction is
    /// mined but reverted.
    async fn wait(&mut self) -> Result<TransactionReceipt, ContractError>;
}

/// Supplies the live contract handle for the current session.
///
/// `None` means no wallet/session is available, which is a valid state.
pub trait ConnectionProvider: Send + Sync {
    fn live_handle(&self) -> Option<Arc<dyn CombatContract>>;
}

/// Resolves the operator's character before a battle is mounted.
#[async_trait]
pub trait CharacterReader: Send + Sync {
    async fn read_character(&self) -> Result<CharacterState, ContractError>;
}
