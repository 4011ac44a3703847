//! Error types surfaced by the battle controller.
//!
//! Remote failures never escape the worker; they are folded into
//! [`BattleError`] so the view can carry a readable notice.
use thiserror::Error;

use client_blockchain_core::{ContractError, NotificationError};

pub type Result<T> = std::result::Result<T, BattleError>;

#[derive(Debug, Error)]
pub enum BattleError {
    /// No live contract handle; the controller stays inert.
    #[error("no connection to the arena contract")]
    ConnectionUnavailable,

    /// The attack transaction failed or was reverted.
    #[error("attack failed: {0}")]
    ActionRejected(#[source] ContractError),

    #[error("could not read the boss: {0}")]
    BossUnavailable(#[source] ContractError),

    #[error("could not bind the attack listener: {0}")]
    ListenerUnavailable(#[source] ContractError),

    #[error("discarded malformed notification: {0}")]
    NotificationMalformed(#[from] NotificationError),

    #[error("battle controller has shut down")]
    ControllerClosed,

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
