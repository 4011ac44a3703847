//! Blockchain abstraction layer for the boss arena.
//!
//! This crate describes the deployed arena contract from the client's point of
//! view, independent of the chain that hosts it.
//!
//! # Architecture
//!
//! ```text
//! ConnectionProvider ──→ Arc<dyn CombatContract>
//!                          ├── read_boss()        (view call)
//!                          ├── attack_boss()      (transaction → PendingAttack)
//!                          └── subscribe()/unsubscribe()
//!                                 └── RawNotification per mined attack
//!
//! CharacterReader ──→ the operator's character (bootstrap only)
//! ```
//!
//! # Design Philosophy
//!
//! - Reads, writes and notifications are separate channels: a write never
//!   returns the post-attack state, it only reports acceptance.
//! - Notifications arrive raw and are validated by the consumer
//!   ([`NotificationPayload::try_from`]).
//! - Backends (simulated, EVM) live behind the same traits so the battle
//!   controller never knows which one it talks to.

pub mod provider;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use provider::StaticConnection;
pub use traits::{
    CharacterReader, CombatContract, ConnectionProvider, ContractError, NotificationError,
    NotificationSink, PendingAttack, StateError,
};
pub use types::{
    BossState, CharacterState, NotificationPayload, RawNotification, SubscriptionId,
    TransactionId, TransactionReceipt,
};

#[cfg(any(test, feature = "sim"))]
pub use sim::{SimConfig, SimulatedArena};
