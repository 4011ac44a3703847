//! Battle interaction controller for the boss arena.
//!
//! The controller submits attacks against the arena contract, tracks each one
//! through ledger confirmation, and reconciles `AttackComplete` notifications
//! into locally cached boss and character state. Consumers embed
//! [`BattleController`] and talk to it through a cloneable [`BattleHandle`].
//!
//! Modules are organized by responsibility:
//! - [`controller`] hosts the owner type and its builder
//! - [`handle`] is the presentation-facing façade (attack requests, snapshots)
//! - [`phase`] is the attack lifecycle state machine
//! - [`store`] owns the two actor records and the reconciliation function
//! - [`subscription`] binds exactly one notification listener per live handle
//! - [`view`] is the read-only snapshot published to presentation
//!
//! All controller state lives on a single worker task; nothing is shared
//! behind locks.
pub mod config;
pub mod controller;
pub mod error;
pub mod handle;
pub mod phase;
pub mod store;
pub mod subscription;
pub mod view;

mod worker;

pub use config::BattleConfig;
pub use controller::{BattleController, BattleControllerBuilder};
pub use error::{BattleError, Result};
pub use handle::BattleHandle;
pub use phase::{ActionPhase, Lifecycle};
pub use store::{ActorStore, reconcile};
pub use subscription::{ListenerGuard, SubscriptionManager};
pub use view::BattleView;
