//! Notification listener ownership.
//!
//! A bound listener is represented by a [`ListenerGuard`]; dropping the guard
//! unbinds it from the contract before `drop` returns. [`SubscriptionManager`]
//! holds at most one guard and always drops the previous one before
//! subscribing again, so a contract never sees two listeners from the same
//! controller. There is no runtime path for a leaked listener: the only way
//! to hold a binding is through the guard.
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use client_blockchain_core::{CombatContract, ContractError, RawNotification, SubscriptionId};

/// Ownership token for one bound `AttackComplete` listener.
pub struct ListenerGuard {
    contract: Arc<dyn CombatContract>,
    id: SubscriptionId,
}

impl ListenerGuard {
    /// Subscribe `sink` on `contract`.
    pub fn bind(
        contract: Arc<dyn CombatContract>,
        sink: mpsc::UnboundedSender<RawNotification>,
    ) -> Result<Self, ContractError> {
        let id = contract.subscribe(sink)?;
        info!(subscription = %id, contract = contract.label(), "Attack listener bound");
        Ok(Self { contract, id })
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn contract(&self) -> &Arc<dyn CombatContract> {
        &self.contract
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.contract.unsubscribe(self.id);
        info!(subscription = %self.id, contract = self.contract.label(), "Attack listener unbound");
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("contract", &self.contract.label())
            .field("id", &self.id)
            .finish()
    }
}

struct Binding {
    guard: ListenerGuard,
    notifications: mpsc::UnboundedReceiver<RawNotification>,
    open: bool,
}

/// Keeps exactly one listener bound to the live contract handle.
///
/// Every [`release`](Self::release) starts a new generation. Work issued
/// against an older generation (such as an initial boss read) is stale once
/// the generation moves on.
#[derive(Default)]
pub struct SubscriptionManager {
    binding: Option<Binding>,
    generation: u64,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Contract the current listener is bound to.
    pub fn contract(&self) -> Option<&Arc<dyn CombatContract>> {
        self.binding.as_ref().map(|binding| binding.guard.contract())
    }

    /// Unbind the current listener, if any, and start a new generation.
    pub fn release(&mut self) -> u64 {
        if let Some(binding) = self.binding.take() {
            drop(binding.guard);
        }
        self.generation += 1;
        self.generation
    }

    /// Bind a listener on `contract`, unbinding any previous one first.
    pub fn bind(&mut self, contract: Arc<dyn CombatContract>) -> Result<(), ContractError> {
        if self.binding.is_some() {
            self.release();
        }

        let (sink, notifications) = mpsc::unbounded_channel();
        let guard = ListenerGuard::bind(contract, sink)?;
        self.binding = Some(Binding {
            guard,
            notifications,
            open: true,
        });
        Ok(())
    }

    /// Wait for the next notification on the current binding.
    ///
    /// Never resolves while nothing is bound. Returns `None` once when the
    /// backend drops its sink; the binding then stays silent until replaced.
    /// Cancel safe.
    pub async fn next_notification(&mut self) -> Option<RawNotification> {
        let Some(binding) = self.binding.as_mut().filter(|binding| binding.open) else {
            return std::future::pending().await;
        };

        let notification = binding.notifications.recv().await;
        if notification.is_none() {
            debug!(subscription = %binding.guard.id(), "Notification sink closed by backend");
            binding.open = false;
        }
        notification
    }
}
