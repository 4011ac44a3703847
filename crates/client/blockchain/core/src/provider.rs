//! Fixed connection provider.

use std::sync::Arc;

use crate::traits::{CombatContract, ConnectionProvider};

/// Provider that hands out a handle resolved ahead of time.
///
/// The composition root connects to a backend once and injects the result;
/// `disconnected()` models a session with no wallet.
#[derive(Clone, Default)]
pub struct StaticConnection {
    contract: Option<Arc<dyn CombatContract>>,
}

impl StaticConnection {
    pub fn connected(contract: Arc<dyn CombatContract>) -> Self {
        Self {
            contract: Some(contract),
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }
}

impl ConnectionProvider for StaticConnection {
    fn live_handle(&self) -> Option<Arc<dyn CombatContract>> {
        self.contract.clone()
    }
}
