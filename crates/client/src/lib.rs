//! Top-level client orchestrating the battle controller and a frontend.
//!
//! # Architecture
//!
//! ```text
//! Client (Top-level container)
//!   ├─→ BattleController (attack lifecycle, reconciliation, listener)
//!   │     └─→ ConnectionProvider → CombatContract (sim or EVM backend)
//!   └─→ Frontend (UI layer, talks to the controller via BattleHandle only)
//! ```

pub mod backend;
mod builder;

pub use backend::{Backend, Session};
pub use builder::ClientBuilder;

// Re-export Frontend trait from client-frontend-core
pub use client_frontend_core::Frontend;

use anyhow::{Context, Result};
use battle::BattleController;

/// Top-level client container.
///
/// # Lifecycle
///
/// 1. `Client::builder()` receives an already-built controller and a frontend
/// 2. `Client::run()` transfers control to the frontend until the operator quits
/// 3. The controller is shut down afterwards, which unbinds the listener
pub struct Client {
    controller: BattleController,
    frontend: Box<dyn Frontend>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Run the frontend, then shut the controller down.
    ///
    /// A frontend error takes precedence over a shutdown error.
    pub async fn run(self) -> Result<()> {
        let Client {
            controller,
            mut frontend,
        } = self;

        let frontend_result = frontend.run(controller.handle()).await;

        let shutdown_result = controller
            .shutdown()
            .await
            .context("Battle controller did not shut down cleanly");

        frontend_result?;
        shutdown_result
    }
}

#[cfg(all(test, feature = "sim"))]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use battle::{ActionPhase, BattleHandle};
    use client_blockchain_core::{SimConfig, SimulatedArena, StaticConnection};

    use super::*;

    /// Attacks once and waits for the ledger to report the hit.
    struct OneShotFrontend;

    #[async_trait]
    impl Frontend for OneShotFrontend {
        async fn run(&mut self, handle: BattleHandle) -> Result<()> {
            let mut views = handle.watch();
            views.wait_for(|view| view.boss.is_some()).await?;

            handle.request_attack()?;
            views
                .wait_for(|view| view.phase == ActionPhase::Confirmed)
                .await?;
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runs_frontend_then_unbinds_listener() {
        let arena = Arc::new(SimulatedArena::new(SimConfig {
            mining_latency: Duration::from_millis(200),
            ..SimConfig::default()
        }));
        let character = arena.character();

        let controller = BattleController::builder()
            .character(character)
            .connection(StaticConnection::connected(arena.clone()))
            .build()
            .await
            .unwrap();
        assert_eq!(arena.listener_count(), 1);

        let client = Client::builder()
            .controller(controller)
            .frontend(OneShotFrontend)
            .build()
            .unwrap();
        client.run().await.unwrap();

        assert_eq!(arena.listener_count(), 0);
        assert!(arena.boss().hp < arena.boss().max_hp);
    }

    #[test]
    fn builder_requires_controller() {
        let result = Client::builder().frontend(OneShotFrontend).build();
        assert!(result.is_err());
    }
}
