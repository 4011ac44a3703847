//! Owner of the battle worker.
//!
//! [`BattleController`] spawns the worker, hands out [`BattleHandle`]s and
//! tears the worker down. The connection provider is consulted once, at
//! build time; later handle changes go through [`BattleHandle::rebind`].
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use client_blockchain_core::{CharacterState, ConnectionProvider};

use crate::config::BattleConfig;
use crate::error::{BattleError, Result};
use crate::handle::BattleHandle;
use crate::view::BattleView;
use crate::worker::{BattleWorker, Command};

/// Battle interaction controller.
pub struct BattleController {
    handle: BattleHandle,
    worker_handle: JoinHandle<()>,
}

impl BattleController {
    /// Create a new controller builder
    pub fn builder() -> BattleControllerBuilder {
        BattleControllerBuilder::new()
    }

    /// Get a cloneable handle to this controller
    pub fn handle(&self) -> BattleHandle {
        self.handle.clone()
    }

    /// Unbind the listener and stop the worker.
    ///
    /// Outcomes of remote calls still in flight are discarded.
    pub async fn shutdown(self) -> Result<()> {
        if self
            .handle
            .command_sender()
            .send(Command::Shutdown)
            .await
            .is_err()
        {
            debug!("Battle worker already stopped");
        }
        drop(self.handle);

        self.worker_handle.await.map_err(BattleError::WorkerJoin)
    }
}

/// Builder for [`BattleController`].
pub struct BattleControllerBuilder {
    config: BattleConfig,
    character: Option<CharacterState>,
    connection: Option<Arc<dyn ConnectionProvider>>,
}

impl BattleControllerBuilder {
    fn new() -> Self {
        Self {
            config: BattleConfig::default(),
            character: None,
            connection: None,
        }
    }

    /// Override controller configuration
    pub fn config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    /// The operator's character, resolved before the battle is mounted.
    pub fn character(mut self, character: CharacterState) -> Self {
        self.character = Some(character);
        self
    }

    /// Source of the live contract handle. Without one the controller is inert.
    pub fn connection(mut self, provider: impl ConnectionProvider + 'static) -> Self {
        self.connection = Some(Arc::new(provider));
        self
    }

    /// Spawn the worker.
    ///
    /// Binding to a live handle happens before this returns.
    pub async fn build(self) -> Result<BattleController> {
        let contract = self
            .connection
            .as_ref()
            .and_then(|provider| provider.live_handle());

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let (view_tx, view_rx) = watch::channel(BattleView::default());

        let worker = BattleWorker::new(self.config, command_rx, view_tx, self.character, contract);
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(BattleController {
            handle: BattleHandle::new(command_tx, view_rx),
            worker_handle,
        })
    }
}
