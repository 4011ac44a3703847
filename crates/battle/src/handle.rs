//! Cloneable façade for issuing commands to the battle controller.
//!
//! [`BattleHandle`] hides channel plumbing: attack requests are fire-and-forget
//! and the current [`BattleView`] is always readable without waiting on the
//! worker.
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

use client_blockchain_core::CombatContract;

use crate::error::{BattleError, Result};
use crate::view::BattleView;
use crate::worker::Command;

/// Presentation-facing handle to the battle controller
#[derive(Clone)]
pub struct BattleHandle {
    command_tx: mpsc::Sender<Command>,
    view_rx: watch::Receiver<BattleView>,
}

impl BattleHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, view_rx: watch::Receiver<BattleView>) -> Self {
        Self {
            command_tx,
            view_rx,
        }
    }

    /// Ask the controller to attack the boss.
    ///
    /// Never blocks. Requests made while an attack is in flight, or with no
    /// live contract handle, are ignored by the controller. A full command
    /// queue also drops the request: the worker is busy and the operator can
    /// press again.
    pub fn request_attack(&self) -> Result<()> {
        match self.command_tx.try_send(Command::Attack) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!("Command queue full; attack request dropped");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(BattleError::ControllerClosed),
        }
    }

    /// Replace the live contract handle.
    ///
    /// Resolves once the previous listener is unbound and the new one bound.
    pub async fn rebind(&self, contract: Arc<dyn CombatContract>) -> Result<()> {
        self.send_rebind(Some(contract)).await
    }

    /// Drop the live contract handle; the controller becomes inert.
    pub async fn disconnect(&self) -> Result<()> {
        self.send_rebind(None).await
    }

    async fn send_rebind(&self, contract: Option<Arc<dyn CombatContract>>) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Rebind {
                contract,
                reply: reply_tx,
            })
            .await
            .map_err(|_| BattleError::ControllerClosed)?;

        reply_rx.await.map_err(|_| BattleError::ControllerClosed)
    }

    /// Latest published snapshot.
    pub fn view(&self) -> BattleView {
        self.view_rx.borrow().clone()
    }

    /// Receiver that is notified on every snapshot change.
    pub fn watch(&self) -> watch::Receiver<BattleView> {
        self.view_rx.clone()
    }

    pub(crate) fn command_sender(&self) -> &mpsc::Sender<Command> {
        &self.command_tx
    }
}
