//! Battle worker that owns all controller state.
//!
//! Receives commands from [`BattleHandle`](crate::BattleHandle), runs remote
//! calls on spawned tasks that report back over an outcome channel, applies
//! notifications from the bound listener, and publishes a [`BattleView`]
//! after every change.

use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Sleep, sleep};
use tracing::{debug, error, info, warn};

use client_blockchain_core::{
    BossState, CharacterState, CombatContract, ContractError, NotificationPayload,
    RawNotification, TransactionReceipt,
};

use crate::config::BattleConfig;
use crate::error::BattleError;
use crate::phase::Lifecycle;
use crate::store::ActorStore;
use crate::subscription::SubscriptionManager;
use crate::view::BattleView;

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Submit an attack unless one is already in flight.
    Attack,
    /// Replace the live contract handle (`None` disconnects).
    Rebind {
        contract: Option<Arc<dyn CombatContract>>,
        reply: oneshot::Sender<()>,
    },
    /// Unbind and stop.
    Shutdown,
}

/// Completions of remote calls running off the worker task.
enum Outcome {
    BossLoaded {
        generation: u64,
        result: Result<BossState, ContractError>,
    },
    AttackSettled(Result<TransactionReceipt, ContractError>),
}

/// Background task that drives the attack lifecycle.
pub struct BattleWorker {
    config: BattleConfig,
    command_rx: mpsc::Receiver<Command>,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
    view_tx: watch::Sender<BattleView>,
    subscriptions: SubscriptionManager,
    store: ActorStore,
    lifecycle: Lifecycle,
    last_error: Option<String>,
    hit_timer: Option<Pin<Box<Sleep>>>,
}

impl BattleWorker {
    /// Creates the worker and binds to `contract` when one is live.
    ///
    /// Must be called from within a tokio runtime: the initial boss read is
    /// spawned immediately.
    pub fn new(
        config: BattleConfig,
        command_rx: mpsc::Receiver<Command>,
        view_tx: watch::Sender<BattleView>,
        character: Option<CharacterState>,
        contract: Option<Arc<dyn CombatContract>>,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let mut worker = Self {
            config,
            command_rx,
            outcome_tx,
            outcome_rx,
            view_tx,
            subscriptions: SubscriptionManager::new(),
            store: ActorStore::new(character),
            lifecycle: Lifecycle::new(),
            last_error: None,
            hit_timer: None,
        };
        worker.connect(contract);
        worker.publish();
        worker
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(outcome) = self.outcome_rx.recv() => {
                    self.handle_outcome(outcome);
                }
                Some(raw) = self.subscriptions.next_notification() => {
                    self.handle_notification(raw);
                }
                () = hit_elapsed(&mut self.hit_timer) => {
                    self.expire_hit();
                }
            }
        }

        self.teardown();
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Attack => self.handle_attack(),
            Command::Rebind { contract, reply } => {
                self.connect(contract);
                self.publish();
                if reply.send(()).is_err() {
                    debug!("Rebind reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown => {}
        }
    }

    /// Swap the live handle: unbind first, then read and bind the new one.
    fn connect(&mut self, contract: Option<Arc<dyn CombatContract>>) {
        let generation = self.subscriptions.release();
        self.store.forget_boss();

        let Some(contract) = contract else {
            info!(error = %BattleError::ConnectionUnavailable, "Controller is inert");
            return;
        };

        info!(contract = contract.label(), generation, "Connecting to arena contract");
        self.spawn_boss_read(Arc::clone(&contract), generation);

        if let Err(err) = self.subscriptions.bind(contract) {
            let err = BattleError::ListenerUnavailable(err);
            error!(error = %err, "Controller is inert");
            self.subscriptions.release();
            self.last_error = Some(err.to_string());
        }
    }

    fn spawn_boss_read(&self, contract: Arc<dyn CombatContract>, generation: u64) {
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = contract.read_boss().await;
            if outcome_tx
                .send(Outcome::BossLoaded { generation, result })
                .is_err()
            {
                debug!(generation, "Boss read finished after controller shutdown");
            }
        });
    }

    fn handle_attack(&mut self) {
        let Some(contract) = self.subscriptions.contract().cloned() else {
            warn!(error = %BattleError::ConnectionUnavailable, "Attack request ignored");
            return;
        };

        if !self.lifecycle.begin() {
            debug!("Attack already in flight; request ignored");
            return;
        }

        // A timer left over from the previous hit must not revert this submission.
        self.hit_timer = None;
        self.last_error = None;
        info!(contract = contract.label(), "Submitting attack");
        self.publish();

        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = submit_attack(contract.as_ref()).await;
            if outcome_tx.send(Outcome::AttackSettled(result)).is_err() {
                debug!("Attack settled after controller shutdown");
            }
        });
    }

    fn handle_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::BossLoaded { generation, result } => {
                if !self.subscriptions.is_current(generation) {
                    debug!(generation, "Discarding boss read from superseded binding");
                    return;
                }
                match result {
                    Ok(boss) => {
                        info!(boss = %boss.name, hp = boss.hp, max_hp = boss.max_hp, "Boss loaded");
                        self.store.load_boss(boss);
                    }
                    Err(err) => {
                        let err = BattleError::BossUnavailable(err);
                        error!(error = %err, "Initial boss read failed");
                        self.last_error = Some(err.to_string());
                    }
                }
            }
            Outcome::AttackSettled(Ok(receipt)) => {
                if self.lifecycle.confirm() {
                    info!(
                        tx = %receipt.transaction_id,
                        block = receipt.block_number,
                        "Attack confirmed"
                    );
                    self.hit_timer = Some(Box::pin(sleep(self.config.hit_display)));
                }
            }
            Outcome::AttackSettled(Err(err)) => {
                let err = BattleError::ActionRejected(err);
                error!(error = %err, "Attack failed");
                self.lifecycle.fail();
                self.hit_timer = None;
                self.last_error = Some(err.to_string());
            }
        }
        self.publish();
    }

    fn handle_notification(&mut self, raw: RawNotification) {
        match NotificationPayload::try_from(raw) {
            Ok(payload) => {
                debug!(
                    boss_hp = payload.boss_hp,
                    player_hp = payload.player_hp,
                    "AttackComplete received"
                );
                self.store.apply(&payload);
                self.publish();
            }
            Err(err) => {
                warn!(error = %BattleError::from(err), "Notification ignored");
            }
        }
    }

    fn expire_hit(&mut self) {
        self.hit_timer = None;
        if self.lifecycle.expire() {
            debug!("Hit display window elapsed");
            self.publish();
        }
    }

    fn teardown(&mut self) {
        self.subscriptions.release();
        self.store.forget_boss();
        self.hit_timer = None;
        self.publish();
        info!("Battle controller stopped");
    }

    fn publish(&self) {
        let view = BattleView {
            connected: self.subscriptions.is_bound(),
            boss: self.store.boss().cloned(),
            character: self.store.character().cloned(),
            phase: self.lifecycle.phase(),
            hit_visible: self.lifecycle.hit_visible(),
            last_error: self.last_error.clone(),
        };
        self.view_tx.send_if_modified(|current| {
            if *current == view {
                return false;
            }
            *current = view;
            true
        });
    }
}

async fn submit_attack(contract: &dyn CombatContract) -> Result<TransactionReceipt, ContractError> {
    let mut pending = contract.attack_boss().await?;
    debug!(tx = %pending.transaction_id(), "Attack broadcast; awaiting receipt");
    pending.wait().await
}

async fn hit_elapsed(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(timer) => timer.as_mut().await,
        None => std::future::pending().await,
    }
}
