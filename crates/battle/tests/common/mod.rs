//! Scriptable in-memory arena contract for controller tests.
//!
//! Unlike the simulated ledger, nothing happens on its own: the test decides
//! when a read returns, when an attack is accepted or rejected, and which
//! notifications are emitted.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::{Notify, oneshot};

use client_blockchain_core::{
    BossState, CharacterState, CombatContract, ContractError, NotificationSink, PendingAttack,
    RawNotification, SubscriptionId, TransactionId, TransactionReceipt,
};

type Settlement = oneshot::Sender<Result<TransactionReceipt, ContractError>>;

struct Script {
    boss: Result<BossState, ContractError>,
    read_gated: bool,
    broadcast_error: Option<ContractError>,
    attack_calls: usize,
    pending: VecDeque<(TransactionId, Settlement)>,
    listeners: HashMap<SubscriptionId, NotificationSink>,
    next_subscription: u64,
    block_number: u64,
}

#[derive(Clone)]
pub struct ScriptedContract {
    script: Arc<Mutex<Script>>,
    read_gate: Arc<Notify>,
    label: &'static str,
}

impl ScriptedContract {
    pub fn new(boss: BossState) -> Self {
        Self::with_read(Ok(boss))
    }

    pub fn with_read(boss: Result<BossState, ContractError>) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                boss,
                read_gated: false,
                broadcast_error: None,
                attack_calls: 0,
                pending: VecDeque::new(),
                listeners: HashMap::new(),
                next_subscription: 0,
                block_number: 0,
            })),
            read_gate: Arc::new(Notify::new()),
            label: "scripted",
        }
    }

    pub fn labelled(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Hold every boss read until [`release_read`](Self::release_read).
    pub fn gate_reads(self) -> Self {
        self.script().read_gated = true;
        self
    }

    pub fn release_read(&self) {
        self.read_gate.notify_one();
    }

    /// Make the next `attack_boss` call fail before broadcast.
    pub fn fail_next_broadcast(&self, error: ContractError) {
        self.script().broadcast_error = Some(error);
    }

    pub fn attack_calls(&self) -> usize {
        self.script().attack_calls
    }

    pub fn listener_count(&self) -> usize {
        self.script().listeners.len()
    }

    /// Mine the oldest pending attack.
    pub fn accept_next(&self) {
        let mut script = self.script();
        script.block_number += 1;
        let block_number = script.block_number;
        let (transaction_id, settle) = script
            .pending
            .pop_front()
            .expect("no pending attack to accept");
        let _ = settle.send(Ok(TransactionReceipt {
            transaction_id,
            block_number,
        }));
    }

    /// Revert the oldest pending attack.
    pub fn reject_next(&self, reason: &str) {
        let (_, settle) = self
            .script()
            .pending
            .pop_front()
            .expect("no pending attack to reject");
        let _ = settle.send(Err(ContractError::ActionRejected(reason.to_string())));
    }

    /// Deliver a notification to every bound listener.
    pub fn emit(&self, notification: RawNotification) {
        for sink in self.script().listeners.values() {
            let _ = sink.send(notification.clone());
        }
    }

    pub fn emit_health(&self, boss_hp: u64, player_hp: u64) {
        self.emit(RawNotification {
            boss_hp: Some(boss_hp),
            player_hp: Some(player_hp),
            transaction_id: None,
        });
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().expect("script lock poisoned")
    }
}

#[async_trait]
impl CombatContract for ScriptedContract {
    async fn read_boss(&self) -> Result<BossState, ContractError> {
        let gated = self.script().read_gated;
        if gated {
            self.read_gate.notified().await;
        }
        self.script().boss.clone()
    }

    async fn attack_boss(&self) -> Result<Box<dyn PendingAttack>, ContractError> {
        let mut script = self.script();
        script.attack_calls += 1;
        if let Some(error) = script.broadcast_error.take() {
            return Err(error);
        }

        let transaction_id = TransactionId::from_bytes(vec![script.attack_calls as u8]);
        let (settle, outcome) = oneshot::channel();
        script.pending.push_back((transaction_id.clone(), settle));

        Ok(Box::new(ScriptedAttack {
            transaction_id,
            outcome: Some(outcome),
        }))
    }

    fn subscribe(&self, sink: NotificationSink) -> Result<SubscriptionId, ContractError> {
        let mut script = self.script();
        script.next_subscription += 1;
        let id = SubscriptionId(script.next_subscription);
        script.listeners.insert(id, sink);
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.script().listeners.remove(&id);
    }

    fn label(&self) -> &str {
        self.label
    }
}

struct ScriptedAttack {
    transaction_id: TransactionId,
    outcome: Option<oneshot::Receiver<Result<TransactionReceipt, ContractError>>>,
}

#[async_trait]
impl PendingAttack for ScriptedAttack {
    fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    async fn wait(&mut self) -> Result<TransactionReceipt, ContractError> {
        let outcome = self.outcome.take().expect("receipt awaited twice");
        outcome
            .await
            .unwrap_or_else(|_| Err(ContractError::Cancelled("script dropped".to_string())))
    }
}

/// Contract whose listener can never be bound.
pub struct DeafContract;

#[async_trait]
impl CombatContract for DeafContract {
    async fn read_boss(&self) -> Result<BossState, ContractError> {
        Ok(boss(250))
    }

    async fn attack_boss(&self) -> Result<Box<dyn PendingAttack>, ContractError> {
        Err(ContractError::Network("unreachable".to_string()))
    }

    fn subscribe(&self, _sink: NotificationSink) -> Result<SubscriptionId, ContractError> {
        Err(ContractError::Subscription("filter rejected".to_string()))
    }

    fn unsubscribe(&self, _id: SubscriptionId) {}

    fn label(&self) -> &str {
        "deaf"
    }
}

pub fn boss(hp: u64) -> BossState {
    BossState::new("Grave Colossus", "assets/bosses/grave-colossus.png", hp, 250, 20)
        .expect("valid boss")
}

pub fn character(hp: u64) -> CharacterState {
    CharacterState::new(0, "Rook", "assets/characters/rook.png", hp, 600, 20)
        .expect("valid character")
}

/// Let spawned tasks and the worker drain their queues without advancing time.
pub async fn settle() {
    for _ in 0..64 {
        tokio::task::yield_now().await;
    }
}
