//! In-memory arena ledger for development and tests.
//!
//! Mirrors the deployed contract's combat rule: an attack costs the boss the
//! attacker's damage and costs the attacker the boss's damage, both saturating
//! at zero, and is rejected once either side is out of HP.

use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::traits::{
    CharacterReader, CombatContract, ContractError, NotificationSink, PendingAttack,
};
use crate::types::{
    BossState, CharacterState, RawNotification, SubscriptionId, TransactionId, TransactionReceipt,
};

/// Initial ledger contents and timing.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub boss: BossState,
    pub character: CharacterState,
    /// Delay between broadcast and mining of an attack.
    pub mining_latency: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            boss: BossState {
                name: "Grave Colossus".to_string(),
                image_uri: "assets/bosses/grave-colossus.png".to_string(),
                hp: 10_000,
                max_hp: 10_000,
                attack_damage: 50,
            },
            character: CharacterState {
                index: 0,
                name: "Rook".to_string(),
                image_uri: "assets/characters/rook.png".to_string(),
                hp: 300,
                max_hp: 300,
                attack_damage: 25,
            },
            mining_latency: Duration::from_millis(1500),
        }
    }
}

impl SimConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_SIM_BOSS_HP` - Boss starting and maximum HP (default: 10000)
    /// - `ARENA_SIM_BOSS_DAMAGE` - Damage the boss deals back (default: 50)
    /// - `ARENA_SIM_PLAYER_HP` - Character starting and maximum HP (default: 300)
    /// - `ARENA_SIM_PLAYER_DAMAGE` - Character attack damage (default: 25)
    /// - `ARENA_SIM_LATENCY_MS` - Mining latency in milliseconds (default: 1500)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(hp) = read_env::<u64>("ARENA_SIM_BOSS_HP") {
            config.boss.max_hp = hp.max(1);
            config.boss.hp = config.boss.max_hp;
        }
        if let Some(damage) = read_env::<u64>("ARENA_SIM_BOSS_DAMAGE") {
            config.boss.attack_damage = damage;
        }
        if let Some(hp) = read_env::<u64>("ARENA_SIM_PLAYER_HP") {
            config.character.max_hp = hp.max(1);
            config.character.hp = config.character.max_hp;
        }
        if let Some(damage) = read_env::<u64>("ARENA_SIM_PLAYER_DAMAGE") {
            config.character.attack_damage = damage;
        }
        if let Some(latency) = read_env::<u64>("ARENA_SIM_LATENCY_MS") {
            config.mining_latency = Duration::from_millis(latency);
        }

        config
    }
}

struct Ledger {
    boss: BossState,
    character: CharacterState,
    listeners: HashMap<SubscriptionId, NotificationSink>,
    next_subscription: u64,
    next_transaction: u64,
    block_number: u64,
}

impl Ledger {
    fn check_attack(&self) -> Result<(), ContractError> {
        if self.character.is_defeated() {
            return Err(ContractError::ActionRejected(
                "character must have HP to attack the boss".to_string(),
            ));
        }
        if self.boss.is_defeated() {
            return Err(ContractError::ActionRejected(
                "boss must have HP to be attacked".to_string(),
            ));
        }
        Ok(())
    }

    fn mine_attack(&mut self, transaction_id: TransactionId) -> TransactionReceipt {
        self.boss.hp = self.boss.hp.saturating_sub(self.character.attack_damage);
        self.character.hp = self.character.hp.saturating_sub(self.boss.attack_damage);
        self.block_number += 1;

        info!(
            tx = %transaction_id,
            block = self.block_number,
            boss_hp = self.boss.hp,
            player_hp = self.character.hp,
            "Simulated attack mined"
        );

        let notification = RawNotification {
            boss_hp: Some(self.boss.hp),
            player_hp: Some(self.character.hp),
            transaction_id: Some(transaction_id.clone()),
        };
        for (id, sink) in &self.listeners {
            if sink.send(notification.clone()).is_err() {
                debug!(subscription = %id, "Listener receiver dropped before unsubscribe");
            }
        }

        TransactionReceipt {
            transaction_id,
            block_number: self.block_number,
        }
    }
}

/// Arena contract backed by process memory.
///
/// Clones share one ledger, so a test can keep a clone to inspect state while
/// the controller owns another.
#[derive(Clone)]
pub struct SimulatedArena {
    ledger: Arc<Mutex<Ledger>>,
    mining_latency: Duration,
}

impl SimulatedArena {
    pub fn new(config: SimConfig) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(Ledger {
                boss: config.boss,
                character: config.character,
                listeners: HashMap::new(),
                next_subscription: 0,
                next_transaction: 0,
                block_number: 0,
            })),
            mining_latency: config.mining_latency,
        }
    }

    /// Number of currently bound listeners.
    pub fn listener_count(&self) -> usize {
        lock(&self.ledger).listeners.len()
    }

    pub fn boss(&self) -> BossState {
        lock(&self.ledger).boss.clone()
    }

    pub fn character(&self) -> CharacterState {
        lock(&self.ledger).character.clone()
    }
}

impl Default for SimulatedArena {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

#[async_trait]
impl CombatContract for SimulatedArena {
    async fn read_boss(&self) -> Result<BossState, ContractError> {
        Ok(lock(&self.ledger).boss.clone())
    }

    async fn attack_boss(&self) -> Result<Box<dyn PendingAttack>, ContractError> {
        let transaction_id = {
            let mut ledger = lock(&self.ledger);
            ledger.check_attack()?;
            ledger.next_transaction += 1;
            TransactionId::from_bytes(ledger.next_transaction.to_be_bytes().to_vec())
        };

        let (done_tx, done_rx) = oneshot::channel();
        let ledger = Arc::clone(&self.ledger);
        let latency = self.mining_latency;
        let mined_id = transaction_id.clone();

        // Mining proceeds whether or not anyone waits on the pending handle.
        tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            let outcome = {
                let mut ledger = lock(&ledger);
                ledger
                    .check_attack()
                    .map(|()| ledger.mine_attack(mined_id))
            };
            let _ = done_tx.send(outcome);
        });

        debug!(tx = %transaction_id, "Simulated attack broadcast");

        Ok(Box::new(SimPendingAttack {
            transaction_id,
            outcome: Some(done_rx),
        }))
    }

    fn subscribe(&self, sink: NotificationSink) -> Result<SubscriptionId, ContractError> {
        let mut ledger = lock(&self.ledger);
        ledger.next_subscription += 1;
        let id = SubscriptionId(ledger.next_subscription);
        ledger.listeners.insert(id, sink);
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        lock(&self.ledger).listeners.remove(&id);
    }

    fn label(&self) -> &str {
        "simulated"
    }
}

#[async_trait]
impl CharacterReader for SimulatedArena {
    async fn read_character(&self) -> Result<CharacterState, ContractError> {
        Ok(lock(&self.ledger).character.clone())
    }
}

struct SimPendingAttack {
    transaction_id: TransactionId,
    outcome: Option<oneshot::Receiver<Result<TransactionReceipt, ContractError>>>,
}

#[async_trait]
impl PendingAttack for SimPendingAttack {
    fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    async fn wait(&mut self) -> Result<TransactionReceipt, ContractError> {
        let outcome = self
            .outcome
            .take()
            .ok_or_else(|| ContractError::Cancelled("receipt already awaited".to_string()))?;

        outcome
            .await
            .unwrap_or_else(|_| Err(ContractError::Cancelled("simulated ledger stopped".to_string())))
    }
}

fn lock(ledger: &Mutex<Ledger>) -> MutexGuard<'_, Ledger> {
    ledger.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn arena(boss_hp: u64, player_hp: u64) -> SimulatedArena {
        let mut config = SimConfig::default();
        config.boss.hp = boss_hp;
        config.character.hp = player_hp;
        SimulatedArena::new(config)
    }

    #[tokio::test(start_paused = true)]
    async fn attack_applies_combat_rule_and_notifies() {
        let arena = arena(10_000, 300);
        let (tx, mut rx) = mpsc::unbounded_channel();
        arena.subscribe(tx).unwrap();

        let mut pending = arena.attack_boss().await.unwrap();
        let receipt = pending.wait().await.unwrap();
        assert_eq!(receipt.block_number, 1);
        assert_eq!(&receipt.transaction_id, pending.transaction_id());

        let notification = rx.recv().await.unwrap();
        assert_eq!(notification.boss_hp, Some(9_975));
        assert_eq!(notification.player_hp, Some(250));
        assert_eq!(arena.boss().hp, 9_975);
        assert_eq!(arena.character().hp, 250);
    }

    #[tokio::test(start_paused = true)]
    async fn damage_saturates_at_zero() {
        let arena = arena(10, 30);
        let mut pending = arena.attack_boss().await.unwrap();
        pending.wait().await.unwrap();

        assert_eq!(arena.boss().hp, 0);
        assert_eq!(arena.character().hp, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rejects_attack_on_defeated_boss() {
        let arena = arena(0, 300);
        let err = arena.attack_boss().await.err().unwrap();
        assert!(matches!(err, ContractError::ActionRejected(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn rejects_attack_when_character_is_down() {
        let arena = arena(10_000, 0);
        let err = arena.attack_boss().await.err().unwrap();
        assert!(matches!(err, ContractError::ActionRejected(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn unsubscribed_listener_receives_nothing() {
        let arena = SimulatedArena::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = arena.subscribe(tx).unwrap();
        assert_eq!(arena.listener_count(), 1);

        arena.unsubscribe(id);
        assert_eq!(arena.listener_count(), 0);

        let mut pending = arena.attack_boss().await.unwrap();
        pending.wait().await.unwrap();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn mining_does_not_depend_on_waiting() {
        let arena = SimulatedArena::default();
        let pending = arena.attack_boss().await.unwrap();
        drop(pending);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(arena.boss().hp, 9_975);
    }
}
