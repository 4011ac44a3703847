//! Arena contract over Ethereum JSON-RPC.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use client_blockchain_core::{
    BossState, CharacterReader, CharacterState, CombatContract, ContractError, NotificationSink,
    PendingAttack, SubscriptionId, TransactionId, TransactionReceipt,
};

use crate::abi::{
    ATTACK_BOSS, CHECK_IF_USER_HAS_NFT, GET_BIG_BOSS, calldata, decode_boss, decode_character,
    decode_hex,
};
use crate::config::EvmConfig;
use crate::error::{EvmError, Result};
use crate::listener::LogPoller;
use crate::rpc::{ReceiptJson, RpcClient, parse_quantity};

/// Deployed arena contract reached through a node that manages the
/// operator's key (`eth_sendTransaction`).
pub struct EvmArena {
    rpc: Arc<RpcClient>,
    address: String,
    account: String,
    label: String,
    poll_interval: Duration,
    receipt_timeout: Duration,
    /// Highest block seen by `connect` or any log poller.
    head: Arc<AtomicU64>,
    pollers: Mutex<HashMap<SubscriptionId, JoinHandle<()>>>,
    next_subscription: AtomicU64,
}

impl EvmArena {
    /// Connect to the node and resolve the sending account.
    pub async fn connect(config: EvmConfig) -> Result<Self> {
        config.validate()?;

        let rpc = Arc::new(RpcClient::new(&config.rpc_url, config.request_timeout)?);
        let chain_id = rpc.chain_id().await?;

        let account = match config.account {
            Some(account) => account,
            None => rpc
                .accounts()
                .await?
                .into_iter()
                .next()
                .ok_or(EvmError::NoAccount)?,
        };

        let head = rpc.block_number().await?;

        let label = format!("evm:{}/{}", chain_id, config.contract_address);
        info!(
            rpc = rpc.url(),
            chain_id,
            head,
            contract = %config.contract_address,
            account = %account,
            "Connected to arena contract"
        );

        Ok(Self {
            rpc,
            address: config.contract_address,
            account,
            label,
            poll_interval: config.poll_interval,
            receipt_timeout: config.receipt_timeout,
            head: Arc::new(AtomicU64::new(head)),
            pollers: Mutex::new(HashMap::new()),
            next_subscription: AtomicU64::new(1),
        })
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    async fn view_call(&self, selector: [u8; 4]) -> Result<Vec<u8>> {
        let output = self
            .rpc
            .eth_call(&self.account, &self.address, &calldata(selector))
            .await?;
        Ok(decode_hex(&output)?)
    }

    fn pollers(&self) -> MutexGuard<'_, HashMap<SubscriptionId, JoinHandle<()>>> {
        self.pollers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for EvmArena {
    fn drop(&mut self) {
        for (_, poller) in self.pollers().drain() {
            poller.abort();
        }
    }
}

#[async_trait]
impl CombatContract for EvmArena {
    async fn read_boss(&self) -> std::result::Result<BossState, ContractError> {
        let data = self.view_call(GET_BIG_BOSS).await?;
        Ok(decode_boss(&data)?)
    }

    async fn attack_boss(&self) -> std::result::Result<Box<dyn PendingAttack>, ContractError> {
        let hash = self
            .rpc
            .send_transaction(&self.account, &self.address, &calldata(ATTACK_BOSS))
            .await
            .map_err(EvmError::from)?;

        let transaction_id = TransactionId::from_bytes(decode_hex(&hash)?);
        debug!(tx = %hash, "attackBoss transaction broadcast");

        Ok(Box::new(PendingEvmAttack {
            rpc: Arc::clone(&self.rpc),
            hash,
            transaction_id,
            poll_interval: self.poll_interval,
            timeout: self.receipt_timeout,
        }))
    }

    fn subscribe(&self, sink: NotificationSink) -> std::result::Result<SubscriptionId, ContractError> {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        // The cursor is fixed here so events mined before the poller's first
        // successful head read are still delivered.
        let poller = LogPoller {
            rpc: Arc::clone(&self.rpc),
            address: self.address.clone(),
            poll_interval: self.poll_interval,
            from_block: self.head.load(Ordering::Relaxed) + 1,
            head: Arc::clone(&self.head),
            subscription: id,
            sink,
        };

        let handle = tokio::runtime::Handle::try_current()
            .map_err(|err| ContractError::Subscription(err.to_string()))?
            .spawn(poller.run());
        self.pollers().insert(id, handle);
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if let Some(poller) = self.pollers().remove(&id) {
            poller.abort();
        }
    }

    fn label(&self) -> &str {
        &self.label
    }
}

#[async_trait]
impl CharacterReader for EvmArena {
    async fn read_character(&self) -> std::result::Result<CharacterState, ContractError> {
        let data = self.view_call(CHECK_IF_USER_HAS_NFT).await?;
        decode_character(&data)?.ok_or(ContractError::CharacterNotFound)
    }
}

struct PendingEvmAttack {
    rpc: Arc<RpcClient>,
    hash: String,
    transaction_id: TransactionId,
    poll_interval: Duration,
    timeout: Duration,
}

impl PendingEvmAttack {
    /// Poll until the receipt is mined. Node outages are retried; the
    /// caller's timeout is the only limit.
    async fn poll_receipt(&self) -> std::result::Result<TransactionReceipt, ContractError> {
        loop {
            match self.rpc.transaction_receipt(&self.hash).await {
                Ok(Some(receipt)) => return self.settle(receipt),
                Ok(None) => {}
                Err(err) if err.is_transient() => {
                    warn!(tx = %self.hash, error = %err, "Receipt poll failed; retrying");
                }
                Err(err) => return Err(err.into()),
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn settle(&self, receipt: ReceiptJson) -> std::result::Result<TransactionReceipt, ContractError> {
        if receipt.status.as_deref() == Some("0x0") {
            return Err(ContractError::ActionRejected(format!(
                "transaction {} reverted",
                receipt.transaction_hash
            )));
        }

        let block_number = receipt
            .block_number
            .as_deref()
            .map(parse_quantity)
            .transpose()?
            .unwrap_or_default();
        Ok(TransactionReceipt {
            transaction_id: self.transaction_id.clone(),
            block_number,
        })
    }
}

#[async_trait]
impl PendingAttack for PendingEvmAttack {
    fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    async fn wait(&mut self) -> std::result::Result<TransactionReceipt, ContractError> {
        tokio::time::timeout(self.timeout, self.poll_receipt())
            .await
            .map_err(|_| ContractError::Timeout(format!("receipt of {}", self.hash)))?
    }
}
