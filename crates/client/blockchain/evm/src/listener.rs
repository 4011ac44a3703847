//! `AttackComplete` log polling.
//!
//! One task per subscription walks the chain with a block cursor and forwards
//! every non-removed log to the subscriber's sink. The cursor starts at the
//! block after the head known when the subscription was made.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use client_blockchain_core::{NotificationSink, SubscriptionId, TransactionId};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

use crate::abi::{ATTACK_COMPLETE_TOPIC, decode_attack_complete, decode_hex};
use crate::rpc::{LogJson, RpcClient};

pub(crate) struct LogPoller {
    pub rpc: Arc<RpcClient>,
    pub address: String,
    pub poll_interval: Duration,
    /// First block whose logs are delivered.
    pub from_block: u64,
    /// Shared head watermark, advanced on every successful head read.
    pub head: Arc<AtomicU64>,
    pub subscription: SubscriptionId,
    pub sink: NotificationSink,
}

impl LogPoller {
    /// Poll until the sink's receiver is dropped or the task is aborted.
    pub async fn run(self) {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut next_block = self.from_block;
        debug!(subscription = %self.subscription, from_block = next_block, "Log poller started");

        loop {
            ticker.tick().await;

            let latest = match self.rpc.block_number().await {
                Ok(latest) => latest,
                Err(err) => {
                    warn!(subscription = %self.subscription, error = %err, "Could not read head block");
                    continue;
                }
            };
            self.head.fetch_max(latest, Ordering::Relaxed);
            if latest < next_block {
                continue;
            }

            let logs = match self
                .rpc
                .logs(&self.address, ATTACK_COMPLETE_TOPIC, next_block, latest)
                .await
            {
                Ok(logs) => logs,
                Err(err) => {
                    warn!(subscription = %self.subscription, error = %err, "eth_getLogs failed; retrying");
                    continue;
                }
            };

            for log in logs.iter().filter(|log| !log.removed) {
                if self.sink.send(to_notification(log)).is_err() {
                    debug!(subscription = %self.subscription, "Subscriber gone; stopping log poller");
                    return;
                }
            }
            next_block = latest + 1;
        }
    }
}

fn to_notification(log: &LogJson) -> client_blockchain_core::RawNotification {
    // Undecodable data yields an empty notification, which the consumer
    // rejects as malformed.
    let data = decode_hex(&log.data).unwrap_or_default();
    let mut notification = decode_attack_complete(&data);
    notification.transaction_id = log
        .transaction_hash
        .as_deref()
        .and_then(|hash| decode_hex(hash).ok())
        .map(TransactionId::from_bytes);
    notification
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use serde_json::{Value, json};
    use tokio::sync::mpsc;

    use super::*;
    use crate::mock_node::{MockNode, Reply};

    fn poller(node: &MockNode, from_block: u64, sink: NotificationSink) -> LogPoller {
        LogPoller {
            rpc: Arc::new(RpcClient::new(node.url(), Duration::from_secs(5)).unwrap()),
            address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            poll_interval: Duration::from_millis(10),
            from_block,
            head: Arc::new(AtomicU64::new(from_block - 1)),
            subscription: SubscriptionId(7),
            sink,
        }
    }

    fn attack_log(boss_hp: u64, player_hp: u64, removed: bool) -> Value {
        json!({
            "data": format!("0x{boss_hp:064x}{player_hp:064x}"),
            "transactionHash": "0xabcd",
            "blockNumber": "0x14",
            "removed": removed,
        })
    }

    /// Serves head `0x14` and, on the first `eth_getLogs`, one removed and one
    /// live log. Later log queries are empty.
    fn chain_with_reorged_log(
        head_failures: usize,
    ) -> impl Fn(&str, &Value) -> Reply + Send + Sync + 'static {
        let heads = AtomicUsize::new(0);
        let queries = AtomicUsize::new(0);
        move |method, _| match method {
            "eth_blockNumber" if heads.fetch_add(1, Ordering::SeqCst) < head_failures => Err(502),
            "eth_blockNumber" => Ok(json!("0x14")),
            "eth_getLogs" if queries.fetch_add(1, Ordering::SeqCst) == 0 => {
                Ok(json!([attack_log(999, 999, true), attack_log(230, 580, false)]))
            }
            "eth_getLogs" => Ok(json!([])),
            _ => Err(404),
        }
    }

    #[tokio::test]
    async fn delivers_live_logs_from_the_subscription_block() {
        let node = MockNode::start(chain_with_reorged_log(0)).await;
        let (sink, mut rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(poller(&node, 0x11, sink).run());

        let notification = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        task.abort();

        assert_eq!(notification.boss_hp, Some(230));
        assert_eq!(notification.player_hp, Some(580));
        assert!(rx.try_recv().is_err());

        let filter = &node.params("eth_getLogs")[0][0];
        assert_eq!(filter["fromBlock"], "0x11");
        assert_eq!(filter["toBlock"], "0x14");
    }

    #[tokio::test]
    async fn head_failures_do_not_move_the_cursor() {
        let node = MockNode::start(chain_with_reorged_log(2)).await;
        let (sink, mut rx) = mpsc::unbounded_channel();
        let head = {
            let poller = poller(&node, 0x11, sink);
            let head = Arc::clone(&poller.head);
            tokio::spawn(poller.run());
            head
        };

        let notification = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(notification.boss_hp, Some(230));
        assert!(node.count("eth_blockNumber") >= 3);
        assert_eq!(node.params("eth_getLogs")[0][0]["fromBlock"], "0x11");
        assert_eq!(head.load(Ordering::Relaxed), 0x14);
    }

    #[tokio::test]
    async fn stops_when_the_subscriber_is_gone() {
        let node = MockNode::start(chain_with_reorged_log(0)).await;
        let (sink, rx) = mpsc::unbounded_channel();
        drop(rx);

        tokio::time::timeout(Duration::from_secs(2), poller(&node, 0x11, sink).run())
            .await
            .unwrap();
    }

    fn log_entry(data: &str) -> LogJson {
        LogJson {
            data: data.to_string(),
            transaction_hash: Some("0xabcd".to_string()),
            block_number: Some("0x5".to_string()),
            removed: false,
        }
    }

    #[test]
    fn converts_log_to_notification() {
        let data = format!("0x{:064x}{:064x}", 230, 580);
        let notification = to_notification(&log_entry(&data));
        assert_eq!(notification.boss_hp, Some(230));
        assert_eq!(notification.player_hp, Some(580));
        assert_eq!(
            notification.transaction_id,
            Some(TransactionId::from_bytes(vec![0xab, 0xcd]))
        );
    }

    #[test]
    fn garbage_log_data_produces_empty_fields() {
        let notification = to_notification(&log_entry("0xnot-hex"));
        assert_eq!(notification.boss_hp, None);
        assert_eq!(notification.player_hp, None);
    }
}
