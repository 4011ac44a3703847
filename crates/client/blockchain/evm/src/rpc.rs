//! Minimal Ethereum JSON-RPC client over HTTP.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::RpcError;

/// JSON-RPC 2.0 client bound to one node endpoint.
pub struct RpcClient {
    http: Client,
    url: String,
    next_id: AtomicU64,
}

#[derive(Serialize)]
struct Request<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ErrorObject>,
}

#[derive(Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
}

/// Subset of `eth_getTransactionReceipt` the client needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptJson {
    pub transaction_hash: String,
    pub block_number: Option<String>,
    /// `0x1` success, `0x0` reverted. Absent on pre-Byzantium chains.
    pub status: Option<String>,
}

/// Subset of an `eth_getLogs` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogJson {
    pub data: String,
    pub transaction_hash: Option<String>,
    pub block_number: Option<String>,
    #[serde(default)]
    pub removed: bool,
}

impl RpcClient {
    /// Build the HTTP client. Fails when the TLS backend cannot initialize.
    pub fn new(url: impl Into<String>, request_timeout: Duration) -> Result<Self, RpcError> {
        let url = url.into();
        let mut builder = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(10));
        // A local dev node is never behind the system proxy.
        if is_loopback(&url) {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            url,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one JSON-RPC call and decode its `result`.
    ///
    /// A `null` result decodes into `T` as well, so `Option<_>` works for
    /// lookups that may miss (receipts of pending transactions).
    pub async fn call<P, T>(&self, method: &str, params: P) -> Result<T, RpcError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        tracing::trace!(id, method, "JSON-RPC request");

        let response = self.http.post(&self.url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Status(status));
        }

        let body: Response = response.json().await?;
        if let Some(error) = body.error {
            return Err(RpcError::Remote {
                code: error.code,
                message: error.message,
            });
        }

        Ok(serde_json::from_value(body.result.unwrap_or(Value::Null))?)
    }

    pub async fn accounts(&self) -> Result<Vec<String>, RpcError> {
        self.call("eth_accounts", json!([])).await
    }

    pub async fn chain_id(&self) -> Result<u64, RpcError> {
        let hex: String = self.call("eth_chainId", json!([])).await?;
        parse_quantity(&hex)
    }

    pub async fn block_number(&self) -> Result<u64, RpcError> {
        let hex: String = self.call("eth_blockNumber", json!([])).await?;
        parse_quantity(&hex)
    }

    /// Read-only contract call at the latest block.
    pub async fn eth_call(&self, from: &str, to: &str, data: &str) -> Result<String, RpcError> {
        self.call(
            "eth_call",
            json!([{ "from": from, "to": to, "data": data }, "latest"]),
        )
        .await
    }

    /// Broadcast a transaction signed by the node-managed `from` account.
    pub async fn send_transaction(
        &self,
        from: &str,
        to: &str,
        data: &str,
    ) -> Result<String, RpcError> {
        self.call(
            "eth_sendTransaction",
            json!([{ "from": from, "to": to, "data": data }]),
        )
        .await
    }

    pub async fn transaction_receipt(&self, hash: &str) -> Result<Option<ReceiptJson>, RpcError> {
        self.call("eth_getTransactionReceipt", json!([hash])).await
    }

    pub async fn logs(
        &self,
        address: &str,
        topic: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<LogJson>, RpcError> {
        self.call(
            "eth_getLogs",
            json!([{
                "address": address,
                "topics": [topic],
                "fromBlock": format_quantity(from_block),
                "toBlock": format_quantity(to_block),
            }]),
        )
        .await
    }
}

fn is_loopback(url: &str) -> bool {
    let authority = url
        .split_once("://")
        .map_or(url, |(_, rest)| rest)
        .split('/')
        .next()
        .unwrap_or_default();
    let host = match authority.strip_prefix('[') {
        Some(v6) => v6.split(']').next().unwrap_or_default(),
        None => authority.split(':').next().unwrap_or_default(),
    };
    matches!(host, "localhost" | "127.0.0.1" | "::1")
}

/// Parse a `0x`-prefixed hex quantity.
pub fn parse_quantity(value: &str) -> Result<u64, RpcError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    u64::from_str_radix(digits, 16).map_err(|_| RpcError::InvalidQuantity(value.to_string()))
}

pub fn format_quantity(value: u64) -> String {
    format!("{value:#x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities_round_trip_through_hex() {
        assert_eq!(format_quantity(0), "0x0");
        assert_eq!(format_quantity(255), "0xff");
        assert_eq!(parse_quantity("0x1b4").unwrap(), 436);
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn detects_loopback_endpoints() {
        assert!(is_loopback("http://127.0.0.1:8545"));
        assert!(is_loopback("http://localhost:8545/rpc"));
        assert!(is_loopback("http://[::1]:8545"));
        assert!(!is_loopback("https://eth.example.org"));
        assert!(!is_loopback("https://127.0.0.1.example.org"));
    }

    #[test]
    fn pending_receipt_decodes_as_none() {
        let body: Response = serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#)
            .unwrap();
        let receipt: Option<ReceiptJson> =
            serde_json::from_value(body.result.unwrap_or(Value::Null)).unwrap();
        assert!(receipt.is_none());
    }

    #[test]
    fn log_entries_default_removed_flag() {
        let log: LogJson = serde_json::from_str(
            r#"{"data":"0x","transactionHash":"0xab","blockNumber":"0x2"}"#,
        )
        .unwrap();
        assert!(!log.removed);
        assert_eq!(log.transaction_hash.as_deref(), Some("0xab"));
    }

    #[tokio::test]
    async fn gateway_errors_surface_as_transient_status() {
        let node = crate::mock_node::MockNode::start(|method, _| match method {
            "eth_blockNumber" => Err(502),
            _ => Ok(json!("0x1")),
        })
        .await;
        let rpc = RpcClient::new(node.url(), Duration::from_secs(5)).unwrap();

        let err = rpc.block_number().await.unwrap_err();
        assert!(matches!(err, RpcError::Status(status) if status.as_u16() == 502), "{err:?}");
        assert!(err.is_transient());

        assert_eq!(rpc.chain_id().await.unwrap(), 1);
    }
}
