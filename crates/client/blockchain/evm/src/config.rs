//! EVM backend configuration.

use std::env;
use std::time::Duration;

use crate::error::{EvmError, Result};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Connection settings for a deployed arena contract.
#[derive(Debug, Clone)]
pub struct EvmConfig {
    /// JSON-RPC endpoint of the node
    pub rpc_url: String,

    /// Address of the deployed game contract (0x-prefixed)
    pub contract_address: String,

    /// Sending account; the node's first unlocked account when unset
    pub account: Option<String>,

    /// Interval between receipt and log polls
    pub poll_interval: Duration,

    /// How long to wait for an attack to be mined
    pub receipt_timeout: Duration,

    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl EvmConfig {
    pub fn new(contract_address: impl Into<String>) -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            contract_address: contract_address.into(),
            account: None,
            poll_interval: Duration::from_millis(2_000),
            receipt_timeout: Duration::from_millis(120_000),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_CONTRACT_ADDRESS` - Deployed game contract (required)
    /// - `ARENA_RPC_URL` - JSON-RPC endpoint (default: http://127.0.0.1:8545)
    /// - `ARENA_ACCOUNT` - Sending account (default: first `eth_accounts` entry)
    /// - `ARENA_POLL_INTERVAL_MS` - Receipt/log poll interval (default: 2000)
    /// - `ARENA_RECEIPT_TIMEOUT_MS` - Mining timeout (default: 120000)
    pub fn from_env() -> Result<Self> {
        let contract_address = env::var("ARENA_CONTRACT_ADDRESS").map_err(|_| {
            EvmError::InvalidConfig("ARENA_CONTRACT_ADDRESS is not set".to_string())
        })?;

        let mut config = Self::new(contract_address);

        if let Ok(url) = env::var("ARENA_RPC_URL") {
            config.rpc_url = url;
        }
        config.account = env::var("ARENA_ACCOUNT").ok().filter(|s| !s.is_empty());

        if let Some(ms) = env::var("ARENA_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.poll_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = env::var("ARENA_RECEIPT_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.receipt_timeout = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = url.into();
        self
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
            return Err(EvmError::InvalidConfig(format!(
                "Invalid RPC URL format: {}",
                self.rpc_url
            )));
        }

        check_address("contract address", &self.contract_address)?;
        if let Some(account) = &self.account {
            check_address("account", account)?;
        }

        if self.poll_interval.is_zero() {
            return Err(EvmError::InvalidConfig(
                "Poll interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn check_address(what: &str, address: &str) -> Result<()> {
    let valid = address
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(EvmError::InvalidConfig(format!("Invalid {what}: {address}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    #[test]
    fn defaults_point_at_local_node() {
        let config = EvmConfig::new(ADDRESS);
        assert_eq!(config.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.receipt_timeout, Duration::from_secs(120));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(EvmConfig::new("5FbDB2315678afecb367f032d93F642f64180aa3").validate().is_err());
        assert!(EvmConfig::new("0x1234").validate().is_err());
        assert!(
            EvmConfig::new(ADDRESS)
                .with_account("0xnothex")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let config = EvmConfig::new(ADDRESS).with_rpc_url("ws://127.0.0.1:8546");
        assert!(config.validate().is_err());
    }
}
