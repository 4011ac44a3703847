//! Error types for EVM backend operations.

use client_blockchain_core::{ContractError, StateError};
use thiserror::Error;

/// JSON-RPC error code for a rejected signature request (EIP-1193).
const USER_REJECTED: i64 = 4001;
/// JSON-RPC error code nodes use for `execution reverted`.
const EXECUTION_REVERTED: i64 = 3;

/// Transport-level JSON-RPC failures.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Node returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("RPC error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("Malformed RPC response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid hex quantity: {0}")]
    InvalidQuantity(String),
}

impl RpcError {
    fn is_revert(&self) -> bool {
        match self {
            RpcError::Remote { code, message } => {
                *code == EXECUTION_REVERTED || message.contains("revert")
            }
            _ => false,
        }
    }

    /// Failures worth retrying: the node was unreachable or answered with a
    /// non-2xx status. JSON-RPC error objects are answers, not outages.
    pub fn is_transient(&self) -> bool {
        matches!(self, RpcError::Transport(_) | RpcError::Status(_))
    }

    fn is_user_rejection(&self) -> bool {
        matches!(self, RpcError::Remote { code, .. } if *code == USER_REJECTED)
    }
}

/// ABI decoding failures.
#[derive(Debug, Error)]
pub enum AbiError {
    #[error("Return data truncated: need {needed} bytes, have {len}")]
    Truncated { needed: usize, len: usize },

    #[error("Value does not fit in 64 bits")]
    Overflow,

    #[error("String is not valid UTF-8")]
    InvalidUtf8,

    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error(transparent)]
    InvalidState(#[from] StateError),
}

/// Errors that can occur during EVM backend operations.
#[derive(Debug, Error)]
pub enum EvmError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Node exposes no accounts; set ARENA_ACCOUNT")]
    NoAccount,
}

pub type Result<T> = std::result::Result<T, EvmError>;

impl From<EvmError> for ContractError {
    fn from(err: EvmError) -> Self {
        match err {
            EvmError::Rpc(rpc) if rpc.is_user_rejection() => ContractError::Cancelled(rpc.to_string()),
            EvmError::Rpc(rpc) if rpc.is_revert() => ContractError::ActionRejected(rpc.to_string()),
            EvmError::Rpc(rpc) => ContractError::Network(rpc.to_string()),
            EvmError::Abi(abi) => ContractError::InvalidData(abi.to_string()),
            EvmError::InvalidConfig(_) | EvmError::NoAccount => {
                ContractError::Network(err.to_string())
            }
        }
    }
}

impl From<AbiError> for ContractError {
    fn from(err: AbiError) -> Self {
        EvmError::Abi(err).into()
    }
}

impl From<RpcError> for ContractError {
    fn from(err: RpcError) -> Self {
        EvmError::Rpc(err).into()
    }
}
