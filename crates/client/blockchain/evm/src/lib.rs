//! EVM backend for the arena contract.
//!
//! Talks to a JSON-RPC node that manages the operator's key:
//! - reads via `eth_call` (`getBigBoss`, `checkIfUserHasNFT`)
//! - attacks via `eth_sendTransaction` (`attackBoss`), mined status via
//!   `eth_getTransactionReceipt` polling
//! - `AttackComplete` notifications via `eth_getLogs` polling, one task per
//!   subscription
//!
//! ABI encoding is done by hand in [`abi`]; the contract surface is three
//! zero-argument functions and one event.

pub mod abi;
pub mod config;
pub mod contract;
pub mod error;
pub mod rpc;

mod listener;
#[cfg(test)]
mod mock_node;

pub use config::EvmConfig;
pub use contract::EvmArena;
pub use error::{AbiError, EvmError, Result, RpcError};
pub use rpc::RpcClient;
