//! Ledger backend selection and session bootstrap.
//!
//! The composition root connects once, resolves the operator's character and
//! hands a [`StaticConnection`] to the controller builder. A backend that
//! cannot be reached yields a disconnected session rather than an error.
use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use client_blockchain_core::{CharacterReader, CharacterState, StaticConnection};

/// Which ledger the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// In-memory ledger (feature `sim`).
    Sim,
    /// Deployed contract over JSON-RPC (feature `evm`).
    Evm,
}

impl Backend {
    /// Read `ARENA_BACKEND`; defaults to `sim` when compiled in, else `evm`.
    pub fn from_env() -> Result<Self> {
        match env::var("ARENA_BACKEND") {
            Ok(value) if !value.trim().is_empty() => value.parse(),
            _ => Ok(Self::compiled_default()),
        }
    }

    const fn compiled_default() -> Self {
        if cfg!(feature = "sim") {
            Self::Sim
        } else {
            Self::Evm
        }
    }
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "sim" | "simulated" => Ok(Self::Sim),
            "evm" | "ethereum" => Ok(Self::Evm),
            other => bail!("Unknown ARENA_BACKEND `{}` (expected `sim` or `evm`)", other),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sim => f.write_str("sim"),
            Self::Evm => f.write_str("evm"),
        }
    }
}

/// Everything the controller builder needs from the backend.
pub struct Session {
    pub connection: StaticConnection,
    /// `None` only when there is no connection.
    pub character: Option<CharacterState>,
}

impl Session {
    pub fn disconnected() -> Self {
        Self {
            connection: StaticConnection::disconnected(),
            character: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.character.is_some()
    }
}

/// Connect to `backend` and resolve the operator's character.
///
/// # Errors
///
/// Fails when the backend is not compiled in, or when the ledger is reachable
/// but has no character for the operator.
pub async fn open(backend: Backend) -> Result<Session> {
    match backend {
        Backend::Sim => open_sim().await,
        Backend::Evm => open_evm().await,
    }
}

#[cfg(feature = "sim")]
async fn open_sim() -> Result<Session> {
    use std::sync::Arc;

    use client_blockchain_core::{SimConfig, SimulatedArena};

    let arena = Arc::new(SimulatedArena::new(SimConfig::from_env()));
    let character = resolve_character(arena.as_ref()).await?;
    tracing::info!("Simulated arena ready");

    Ok(Session {
        connection: StaticConnection::connected(arena),
        character: Some(character),
    })
}

#[cfg(not(feature = "sim"))]
async fn open_sim() -> Result<Session> {
    bail!("The sim backend is not compiled in; rebuild with the `sim` feature")
}

#[cfg(feature = "evm")]
async fn open_evm() -> Result<Session> {
    use std::sync::Arc;

    use client_blockchain_evm::{EvmArena, EvmConfig};

    let config = match EvmConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("EVM configuration unavailable: {}. Continuing without a connection.", err);
            return Ok(Session::disconnected());
        }
    };

    let arena = match EvmArena::connect(config).await {
        Ok(arena) => Arc::new(arena),
        Err(err) => {
            tracing::warn!("Could not reach the arena contract: {}. Continuing without a connection.", err);
            return Ok(Session::disconnected());
        }
    };

    let character = resolve_character(arena.as_ref()).await?;

    Ok(Session {
        connection: StaticConnection::connected(arena),
        character: Some(character),
    })
}

#[cfg(not(feature = "evm"))]
async fn open_evm() -> Result<Session> {
    bail!("The evm backend is not compiled in; rebuild with the `evm` feature")
}

#[cfg_attr(not(any(feature = "sim", feature = "evm")), allow(dead_code))]
async fn resolve_character(reader: &dyn CharacterReader) -> Result<CharacterState> {
    let character = reader
        .read_character()
        .await
        .context("Could not resolve the operator's character; mint one before entering the arena")?;

    tracing::info!(
        name = %character.name,
        hp = character.hp,
        max_hp = character.max_hp,
        "Character resolved"
    );
    Ok(character)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_names() {
        assert_eq!("sim".parse::<Backend>().unwrap(), Backend::Sim);
        assert_eq!(" EVM ".parse::<Backend>().unwrap(), Backend::Evm);
        assert!("solana".parse::<Backend>().is_err());
    }

    #[test]
    fn disconnected_session_has_no_character() {
        let session = Session::disconnected();
        assert!(!session.is_connected());
    }

    #[cfg(feature = "sim")]
    #[tokio::test]
    async fn sim_session_resolves_character() {
        let session = open(Backend::Sim).await.unwrap();
        assert!(session.is_connected());
    }
}
