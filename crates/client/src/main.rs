//! Boss arena client binary.
//!
//! This binary is the composition root that assembles:
//! 1. A ledger backend (simulated or EVM) resolved into a connection provider
//! 2. The battle controller, built with that provider injected
//! 3. A frontend (CLI)
//!
//! # Features
//!
//! - `frontend-cli`: Terminal-based UI (default)
//! - `sim`: In-memory ledger (default)
//! - `evm`: Deployed contract over JSON-RPC
//!
//! # Examples
//!
//! ```bash
//! # Simulated ledger
//! cargo run -p arena-client
//!
//! # Deployed contract
//! ARENA_BACKEND=evm ARENA_CONTRACT_ADDRESS=0x... cargo run -p arena-client --features evm
//! ```

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    #[cfg(feature = "frontend-cli")]
    {
        run_cli().await?;
    }

    #[cfg(not(feature = "frontend-cli"))]
    {
        compile_error!("At least one frontend feature must be enabled (frontend-cli)");
    }

    Ok(())
}

/// Run the CLI frontend.
#[cfg(feature = "frontend-cli")]
async fn run_cli() -> Result<()> {
    use arena_client::{Backend, Client, backend};
    use battle::{BattleConfig, BattleController};
    use client_frontend_cli::{CliConfig, CliFrontend, FrontendConfig, logging};

    // 1. Load configuration from environment
    let battle_config = BattleConfig::from_env();
    let frontend_config = FrontendConfig::from_env();
    let cli_config = CliConfig::from_env();
    let backend = Backend::from_env()?;

    // 2. Setup logging
    logging::setup_logging(cli_config.session_id.as_deref())?;

    tracing::info!("Starting arena client");
    tracing::info!("Backend: {}", backend);
    tracing::info!("Hit display: {:?}", battle_config.hit_display);

    // 3. Connect and resolve the operator's character
    let session = backend::open(backend).await?;
    if !session.is_connected() {
        tracing::warn!("No live contract handle; the arena will stay inert");
    }

    // 4. Build the controller with the connection injected
    let mut controller = BattleController::builder()
        .config(battle_config)
        .connection(session.connection);
    if let Some(character) = session.character {
        controller = controller.character(character);
    }
    let controller = controller.build().await?;

    tracing::info!("Battle controller started");

    // 5. Build and run
    let client = Client::builder()
        .controller(controller)
        .frontend(CliFrontend::new(frontend_config, cli_config))
        .build()?;

    client.run().await?;

    tracing::info!("Client shutdown complete");
    Ok(())
}
