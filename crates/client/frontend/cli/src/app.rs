//! Glue code tying the battle handle and the terminal UI together.
use anyhow::Result;
use async_trait::async_trait;

use battle::BattleHandle;
use client_frontend_core::{BattleNarrator, Frontend, FrontendConfig, message::MessageLog};

use crate::config::CliConfig;
use crate::presentation::{EventLoop, terminal};

/// Terminal frontend; renders the arena and maps keys to attack requests.
pub struct CliFrontend {
    frontend_config: FrontendConfig,
    cli_config: CliConfig,
}

impl CliFrontend {
    pub fn new(frontend_config: FrontendConfig, cli_config: CliConfig) -> Self {
        Self {
            frontend_config,
            cli_config,
        }
    }
}

#[async_trait]
impl Frontend for CliFrontend {
    async fn run(&mut self, handle: BattleHandle) -> Result<()> {
        tracing::info!("CLI frontend starting...");

        let mut messages = MessageLog::new(self.frontend_config.messages.capacity);
        messages.info("Welcome to the arena.");

        let narrator =
            BattleNarrator::new(messages, self.frontend_config.messages.visibility.clone());
        let event_loop = EventLoop::new(handle, narrator, self.cli_config.ui.clone());

        let mut terminal = terminal::init()?;
        let guard = terminal::TerminalGuard::new();

        let narrator = event_loop.run(&mut terminal).await?;
        tracing::debug!(
            "Message log held {} entries at exit",
            narrator.into_message_log().len()
        );

        guard.release()?;
        tracing::info!("CLI frontend exiting");

        Ok(())
    }
}
