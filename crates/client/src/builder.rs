//! Client builder with dependency injection pattern.

use anyhow::{Context, Result};
use battle::BattleController;

use crate::{Client, Frontend};

/// Builder for constructing a [`Client`].
///
/// Both the controller and the frontend are required; `build` fails fast when
/// either is missing.
#[derive(Default)]
pub struct ClientBuilder {
    controller: Option<BattleController>,
    frontend: Option<Box<dyn Frontend>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the battle controller (required).
    ///
    /// Build it with [`BattleController::builder`] so the connection provider
    /// is injected before the worker starts.
    pub fn controller(mut self, controller: BattleController) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Set the frontend (required).
    pub fn frontend(mut self, frontend: impl Frontend + 'static) -> Self {
        self.frontend = Some(Box::new(frontend));
        self
    }

    pub fn build(self) -> Result<Client> {
        let controller = self
            .controller
            .context("Battle controller is required. Use .controller() to set it.")?;

        let frontend = self
            .frontend
            .context("Frontend is required. Use .frontend() to set it.")?;

        Ok(Client {
            controller,
            frontend,
        })
    }
}
