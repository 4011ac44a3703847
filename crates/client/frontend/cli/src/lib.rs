//! Terminal UI frontend for the boss arena.
//!
//! This crate provides a terminal-based user interface for the battle.
//! It implements the `client_frontend_core::Frontend` trait for pure UI rendering.
//!
//! # Architecture
//!
//! CliFrontend is a pure UI layer that:
//! - Receives a BattleHandle for communication
//! - Does NOT own the BattleController
//! - Watches published views and requests attacks via the handle

mod app;
mod config;
mod input;
pub mod logging;
pub mod presentation;

pub use app::CliFrontend;
pub use config::CliConfig;

// Re-export for convenience (used in main.rs)
pub use client_frontend_core::FrontendConfig;
