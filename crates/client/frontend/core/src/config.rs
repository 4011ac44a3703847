//! Frontend configuration structures and loaders.
//!
//! This module contains UI-specific configuration that is shared across
//! different frontend implementations (CLI, GUI, etc.).

use std::env;

/// Frontend-specific configuration.
#[derive(Clone, Debug, Default)]
pub struct FrontendConfig {
    pub messages: MessageConfig,
}

impl FrontendConfig {
    pub const fn new(messages: MessageConfig) -> Self {
        Self { messages }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CLI_MESSAGE_CAPACITY` - Message log capacity (default: 64)
    /// - `SHOW_HEALTH_MESSAGES` - Log every health change (default: true)
    /// - `SHOW_PHASE_MESSAGES` - Log attack submissions (default: true)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("CLI_MESSAGE_CAPACITY") {
            config.messages.capacity = capacity.max(1);
        }

        if let Some(show) = read_env_bool("SHOW_HEALTH_MESSAGES") {
            config.messages.visibility.show_health = show;
        }
        if let Some(show) = read_env_bool("SHOW_PHASE_MESSAGES") {
            config.messages.visibility.show_phase = show;
        }

        config
    }
}

#[derive(Clone, Debug)]
pub struct MessageConfig {
    pub capacity: usize,
    pub visibility: NoticeVisibility,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            visibility: NoticeVisibility::default(),
        }
    }
}

/// Controls which view changes generate visible messages.
///
/// Hits, errors and defeats are always shown.
#[derive(Clone, Debug)]
pub struct NoticeVisibility {
    /// Health changes (e.g., "Grave Colossus HP 250 → 230").
    pub show_health: bool,
    /// Attack submissions (e.g., "Attacking Grave Colossus...").
    pub show_phase: bool,
}

impl Default for NoticeVisibility {
    fn default() -> Self {
        Self {
            show_health: true,
            show_phase: true,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
