//! Controller configuration and environment loading.
use std::env;
use std::time::Duration;

/// Configuration shared by the controller and its worker.
#[derive(Debug, Clone)]
pub struct BattleConfig {
    /// How long a confirmed hit stays visible before the phase reverts to idle.
    pub hit_display: Duration,
    /// Capacity of the command channel between handles and the worker.
    pub command_buffer_size: usize,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            hit_display: Duration::from_secs(5),
            command_buffer_size: 16,
        }
    }
}

impl BattleConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_HIT_DISPLAY_MS` - Confirmed-hit display window (default: 5000)
    /// - `ARENA_COMMAND_BUFFER` - Command queue size (default: 16)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("ARENA_HIT_DISPLAY_MS") {
            config.hit_display = Duration::from_millis(ms);
        }
        if let Some(capacity) = read_env::<usize>("ARENA_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }

        config
    }

    pub fn with_hit_display(mut self, hit_display: Duration) -> Self {
        self.hit_display = hit_display;
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_five_second_window() {
        let config = BattleConfig::default();
        assert_eq!(config.hit_display, Duration::from_secs(5));
        assert_eq!(config.command_buffer_size, 16);
    }
}
