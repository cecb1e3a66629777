//! Playback configuration

use crate::types::RepeatMode;
use serde::{Deserialize, Serialize};

/// Configuration for the playback store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Maximum number of played track ids remembered (default: 500)
    pub history_size: usize,

    /// Initial repeat mode (default: none)
    pub repeat: RepeatMode,

    /// Seed for the shuffle RNG; entropy-seeded when absent
    pub shuffle_seed: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: 500,
            repeat: RepeatMode::Off,
            shuffle_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.history_size, 500);
        assert_eq!(config.repeat, RepeatMode::Off);
        assert!(config.shuffle_seed.is_none());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: PlaybackConfig = serde_json::from_str(r#"{"repeat": "all"}"#).unwrap();
        assert_eq!(config.repeat, RepeatMode::All);
        assert_eq!(config.history_size, 500);
    }
}
