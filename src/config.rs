//! Configuration management for Proofchain
//!
//! Everything is optional: with no `config.toml` the node listens on port
//! 5000, gives peers five seconds to answer and starts with no peers.

use crate::error::{ChainError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub miner: MinerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    #[serde(default = "default_peer_timeout_secs")]
    pub peer_timeout_secs: u64,
    #[serde(default)]
    pub bootstrap_peers: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            peer_timeout_secs: default_peer_timeout_secs(),
            bootstrap_peers: Vec::new(),
        }
    }
}

impl NetworkConfig {
    pub fn peer_timeout(&self) -> Duration {
        Duration::from_secs(self.peer_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MinerConfig {
    #[serde(default = "default_reward_amount")]
    pub reward_amount: f64,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            reward_amount: default_reward_amount(),
        }
    }
}

fn default_api_port() -> u16 {
    5000
}

fn default_peer_timeout_secs() -> u64 {
    5
}

fn default_reward_amount() -> f64 {
    1.0
}

/// Load `path`, falling back to defaults when the file does not exist.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let config: Config = if path.exists() {
        let config_str = fs::read_to_string(path)?;
        toml::from_str(&config_str)?
    } else {
        Config::default()
    };

    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.network.api_port == 0 {
            return Err(ChainError::ConfigError("network.api_port must be non-zero".to_string()));
        }
        if self.network.peer_timeout_secs == 0 {
            return Err(ChainError::ConfigError(
                "network.peer_timeout_secs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.network.api_port, 5000);
        assert_eq!(config.network.peer_timeout(), Duration::from_secs(5));
        assert!(config.network.bootstrap_peers.is_empty());
        assert_eq!(config.miner.reward_amount, 1.0);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[network]\napi_port = 5001\nbootstrap_peers = [\"http://127.0.0.1:5000\"]").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.network.api_port, 5001);
        assert_eq!(config.network.peer_timeout_secs, 5);
        assert_eq!(config.network.bootstrap_peers, vec!["http://127.0.0.1:5000".to_string()]);
        assert_eq!(config.miner.reward_amount, 1.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[network]\npeer_timeout_secs = 0").unwrap();
        assert!(matches!(load_config(file.path()), Err(ChainError::ConfigError(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[network\napi_port = ").unwrap();
        assert!(matches!(load_config(file.path()), Err(ChainError::ConfigError(_))));
    }
}
