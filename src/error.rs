//! Error types for Proofchain

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ChainError {
    MissingField(String),
    InvalidPeerAddress(String),
    NetworkError(String),
    InvalidChain(String),
    MiningCancelled,
    ConfigError(String),
    IoError(String),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainError::MissingField(field) => write!(f, "Missing required field: {}", field),
            ChainError::InvalidPeerAddress(msg) => write!(f, "Invalid peer address: {}", msg),
            ChainError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            ChainError::InvalidChain(msg) => write!(f, "Invalid chain: {}", msg),
            ChainError::MiningCancelled => write!(f, "Mining was cancelled"),
            ChainError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ChainError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ChainError {}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::IoError(err.to_string())
    }
}

impl From<reqwest::Error> for ChainError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChainError::NetworkError(format!("request timed out: {}", err))
        } else {
            ChainError::NetworkError(err.to_string())
        }
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::ConfigError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
