use thiserror::Error;

/// Top-level error type for tripgraph configuration and shared plumbing.
#[derive(Error, Debug)]
pub enum TripgraphError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TripgraphError>;
