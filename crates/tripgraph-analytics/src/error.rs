//! Error types for the tripgraph-analytics crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Store error: {0}")]
    Store(#[from] tripgraph_store::StoreError),

    #[error("Config error: {0}")]
    Config(#[from] tripgraph_core::TripgraphError),

    #[error("Location not found in projection {projection}: {name}")]
    NodeNotFound { name: String, projection: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid snapshot {path}: {reason}")]
    Snapshot { path: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
