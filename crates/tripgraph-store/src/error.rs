//! Error types for the tripgraph-store crate.

use thiserror::Error;
use tripgraph_core::NodeId;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Location not found: {name}")]
    NodeNotFound { name: String },

    #[error("Unknown location id: {id}")]
    UnknownNode { id: NodeId },

    #[error("Projection spec field must not be empty: {field}")]
    EmptySpec { field: &'static str },
}

pub type Result<T> = std::result::Result<T, StoreError>;
