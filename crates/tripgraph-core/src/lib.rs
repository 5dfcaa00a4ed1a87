//! tripgraph-core: Shared types, configuration, and error handling for tripgraph.
//!
//! This crate provides the foundational types used across all tripgraph components:
//! - Location nodes and trip edges as handed over by the snapshot loader
//! - Path and ranking result types
//! - Analytics configuration
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use self::config::{AnalyticsConfig, PathPolicy};
pub use error::TripgraphError;
pub use types::{
    GraphSnapshot, Location, LocationPath, NodeId, PathNode, ProjectionId, RankedLocation, Trip,
};
