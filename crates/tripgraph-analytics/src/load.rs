//! Snapshot loading at the boundary with the external loader.
//!
//! The loader guarantees names, ids and weight properties are populated; this
//! module only decodes the snapshot and hands it to the store.

use std::path::Path;

use tripgraph_core::GraphSnapshot;
use tripgraph_store::GraphStore;

use crate::error::{AnalyticsError, Result};

/// Decode a JSON snapshot.
pub fn parse_snapshot(json: &str) -> Result<GraphSnapshot> {
    Ok(serde_json::from_str(json)?)
}

/// Read a JSON snapshot from disk.
pub fn load_snapshot(path: &Path) -> Result<GraphSnapshot> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| AnalyticsError::Snapshot {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Read a snapshot from disk and build the store from it.
pub fn load_store(path: &Path) -> Result<GraphStore> {
    let snapshot = load_snapshot(path)?;
    tracing::debug!(
        path = %path.display(),
        locations = snapshot.locations.len(),
        trips = snapshot.trips.len(),
        "Snapshot decoded"
    );
    Ok(GraphStore::from_snapshot(snapshot))
}
