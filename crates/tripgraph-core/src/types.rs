//! Core domain types for the location graph.
//!
//! Locations are nodes and trips are directed, weighted edges. Both arrive
//! from the external loader as a [`GraphSnapshot`]; the result types at the
//! bottom of this module are shared by the path and ranking operations.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label given to locations when the loader does not supply one.
pub const DEFAULT_NODE_LABEL: &str = "Location";

/// Relationship type given to trips when the loader does not supply one.
pub const DEFAULT_RELATIONSHIP_TYPE: &str = "TRIP";

// ── Identifiers ───────────────────────────────────────────────────

/// Stable identifier of a location, as assigned by the loader.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Generation id of a built projection. Every build gets a fresh one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ProjectionId(pub Uuid);

impl ProjectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProjectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Graph Elements ────────────────────────────────────────────────

/// A named location in the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub id: NodeId,
    pub name: String,
    #[serde(default = "default_node_label")]
    pub label: String,
    /// Free-form attributes carried through from the loader.
    #[serde(default = "empty_object")]
    pub properties: serde_json::Value,
}

impl Location {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label: default_node_label(),
            properties: empty_object(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_property(mut self, key: &str, value: serde_json::Value) -> Self {
        if let Some(map) = self.properties.as_object_mut() {
            map.insert(key.to_string(), value);
        }
        self
    }
}

/// A directed trip between two locations.
///
/// Weight properties (e.g. `distance`) live in `properties`; a trip only
/// takes part in a projection when it carries the projected property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trip {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default = "default_relationship_type")]
    pub rel_type: String,
    #[serde(default = "empty_object")]
    pub properties: serde_json::Value,
}

impl Trip {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            rel_type: default_relationship_type(),
            properties: empty_object(),
        }
    }

    pub fn with_rel_type(mut self, rel_type: impl Into<String>) -> Self {
        self.rel_type = rel_type.into();
        self
    }

    pub fn with_weight(mut self, property: &str, value: f64) -> Self {
        if let Some(map) = self.properties.as_object_mut() {
            map.insert(property.to_string(), serde_json::json!(value));
        }
        self
    }

    /// Numeric value of a weight property, if present.
    pub fn weight(&self, property: &str) -> Option<f64> {
        self.properties.get(property).and_then(|v| v.as_f64())
    }
}

/// Everything the loader hands over: all locations and all trips.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub trips: Vec<Trip>,
}

fn default_node_label() -> String {
    DEFAULT_NODE_LABEL.to_string()
}

fn default_relationship_type() -> String {
    DEFAULT_RELATIONSHIP_TYPE.to_string()
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

// ── Result Types ──────────────────────────────────────────────────

/// A location on a path, as reported to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathNode {
    pub id: NodeId,
    pub name: String,
}

/// A path through a projection. Consecutive nodes are joined by a trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationPath {
    pub nodes: Vec<PathNode>,
    /// Number of trips taken (`nodes.len() - 1`).
    pub hops: usize,
    /// Sum of the projected weight over the trips taken.
    pub total_weight: f64,
}

impl LocationPath {
    pub fn names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }
}

/// A location with its PageRank score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedLocation {
    pub id: NodeId,
    pub name: String,
    pub score: f64,
}
