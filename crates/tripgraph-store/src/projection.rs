//! Read-only adjacency views over the graph store.
//!
//! A projection takes every location with the requested label and every trip
//! of the requested relationship type that carries the weight property, and
//! lays them out as a dense adjacency list. Node indices follow ascending
//! location id, so two projections of the same store and spec are identical
//! apart from their generation id.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tripgraph_core::{AnalyticsConfig, NodeId, ProjectionId};

use crate::error::{Result, StoreError};
use crate::store::GraphStore;

/// What to project, and under which name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionSpec {
    pub name: String,
    pub node_label: String,
    pub relationship_type: String,
    pub weight_property: String,
}

impl ProjectionSpec {
    /// Spec for `Location` nodes and `TRIP` relationships.
    pub fn new(name: impl Into<String>, weight_property: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_label: tripgraph_core::types::DEFAULT_NODE_LABEL.to_string(),
            relationship_type: tripgraph_core::types::DEFAULT_RELATIONSHIP_TYPE.to_string(),
            weight_property: weight_property.into(),
        }
    }

    /// Spec using the configured projection name and labels.
    pub fn from_config(config: &AnalyticsConfig, weight_property: &str) -> Self {
        Self {
            name: config.projection_name.clone(),
            node_label: config.node_label.clone(),
            relationship_type: config.relationship_type.clone(),
            weight_property: weight_property.to_string(),
        }
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("node_label", &self.node_label),
            ("relationship_type", &self.relationship_type),
            ("weight_property", &self.weight_property),
        ] {
            if value.trim().is_empty() {
                return Err(StoreError::EmptySpec { field });
            }
        }
        Ok(())
    }
}

/// A projected location.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedNode {
    pub id: NodeId,
    pub name: String,
}

/// A projected trip. `target` is a dense node index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedEdge {
    pub target: usize,
    pub weight: f64,
}

/// Immutable adjacency view for one weight property.
#[derive(Debug)]
pub struct Projection {
    id: ProjectionId,
    name: String,
    weight_property: String,
    built_at: DateTime<Utc>,
    nodes: Vec<ProjectedNode>,
    /// `adjacency[i]` = outgoing edges of node `i`, in store insertion order.
    adjacency: Vec<Vec<ProjectedEdge>>,
    node_index: HashMap<NodeId, usize>,
    name_index: HashMap<String, usize>,
}

impl Projection {
    /// Build a projection from the store.
    ///
    /// A name resolves only if the location that owns it in the store is part
    /// of the projection. Trips with a negative or non-finite weight are left
    /// out.
    pub fn build(store: &GraphStore, spec: &ProjectionSpec) -> Result<Self> {
        spec.validate()?;

        let mut nodes = Vec::new();
        let mut node_index = HashMap::new();
        let mut name_index = HashMap::new();

        for location in store.locations().filter(|l| l.label == spec.node_label) {
            let index = nodes.len();
            node_index.insert(location.id, index);
            if store.lookup(&location.name).ok() == Some(location.id) {
                name_index.insert(location.name.clone(), index);
            }
            nodes.push(ProjectedNode {
                id: location.id,
                name: location.name.clone(),
            });
        }

        let mut adjacency = vec![Vec::new(); nodes.len()];
        let mut rejected = 0usize;

        for (source_index, node) in nodes.iter().enumerate() {
            for trip in store.trips_from(node.id) {
                if trip.rel_type != spec.relationship_type {
                    continue;
                }
                let Some(&target) = node_index.get(&trip.target) else {
                    continue;
                };
                let Some(weight) = trip.weight(&spec.weight_property) else {
                    continue;
                };
                if !weight.is_finite() || weight < 0.0 {
                    rejected += 1;
                    tracing::warn!(
                        source = %trip.source,
                        target = %trip.target,
                        property = %spec.weight_property,
                        weight,
                        "Ignoring trip with invalid weight"
                    );
                    continue;
                }
                adjacency[source_index].push(ProjectedEdge { target, weight });
            }
        }

        let projection = Self {
            id: ProjectionId::new(),
            name: spec.name.clone(),
            weight_property: spec.weight_property.clone(),
            built_at: Utc::now(),
            nodes,
            adjacency,
            node_index,
            name_index,
        };

        tracing::debug!(
            projection = %projection.name,
            generation = %projection.id,
            weight_property = %projection.weight_property,
            nodes = projection.node_count(),
            edges = projection.edge_count(),
            rejected,
            "Projection built"
        );

        Ok(projection)
    }

    pub fn id(&self) -> ProjectionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight_property(&self) -> &str {
        &self.weight_property
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Dense index of the location that owns `name`.
    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    /// Dense index of a location id.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.node_index.get(&id).copied()
    }

    /// Panics if `index` is out of range.
    pub fn node(&self, index: usize) -> &ProjectedNode {
        &self.nodes[index]
    }

    pub fn get_node(&self, index: usize) -> Option<&ProjectedNode> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[ProjectedNode] {
        &self.nodes
    }

    /// Outgoing edges of node `index`. Panics if `index` is out of range.
    pub fn edges(&self, index: usize) -> &[ProjectedEdge] {
        &self.adjacency[index]
    }

    /// Outgoing edges of node `index`, or `None` if out of range.
    pub fn get_edges(&self, index: usize) -> Option<&[ProjectedEdge]> {
        self.adjacency.get(index).map(Vec::as_slice)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }
}
