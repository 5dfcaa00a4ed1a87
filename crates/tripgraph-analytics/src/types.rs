//! Response types for path and ranking operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tripgraph_core::{LocationPath, ProjectionId, RankedLocation};

/// Result of a path query between two named locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathResult {
    pub start: String,
    pub end: String,
    /// Empty when `end` is unreachable from `start`.
    pub paths: Vec<LocationPath>,
    pub projection_id: ProjectionId,
    pub computed_at: DateTime<Utc>,
    pub computation_ms: u64,
}

/// Highest and lowest ranked locations of a PageRank run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankResult {
    pub weight_property: String,
    /// `None` only when the projection has no locations.
    pub top: Option<RankedLocation>,
    pub bottom: Option<RankedLocation>,
    pub node_count: usize,
    pub iterations: usize,
    pub converged: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AnalyticsWarning>,
    pub projection_id: ProjectionId,
    pub computed_at: DateTime<Utc>,
    pub computation_ms: u64,
}

/// Non-fatal conditions returned alongside a result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum AnalyticsWarning {
    /// PageRank stopped at the iteration cap before meeting the tolerance.
    ConvergenceNotReached {
        iterations: usize,
        final_delta: f64,
        tolerance: f64,
    },
}

/// Size of the loaded graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphStats {
    pub locations: usize,
    pub trips: usize,
}
