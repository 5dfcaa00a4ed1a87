//! Configuration for the tripgraph analytics engine.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`TRIPGRAPH_ANALYTICS__` prefix)
//! 2. Config file (`tripgraph.toml`, `[analytics]` section)
//! 3. Defaults

use serde::{Deserialize, Serialize};

use crate::error::{Result, TripgraphError};
use crate::types::{DEFAULT_NODE_LABEL, DEFAULT_RELATIONSHIP_TYPE};

/// How many equal-length paths a BFS query reports.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PathPolicy {
    /// Only the first-discovered shortest path.
    #[default]
    First,
    /// Every shortest-hop path, capped at `max_paths`.
    AllShortest,
}

/// Top-level analytics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Name under which per-call projections are registered.
    #[serde(default = "default_projection_name")]
    pub projection_name: String,

    /// Only locations with this label are projected.
    #[serde(default = "default_node_label")]
    pub node_label: String,

    /// Only trips with this relationship type are projected.
    #[serde(default = "default_relationship_type")]
    pub relationship_type: String,

    /// Weight property projected for path queries.
    #[serde(default = "default_path_weight_property")]
    pub path_weight_property: String,

    /// PageRank damping factor, in `[0, 1)`.
    #[serde(default = "default_damping_factor")]
    pub damping_factor: f64,

    /// L1 delta below which PageRank is considered converged.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Iteration cap used when the caller does not give one.
    #[serde(default = "default_max_iterations")]
    pub default_max_iterations: usize,

    #[serde(default)]
    pub path_policy: PathPolicy,

    /// Upper bound on paths returned under [`PathPolicy::AllShortest`].
    #[serde(default = "default_max_paths")]
    pub max_paths: usize,
}

fn default_projection_name() -> String {
    "locationGraph".to_string()
}

fn default_node_label() -> String {
    DEFAULT_NODE_LABEL.to_string()
}

fn default_relationship_type() -> String {
    DEFAULT_RELATIONSHIP_TYPE.to_string()
}

fn default_path_weight_property() -> String {
    "distance".to_string()
}

fn default_damping_factor() -> f64 {
    0.85
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_max_iterations() -> usize {
    20
}

fn default_max_paths() -> usize {
    16
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            projection_name: default_projection_name(),
            node_label: default_node_label(),
            relationship_type: default_relationship_type(),
            path_weight_property: default_path_weight_property(),
            damping_factor: default_damping_factor(),
            tolerance: default_tolerance(),
            default_max_iterations: default_max_iterations(),
            path_policy: PathPolicy::default(),
            max_paths: default_max_paths(),
        }
    }
}

impl AnalyticsConfig {
    /// Load from `<file_prefix>.toml` and `TRIPGRAPH_ANALYTICS__*` variables.
    ///
    /// A missing file or a missing `[analytics]` section yields the defaults.
    pub fn load(file_prefix: &str) -> Result<Self> {
        let cfg = ::config::Config::builder()
            .add_source(::config::File::with_name(file_prefix).required(false))
            .add_source(
                ::config::Environment::with_prefix("TRIPGRAPH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded = match cfg.get::<AnalyticsConfig>("analytics") {
            Ok(c) => c,
            Err(::config::ConfigError::NotFound(_)) => AnalyticsConfig::default(),
            Err(e) => return Err(e.into()),
        };

        loaded.validate()?;
        tracing::debug!(
            file_prefix,
            projection = %loaded.projection_name,
            damping_factor = loaded.damping_factor,
            "Analytics config loaded"
        );
        Ok(loaded)
    }

    /// Reject values the algorithms cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.damping_factor) {
            return Err(TripgraphError::InvalidConfig(format!(
                "damping_factor must be in [0, 1), got {}",
                self.damping_factor
            )));
        }
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(TripgraphError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.default_max_iterations == 0 {
            return Err(TripgraphError::InvalidConfig(
                "default_max_iterations must be at least 1".to_string(),
            ));
        }
        if self.max_paths == 0 {
            return Err(TripgraphError::InvalidConfig(
                "max_paths must be at least 1".to_string(),
            ));
        }
        for (field, value) in [
            ("projection_name", &self.projection_name),
            ("node_label", &self.node_label),
            ("relationship_type", &self.relationship_type),
            ("path_weight_property", &self.path_weight_property),
        ] {
            if value.trim().is_empty() {
                return Err(TripgraphError::InvalidConfig(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}
