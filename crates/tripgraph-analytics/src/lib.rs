//! tripgraph-analytics: BFS path search and PageRank over the location graph.
//!
//! Every operation follows the same lifecycle: project the store for one
//! weight property, run the algorithm over the projection, and release the
//! projection when the call returns, whether it succeeded or not.

pub mod bfs;
pub mod error;
pub mod load;
pub mod pagerank;
pub mod types;

pub use error::AnalyticsError;
pub use types::{AnalyticsWarning, GraphStats, PathResult, RankResult};

use std::time::Instant;

use chrono::Utc;
use tripgraph_core::{AnalyticsConfig, LocationPath, PathNode, ProjectionId, RankedLocation};
use tripgraph_store::{GraphStore, Projection, ProjectionCatalog, ProjectionSpec};

use crate::bfs::RawPath;
use crate::pagerank::{PageRankConfig, PageRankRun};

/// The analytics engine: owns the store and the live projections.
///
/// All methods take `&self`; share the engine across threads behind an `Arc`.
#[derive(Debug)]
pub struct AnalyticsEngine {
    store: GraphStore,
    catalog: ProjectionCatalog,
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    /// Create a new engine with the default configuration.
    pub fn new(store: GraphStore) -> Self {
        Self {
            store,
            catalog: ProjectionCatalog::new(),
            config: AnalyticsConfig::default(),
        }
    }

    /// Set a custom configuration. The configuration is validated first.
    pub fn with_config(mut self, config: AnalyticsConfig) -> error::Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn catalog(&self) -> &ProjectionCatalog {
        &self.catalog
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            locations: self.store.location_count(),
            trips: self.store.trip_count(),
        }
    }

    /// Shortest-hop paths from `start` to `end`, over trips weighted by the
    /// configured path property.
    ///
    /// An unknown name is an error; an unreachable `end` yields no paths.
    pub fn find_path(&self, start: &str, end: &str) -> error::Result<PathResult> {
        let started = Instant::now();
        let spec = ProjectionSpec::from_config(&self.config, &self.config.path_weight_property);
        let projection = self.catalog.project(&self.store, &spec)?;

        let raw_paths = bfs::bfs_with_policy(
            &projection,
            start,
            end,
            self.config.path_policy,
            self.config.max_paths,
        )?;
        let paths: Vec<LocationPath> = raw_paths
            .iter()
            .map(|rp| raw_path_to_location_path(&projection, rp))
            .collect();

        let computation_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            start,
            end,
            paths = paths.len(),
            hops = paths.first().map(|p| p.hops),
            computation_ms,
            "Path query finished"
        );

        Ok(PathResult {
            start: start.to_string(),
            end: end.to_string(),
            paths,
            projection_id: projection.id(),
            computed_at: Utc::now(),
            computation_ms,
        })
    }

    /// PageRank over trips weighted by `weight_property`; reports the highest
    /// and lowest ranked locations.
    pub fn rank_nodes(&self, max_iterations: usize, weight_property: &str) -> error::Result<RankResult> {
        let started = Instant::now();
        let ranking = self.run_ranking(max_iterations, weight_property)?;

        let warnings = if ranking.run.converged {
            Vec::new()
        } else {
            tracing::warn!(
                iterations = ranking.run.iterations,
                final_delta = ranking.run.final_delta,
                tolerance = self.config.tolerance,
                "PageRank stopped before converging"
            );
            vec![AnalyticsWarning::ConvergenceNotReached {
                iterations: ranking.run.iterations,
                final_delta: ranking.run.final_delta,
                tolerance: self.config.tolerance,
            }]
        };

        let computation_ms = started.elapsed().as_millis() as u64;
        let top = ranking.locations.first().cloned();
        let bottom = ranking.locations.last().cloned();

        tracing::info!(
            weight_property,
            nodes = ranking.locations.len(),
            iterations = ranking.run.iterations,
            top = top.as_ref().map(|r| r.name.as_str()),
            bottom = bottom.as_ref().map(|r| r.name.as_str()),
            computation_ms,
            "Rank query finished"
        );

        Ok(RankResult {
            weight_property: weight_property.to_string(),
            top,
            bottom,
            node_count: ranking.locations.len(),
            iterations: ranking.run.iterations,
            converged: ranking.run.converged,
            warnings,
            projection_id: ranking.projection_id,
            computed_at: Utc::now(),
            computation_ms,
        })
    }

    /// Full PageRank ordering, highest first, ties by ascending location id.
    pub fn rank_all(
        &self,
        max_iterations: usize,
        weight_property: &str,
    ) -> error::Result<Vec<RankedLocation>> {
        Ok(self.run_ranking(max_iterations, weight_property)?.locations)
    }

    fn run_ranking(&self, max_iterations: usize, weight_property: &str) -> error::Result<Ranking> {
        let pr_config = PageRankConfig {
            max_iterations,
            damping_factor: self.config.damping_factor,
            tolerance: self.config.tolerance,
        };
        pr_config.validate()?;

        let spec = ProjectionSpec::from_config(&self.config, weight_property);
        let projection = self.catalog.project(&self.store, &spec)?;
        let run = pagerank::pagerank(&projection, &pr_config)?;

        Ok(Ranking {
            locations: pagerank::ranked(&projection, &run),
            run,
            projection_id: projection.id(),
        })
    }
}

struct Ranking {
    locations: Vec<RankedLocation>,
    run: PageRankRun,
    projection_id: ProjectionId,
}

/// Convert a `RawPath` into a `LocationPath` with location names.
fn raw_path_to_location_path(projection: &Projection, raw: &RawPath) -> LocationPath {
    LocationPath {
        nodes: raw
            .node_indices
            .iter()
            .filter_map(|&i| projection.get_node(i))
            .map(|node| PathNode {
                id: node.id,
                name: node.name.clone(),
            })
            .collect(),
        hops: raw.hops(),
        total_weight: raw.total_weight,
    }
}
