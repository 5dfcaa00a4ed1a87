//! Weighted PageRank by power iteration.
//!
//! Each node passes its damped score to its successors in proportion to trip
//! weight. Sinks (no outgoing trips, or zero total outgoing weight) spread
//! their score uniformly over every node, so the scores always sum to one.
//! Iteration stops at `max_iterations` or once the L1 change between two
//! iterations drops below `tolerance`.

use tripgraph_core::RankedLocation;
use tripgraph_store::Projection;

use crate::error::{AnalyticsError, Result};

/// Parameters of a PageRank run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRankConfig {
    pub max_iterations: usize,
    /// Probability of following a trip rather than restarting, in `[0, 1)`.
    pub damping_factor: f64,
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            damping_factor: 0.85,
            tolerance: 1e-6,
        }
    }
}

impl PageRankConfig {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Self::default()
        }
    }

    pub fn with_damping_factor(mut self, damping_factor: f64) -> Self {
        self.damping_factor = damping_factor;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.damping_factor) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "damping_factor must be in [0, 1), got {}",
                self.damping_factor
            )));
        }
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(AnalyticsError::InvalidParameter(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Outcome of a PageRank run.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankRun {
    /// Score per projection node index.
    pub scores: Vec<f64>,
    pub iterations: usize,
    /// Whether the tolerance was met before `max_iterations`.
    pub converged: bool,
    /// L1 change of the last iteration.
    pub final_delta: f64,
}

/// Compute PageRank over every node of the projection.
pub fn pagerank(projection: &Projection, config: &PageRankConfig) -> Result<PageRankRun> {
    config.validate()?;

    let n = projection.node_count();
    if n == 0 {
        return Ok(PageRankRun {
            scores: Vec::new(),
            iterations: 0,
            converged: true,
            final_delta: 0.0,
        });
    }

    let n_f = n as f64;
    let d = config.damping_factor;
    let transitions: Vec<Vec<(usize, f64)>> = (0..n).map(|i| out_transitions(projection, i)).collect();

    let mut scores = vec![1.0 / n_f; n];
    let mut next = vec![0.0; n];
    let mut iterations = 0;
    let mut final_delta = f64::INFINITY;
    let mut converged = false;

    while iterations < config.max_iterations {
        let dangling: f64 = (0..n)
            .filter(|&i| transitions[i].is_empty())
            .map(|i| scores[i])
            .sum();

        next.fill((1.0 - d) / n_f + d * dangling / n_f);

        for (i, &score) in scores.iter().enumerate() {
            for &(target, probability) in &transitions[i] {
                next[target] += d * score * probability;
            }
        }

        final_delta = scores.iter().zip(&next).map(|(a, b)| (a - b).abs()).sum();
        std::mem::swap(&mut scores, &mut next);
        iterations += 1;

        if final_delta < config.tolerance {
            converged = true;
            break;
        }
    }

    tracing::debug!(
        projection = %projection.name(),
        nodes = n,
        iterations,
        converged,
        final_delta,
        "PageRank finished"
    );

    Ok(PageRankRun {
        scores,
        iterations,
        converged,
        final_delta,
    })
}

/// Outgoing transition probabilities of node `i`; empty for a sink.
///
/// Weights are scaled by the node's largest weight before summing, so the sum
/// stays finite and positive for any finite non-negative weights.
fn out_transitions(projection: &Projection, i: usize) -> Vec<(usize, f64)> {
    let edges = projection.edges(i);
    let max = edges.iter().map(|e| e.weight).fold(0.0, f64::max);
    if !(max.is_finite() && max > 0.0) {
        return Vec::new();
    }

    let total: f64 = edges.iter().map(|e| e.weight / max).sum();
    if !(total.is_finite() && total > 0.0) {
        return Vec::new();
    }
    edges
        .iter()
        .filter(|e| e.weight > 0.0)
        .map(|e| (e.target, e.weight / max / total))
        .collect()
}

/// Scores joined with their locations, highest first.
///
/// Ties are broken by ascending location id.
pub fn ranked(projection: &Projection, run: &PageRankRun) -> Vec<RankedLocation> {
    let mut ranking: Vec<RankedLocation> = run
        .scores
        .iter()
        .enumerate()
        .map(|(i, &score)| {
            let node = projection.node(i);
            RankedLocation {
                id: node.id,
                name: node.name.clone(),
                score,
            }
        })
        .collect();

    ranking.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
    ranking
}
