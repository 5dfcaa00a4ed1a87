//! Breadth-first path search over a projection.
//!
//! Trips are followed in their natural direction only. The frontier is FIFO
//! and edges are explored in adjacency order, so among equal-length paths
//! the first-discovered one wins.

use std::collections::VecDeque;

use tripgraph_core::PathPolicy;
use tripgraph_store::Projection;

use crate::error::{AnalyticsError, Result};

/// A raw path through a projection.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPath {
    /// Node indices along the path.
    pub node_indices: Vec<usize>,
    /// Edges along the path as (from_node_index, edge_position_in_adjacency_list).
    pub edges: Vec<(usize, usize)>,
    /// Sum of the projected weight over the edges taken.
    pub total_weight: f64,
}

impl RawPath {
    fn single(node: usize) -> Self {
        Self {
            node_indices: vec![node],
            edges: Vec::new(),
            total_weight: 0.0,
        }
    }

    pub fn hops(&self) -> usize {
        self.edges.len()
    }
}

/// Shortest-hop path between two named locations.
///
/// Returns at most one path. An empty list means the target is unreachable;
/// an unknown name is an error.
pub fn bfs(projection: &Projection, start_name: &str, target_name: &str) -> Result<Vec<RawPath>> {
    bfs_with_policy(projection, start_name, target_name, PathPolicy::First, 1)
}

/// Like [`bfs`], returning every shortest path under [`PathPolicy::AllShortest`].
pub fn bfs_with_policy(
    projection: &Projection,
    start_name: &str,
    target_name: &str,
    policy: PathPolicy,
    max_paths: usize,
) -> Result<Vec<RawPath>> {
    if max_paths == 0 {
        return Err(AnalyticsError::InvalidParameter(
            "max_paths must be at least 1".to_string(),
        ));
    }
    let start = resolve(projection, start_name)?;
    let target = resolve(projection, target_name)?;

    let paths: Vec<RawPath> = match policy {
        PathPolicy::First => first_path(projection, start, target).into_iter().collect(),
        PathPolicy::AllShortest => all_shortest_paths(projection, start, target, max_paths),
    };

    tracing::debug!(
        projection = %projection.name(),
        start = start_name,
        target = target_name,
        ?policy,
        paths = paths.len(),
        "BFS finished"
    );
    Ok(paths)
}

fn resolve(projection: &Projection, name: &str) -> Result<usize> {
    projection
        .resolve(name)
        .ok_or_else(|| AnalyticsError::NodeNotFound {
            name: name.to_string(),
            projection: projection.name().to_string(),
        })
}

/// BFS with predecessor links; stops when `target` is dequeued.
pub fn first_path(projection: &Projection, start: usize, target: usize) -> Option<RawPath> {
    if start == target {
        return Some(RawPath::single(start));
    }

    let n = projection.node_count();
    let mut visited = vec![false; n];
    let mut prev: Vec<Option<(usize, usize)>> = vec![None; n]; // (parent_node, edge_pos)
    let mut queue = VecDeque::new();

    visited[start] = true;
    queue.push_back(start);

    let mut found = false;
    while let Some(node) = queue.pop_front() {
        if node == target {
            found = true;
            break;
        }

        for (edge_pos, edge) in projection.edges(node).iter().enumerate() {
            if visited[edge.target] {
                continue;
            }
            visited[edge.target] = true;
            prev[edge.target] = Some((node, edge_pos));
            queue.push_back(edge.target);
        }
    }

    if !found {
        return None;
    }

    // Walk predecessor links back to the start.
    let mut node_indices = Vec::new();
    let mut edges = Vec::new();
    let mut current = target;

    while let Some((parent, edge_pos)) = prev[current] {
        node_indices.push(current);
        edges.push((parent, edge_pos));
        current = parent;
    }
    node_indices.push(start);

    node_indices.reverse();
    edges.reverse();

    Some(finish(projection, node_indices, edges))
}

/// Every shortest-hop path from `start` to `target`, at most `max_paths`.
///
/// The first path is the one [`first_path`] returns. Parallel trips between
/// the same pair of locations do not produce duplicate paths.
pub fn all_shortest_paths(
    projection: &Projection,
    start: usize,
    target: usize,
    max_paths: usize,
) -> Vec<RawPath> {
    if max_paths == 0 {
        return Vec::new();
    }
    if start == target {
        return vec![RawPath::single(start)];
    }

    let n = projection.node_count();
    let mut dist = vec![usize::MAX; n];
    // preds[v] = (parent_node, edge_pos) one layer closer to the start, in discovery order.
    let mut preds: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    let mut queue = VecDeque::new();

    dist[start] = 0;
    queue.push_back(start);

    while let Some(node) = queue.pop_front() {
        if dist[target] != usize::MAX && dist[node] >= dist[target] {
            break;
        }

        for (edge_pos, edge) in projection.edges(node).iter().enumerate() {
            let next = edge.target;
            if dist[next] == usize::MAX {
                dist[next] = dist[node] + 1;
                queue.push_back(next);
            }
            if dist[next] == dist[node] + 1 && !preds[next].iter().any(|&(p, _)| p == node) {
                preds[next].push((node, edge_pos));
            }
        }
    }

    if dist[target] == usize::MAX {
        return Vec::new();
    }

    let mut paths = Vec::new();
    // Partial paths from the target backwards: (node, nodes_rev, edges_rev).
    let mut stack: Vec<(usize, Vec<usize>, Vec<(usize, usize)>)> =
        vec![(target, vec![target], Vec::new())];

    while let Some((node, mut nodes_rev, mut edges_rev)) = stack.pop() {
        if node == start {
            nodes_rev.reverse();
            edges_rev.reverse();
            paths.push(finish(projection, nodes_rev, edges_rev));
            if paths.len() >= max_paths {
                break;
            }
            continue;
        }

        // Reverse push so the earliest-discovered predecessor is expanded first.
        for &(parent, edge_pos) in preds[node].iter().rev() {
            let mut nodes = nodes_rev.clone();
            nodes.push(parent);
            let mut edges = edges_rev.clone();
            edges.push((parent, edge_pos));
            stack.push((parent, nodes, edges));
        }
    }

    paths
}

fn finish(projection: &Projection, node_indices: Vec<usize>, edges: Vec<(usize, usize)>) -> RawPath {
    let total_weight = edges
        .iter()
        .map(|&(from, pos)| projection.edges(from)[pos].weight)
        .sum();
    RawPath {
        node_indices,
        edges,
        total_weight,
    }
}
