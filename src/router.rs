//! Bidirectional greedy geometric routing over a completed embedding.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::RouterConfig;
use crate::embedding::{Embedding, EmbeddedNode};
use crate::error::{CoreError, CoreResult};
use crate::graph::NodeIndex;

/// Hyperbolic distance between two embedded nodes, native `(r, theta)`
/// hyperboloid model. Clamped so numerical drift never pushes the
/// `acosh` argument below its domain.
pub fn hyperbolic_distance(a: &EmbeddedNode, b: &EmbeddedNode) -> f64 {
    if a.r == b.r && a.theta == b.theta {
        return 0.0;
    }
    let delta_theta = {
        let diff = (a.theta - b.theta).abs();
        diff.min(2.0 * std::f64::consts::PI - diff)
    };
    let arg = a.r.cosh() * b.r.cosh() - a.r.sinh() * b.r.sinh() * delta_theta.cos();
    arg.max(1.0).acosh()
}

/// Outcome of a routing query.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingResult {
    pub success: bool,
    pub path: Vec<EmbeddedNode>,
    pub forward_path: Vec<String>,
    pub backward_path: Vec<String>,
    pub meeting_node: Option<String>,
    pub distance: f64,
    pub stretch: f64,
    pub path_length: usize,
}

fn failure(forward_path: Vec<String>, backward_path: Vec<String>) -> RoutingResult {
    RoutingResult {
        success: false,
        path: Vec::new(),
        forward_path,
        backward_path,
        meeting_node: None,
        distance: f64::INFINITY,
        stretch: f64::INFINITY,
        path_length: 0,
    }
}

/// Greedy next hop from `current` toward `target`: the unvisited,
/// non-predecessor neighbor minimizing hyperbolic distance to `target`.
fn greedy_next_hop(
    embedding: &Embedding,
    current: NodeIndex,
    target: NodeIndex,
    visited: &HashSet<NodeIndex>,
    predecessor: Option<NodeIndex>,
) -> Option<NodeIndex> {
    let target_node = embedding.node_at(target);
    embedding
        .graph
        .adj[current as usize]
        .iter()
        .copied()
        .filter(|n| !visited.contains(n) && Some(*n) != predecessor)
        .min_by(|&a, &b| {
            let da = hyperbolic_distance(embedding.node_at(a), target_node);
            let db = hyperbolic_distance(embedding.node_at(b), target_node);
            da.partial_cmp(&db).unwrap()
        })
}

fn stitch_forward_meets_backward(
    forward_path: &[NodeIndex],
    backward_path: &[NodeIndex],
    k: usize,
) -> Vec<NodeIndex> {
    forward_path
        .iter()
        .copied()
        .chain(backward_path[..k].iter().rev().copied())
        .collect()
}

fn stitch_backward_meets_forward(
    forward_path: &[NodeIndex],
    backward_path: &[NodeIndex],
    k: usize,
) -> Vec<NodeIndex> {
    forward_path[..=k]
        .iter()
        .copied()
        .chain(backward_path[..backward_path.len() - 1].iter().rev().copied())
        .collect()
}

fn ids(embedding: &Embedding, path: &[NodeIndex]) -> Vec<String> {
    path.iter().map(|&idx| embedding.node_at(idx).id.clone()).collect()
}

fn finalize(
    embedding: &Embedding,
    path: Vec<NodeIndex>,
    forward_path: &[NodeIndex],
    backward_path: &[NodeIndex],
    start: NodeIndex,
    end: NodeIndex,
) -> RoutingResult {
    let nodes: Vec<EmbeddedNode> = path.iter().map(|&idx| embedding.node_at(idx).clone()).collect();
    let distance: f64 = nodes.windows(2).map(|w| hyperbolic_distance(&w[0], &w[1])).sum();
    let baseline = hyperbolic_distance(embedding.node_at(start), embedding.node_at(end));
    let stretch = if baseline == 0.0 { 1.0 } else { distance / baseline };
    let meeting_node = path
        .iter()
        .find(|idx| forward_path.contains(idx) && backward_path.contains(idx))
        .map(|&idx| embedding.node_at(idx).id.clone());

    RoutingResult {
        success: true,
        path_length: nodes.len().saturating_sub(1),
        path: nodes,
        forward_path: ids(embedding, forward_path),
        backward_path: ids(embedding, backward_path),
        meeting_node,
        distance,
        stretch,
    }
}

/// Route between two node ids over a completed embedding, via parallel
/// greedy walks from both endpoints.
pub fn route(embedding: &Embedding, start_id: &str, end_id: &str, config: &RouterConfig) -> CoreResult<RoutingResult> {
    if embedding.graph.n() == 0 {
        return Err(CoreError::EmptyGraph);
    }

    let start = embedding
        .graph
        .index_of(start_id)
        .ok_or_else(|| CoreError::NodeNotInEmbedding(start_id.to_string()))?;
    let end = embedding
        .graph
        .index_of(end_id)
        .ok_or_else(|| CoreError::NodeNotInEmbedding(end_id.to_string()))?;

    if start == end {
        let node = embedding.node_at(start).clone();
        return Ok(RoutingResult {
            success: true,
            path: vec![node.clone()],
            forward_path: vec![node.id.clone()],
            backward_path: vec![node.id],
            meeting_node: Some(start_id.to_string()),
            distance: 0.0,
            stretch: 1.0,
            path_length: 0,
        });
    }

    let mut forward_path = vec![start];
    let mut backward_path = vec![end];
    let mut forward_visited: HashSet<NodeIndex> = [start].into_iter().collect();
    let mut backward_visited: HashSet<NodeIndex> = [end].into_iter().collect();

    let max_iterations = config.max_iterations_factor * embedding.graph.n();
    for _ in 0..max_iterations {
        let mut forward_moved = false;
        let mut backward_moved = false;

        let predecessor = if forward_path.len() >= 2 {
            Some(forward_path[forward_path.len() - 2])
        } else {
            None
        };
        if let Some(next) = greedy_next_hop(embedding, *forward_path.last().unwrap(), end, &forward_visited, predecessor) {
            forward_path.push(next);
            forward_visited.insert(next);
            forward_moved = true;
            if let Some(k) = backward_path.iter().position(|&x| x == next) {
                let path = stitch_forward_meets_backward(&forward_path, &backward_path, k);
                debug!(start = start_id, end = end_id, "forward walk met backward walk");
                return Ok(finalize(embedding, path, &forward_path, &backward_path, start, end));
            }
        }

        let predecessor = if backward_path.len() >= 2 {
            Some(backward_path[backward_path.len() - 2])
        } else {
            None
        };
        if let Some(next) = greedy_next_hop(embedding, *backward_path.last().unwrap(), start, &backward_visited, predecessor) {
            backward_path.push(next);
            backward_visited.insert(next);
            backward_moved = true;
            if let Some(k) = forward_path.iter().position(|&x| x == next) {
                let path = stitch_backward_meets_forward(&forward_path, &backward_path, k);
                debug!(start = start_id, end = end_id, "backward walk met forward walk");
                return Ok(finalize(embedding, path, &forward_path, &backward_path, start, end));
            }
        }

        if !forward_moved && !backward_moved {
            break;
        }
    }

    warn!(start = start_id, end = end_id, "routing stalled without meeting");
    Ok(failure(ids(embedding, &forward_path), ids(embedding, &backward_path)))
}
