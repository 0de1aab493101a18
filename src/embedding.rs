//! Orchestrates the embedding pipeline end to end.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

use crate::angular::assign_angles;
use crate::config::EmbeddingConfig;
use crate::edge_parser::parse_edges;
use crate::error::CoreResult;
use crate::graph::{build_graph, Graph};
use crate::kappa::assign_kappa;
use crate::radial::assign_radius;
use crate::stats::{estimate_stats, NetworkStats};

/// A node placed in the hyperbolic disc, with its hidden parameters.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbeddedNode {
    pub id: String,
    pub r: f64,
    pub theta: f64,
    pub kappa: f64,
    pub degree: u32,
}

/// The full output of the pipeline: nodes sorted by descending degree,
/// the derived stats, and the adjacency they were embedded against.
#[derive(Debug, Clone)]
pub struct Embedding {
    pub nodes: Vec<EmbeddedNode>,
    pub stats: NetworkStats,
    pub graph: Graph,
    /// `graph` node index -> position in `nodes`, for routing lookups.
    pos_by_graph_index: Vec<usize>,
}

impl Embedding {
    /// The [`EmbeddedNode`] for a given node id, if present.
    pub fn node(&self, id: &str) -> Option<&EmbeddedNode> {
        let idx = self.graph.index_of(id)?;
        self.nodes.get(self.pos_by_graph_index[idx as usize])
    }

    /// The [`EmbeddedNode`] at the given `graph` node index.
    pub fn node_at(&self, idx: crate::graph::NodeIndex) -> &EmbeddedNode {
        &self.nodes[self.pos_by_graph_index[idx as usize]]
    }

    /// Assemble an [`Embedding`] from a graph and already-computed nodes,
    /// for routing over coordinates that did not come from [`embed_graph`]
    /// (e.g. hand-assigned coordinates in a test, or stats the pipeline
    /// would otherwise reject as degenerate). `stats` need not derive from
    /// `graph`/`nodes`; the router only reads `graph` and `nodes`.
    pub fn from_parts(graph: Graph, nodes: Vec<EmbeddedNode>, stats: NetworkStats) -> Self {
        let mut pos_by_graph_index = vec![0usize; graph.n()];
        for (pos, node) in nodes.iter().enumerate() {
            if let Some(idx) = graph.index_of(&node.id) {
                pos_by_graph_index[idx as usize] = pos;
            }
        }
        Embedding { nodes, stats, graph, pos_by_graph_index }
    }
}

/// Run the full pipeline from raw edge text to a completed [`Embedding`].
pub fn embed(edge_text: &str, config: &EmbeddingConfig) -> CoreResult<Embedding> {
    let edges = parse_edges(edge_text)?;
    let graph = build_graph(&edges)?;
    embed_graph(graph, config)
}

/// Run the pipeline starting from an already-built [`Graph`], for callers
/// that construct graphs programmatically instead of parsing edge text.
pub fn embed_graph(graph: Graph, config: &EmbeddingConfig) -> CoreResult<Embedding> {
    let stats = estimate_stats(&graph)?;
    let kappa = assign_kappa(&graph, &stats);
    let radius = assign_radius(&kappa, &stats);

    let mut rng = StdRng::seed_from_u64(config.seed);
    let theta = assign_angles(&graph, &stats, &kappa, config, &mut rng);

    let mut order: Vec<usize> = (0..graph.n()).collect();
    order.sort_by(|&a, &b| {
        graph.degree[b]
            .cmp(&graph.degree[a])
            .then(a.cmp(&b))
    });

    let mut pos_by_graph_index = vec![0usize; graph.n()];
    let nodes = order
        .into_iter()
        .enumerate()
        .map(|(pos, i)| {
            pos_by_graph_index[i] = pos;
            EmbeddedNode {
                id: graph.id(i as u32).to_string(),
                r: radius[i],
                theta: theta[i],
                kappa: kappa[i],
                degree: graph.degree[i],
            }
        })
        .collect();

    info!(n = stats.n, "embedding complete");
    Ok(Embedding { nodes, stats, graph, pos_by_graph_index })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_are_sorted_by_descending_degree() {
        let e = embed("s,t\nA,B\nB,C\nC,A", &EmbeddingConfig::default()).unwrap();
        for w in e.nodes.windows(2) {
            assert!(w[0].degree >= w[1].degree);
        }
    }

    #[test]
    fn idempotent_on_fixed_seed() {
        let config = EmbeddingConfig::default();
        let a = embed("s,t\nA,B\nB,C\nC,A\nC,D\nD,E\nE,F\nF,A", &config).unwrap();
        let b = embed("s,t\nA,B\nB,C\nC,A\nC,D\nD,E\nE,F\nF,A", &config).unwrap();
        assert_eq!(a.stats, b.stats);
        for (na, nb) in a.nodes.iter().zip(b.nodes.iter()) {
            assert_eq!(na, nb);
        }
    }

    #[test]
    fn every_node_has_normalized_theta_and_floored_kappa() {
        use std::f64::consts::PI;
        let e = embed("s,t\nA,B\nB,C\nC,A", &EmbeddingConfig::default()).unwrap();
        for n in &e.nodes {
            assert!(n.theta > -PI && n.theta <= PI);
            assert!(n.kappa >= e.stats.kappa0 - 1e-9);
        }
    }

    #[test]
    fn header_only_input_is_a_legal_empty_embedding() {
        let e = embed("source,target\n", &EmbeddingConfig::default()).unwrap();
        assert!(e.nodes.is_empty());
        assert_eq!(e.stats.n, 0);
        assert!(e.stats.k_bar.is_nan());
        assert!(e.stats.gamma.is_nan());
        assert!(e.stats.clustering.is_nan());
        assert!(e.stats.beta.is_nan());
        assert!(e.stats.kappa0.is_nan());
        assert!(e.stats.mu.is_nan());
        assert!(e.stats.r.is_nan());
    }
}
