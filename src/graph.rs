//! Undirected graph built from a parsed edge list.
//!
//! Node identifiers are interned to dense `u32` indices in first-seen
//! order, the same "handle, not clone-the-string" idiom the teacher's
//! `GPRouter`/`RicciGraph` use for their node maps — here tightened to a
//! dense index because the embedding and router sit on the hot path
//! (spec §5: prefer packed arrays over associative lookups).

use std::collections::{HashMap, HashSet};

use crate::edge_parser::Edge;
use crate::error::CoreResult;

pub type NodeIndex = u32;

/// An undirected graph: distinct node ids in first-seen order, symmetric
/// adjacency, and per-node degree.
#[derive(Debug, Clone)]
pub struct Graph {
    pub ids: Vec<String>,
    pub adj: Vec<HashSet<NodeIndex>>,
    pub degree: Vec<u32>,
}

impl Graph {
    pub fn n(&self) -> usize {
        self.ids.len()
    }

    pub fn id(&self, idx: NodeIndex) -> &str {
        &self.ids[idx as usize]
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.ids.iter().position(|x| x == id).map(|i| i as NodeIndex)
    }
}

/// Build a [`Graph`] from edges. Self-loops are dropped; duplicate edges
/// collapse via set semantics; `v ∈ adj[u] ⇔ u ∈ adj[v]` by construction.
/// An empty edge list is a legal input and yields an empty [`Graph`], not
/// an error.
pub fn build_graph(edges: &[Edge]) -> CoreResult<Graph> {
    let mut index_of: HashMap<String, NodeIndex> = HashMap::new();
    let mut ids: Vec<String> = Vec::new();
    let mut adj: Vec<HashSet<NodeIndex>> = Vec::new();

    let intern = |id: &str, index_of: &mut HashMap<String, NodeIndex>, ids: &mut Vec<String>, adj: &mut Vec<HashSet<NodeIndex>>| -> NodeIndex {
        if let Some(&idx) = index_of.get(id) {
            return idx;
        }
        let idx = ids.len() as NodeIndex;
        ids.push(id.to_string());
        adj.push(HashSet::new());
        index_of.insert(id.to_string(), idx);
        idx
    };

    for edge in edges {
        let u = intern(&edge.source, &mut index_of, &mut ids, &mut adj);
        let v = intern(&edge.target, &mut index_of, &mut ids, &mut adj);
        if u == v {
            continue;
        }
        adj[u as usize].insert(v);
        adj[v as usize].insert(u);
    }

    let degree = adj.iter().map(|s| s.len() as u32).collect();
    Ok(Graph { ids, adj, degree })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge_parser::parse_edges;

    fn graph(text: &str) -> Graph {
        build_graph(&parse_edges(text).unwrap()).unwrap()
    }

    #[test]
    fn undirected_adjacency_invariant() {
        let g = graph("s,t\nA,B\nB,C");
        for u in 0..g.n() as NodeIndex {
            for &v in &g.adj[u as usize] {
                assert!(g.adj[v as usize].contains(&u));
            }
        }
    }

    #[test]
    fn self_loops_dropped() {
        let g = graph("s,t\nA,A\nA,B");
        assert_eq!(g.n(), 2);
        assert!(!g.adj[g.index_of("A").unwrap() as usize].contains(&g.index_of("A").unwrap()));
    }

    #[test]
    fn duplicate_edges_collapse() {
        let g = graph("s,t\nA,B\nA,B\nB,A");
        assert_eq!(g.degree[g.index_of("A").unwrap() as usize], 1);
    }

    #[test]
    fn degree_equals_adjacency_size_and_sums_to_twice_edges() {
        let g = graph("s,t\nA,B\nB,C\nC,A");
        for v in 0..g.n() {
            assert_eq!(g.degree[v] as usize, g.adj[v].len());
        }
        let sum: u32 = g.degree.iter().sum();
        assert_eq!(sum, 6); // 3 edges, undirected => 2*3
    }

    #[test]
    fn empty_edge_list_is_a_legal_empty_graph() {
        let g = build_graph(&[]).unwrap();
        assert_eq!(g.n(), 0);
        assert!(g.ids.is_empty());
        assert!(g.degree.is_empty());
    }

    #[test]
    fn first_seen_order_preserved() {
        let g = graph("s,t\nZ,Y\nA,B");
        assert_eq!(g.ids, vec!["Z", "Y", "A", "B"]);
    }
}
