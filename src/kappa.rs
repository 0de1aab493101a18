//! Hidden expected-degree parameter assignment.

use crate::graph::Graph;
use crate::stats::NetworkStats;

/// `kappa[v] = max(kappa0, degree[v] - gamma/beta)`, floored at `kappa0`
/// to keep the connection-probability model non-singular.
pub fn assign_kappa(graph: &Graph, stats: &NetworkStats) -> Vec<f64> {
    let shift = stats.gamma / stats.beta;
    graph
        .degree
        .iter()
        .map(|&d| (d as f64 - shift).max(stats.kappa0))
        .collect()
}
