//! Radial coordinate assignment.

use crate::stats::NetworkStats;

/// `r(kappa) = R - 2*ln(kappa/kappa0)`. Non-negative because `kappa >= kappa0`.
pub fn assign_radius(kappa: &[f64], stats: &NetworkStats) -> Vec<f64> {
    kappa
        .iter()
        .map(|&k| stats.r - 2.0 * (k / stats.kappa0).ln())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge_parser::parse_edges;
    use crate::graph::build_graph;
    use crate::kappa::assign_kappa;
    use crate::stats::estimate_stats;

    #[test]
    fn radius_is_non_negative_and_bounded_by_r() {
        let g = build_graph(&parse_edges("s,t\nA,B\nB,C\nC,A").unwrap()).unwrap();
        let stats = estimate_stats(&g).unwrap();
        let kappa = assign_kappa(&g, &stats);
        let radius = assign_radius(&kappa, &stats);
        for &r in &radius {
            assert!(r >= -1e-9);
            assert!(r <= stats.r + 1e-9);
        }
    }
}
