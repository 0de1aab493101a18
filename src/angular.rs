//! Two-phase angular coordinate assignment.
//!
//! Phase 1 anchors the `K` highest-degree nodes via local gradient ascent
//! on the HyperMap connection-probability log-likelihood, restricted to
//! the anchor set itself (`O(K^2 * rounds)`). Phase 2 places the
//! remaining long tail by streaming circular-mean placement against
//! already-placed neighbors (`O(N * meanDeg)`), so total cost stays
//! `O(K^2) + O(|E|)` rather than `O(N^2)` (spec §4.6).

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, trace};

use crate::config::EmbeddingConfig;
use crate::graph::{Graph, NodeIndex};
use crate::stats::NetworkStats;

/// Reduce `theta` to `(-pi, pi]`.
pub fn normalize(theta: f64) -> f64 {
    let two_pi = 2.0 * PI;
    let mut t = theta % two_pi;
    if t <= -PI {
        t += two_pi;
    } else if t > PI {
        t -= two_pi;
    }
    t
}

fn angular_separation(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    diff.min(2.0 * PI - diff)
}

/// One anchor's state used by the restricted phase-1 likelihood/gradient.
#[derive(Clone, Copy)]
struct Anchor {
    kappa: f64,
    theta: f64,
}

fn connection_probability(n: f64, mu: f64, beta: f64, delta_theta: f64, kappa_i: f64, kappa_j: f64) -> f64 {
    let chi = n * delta_theta / (2.0 * PI * mu * kappa_i * kappa_j);
    let p = 1.0 / (chi.powf(beta) + 1.0);
    p.clamp(1e-10, 1.0 - 1e-10)
}

/// `L_i(theta)` restricted to the anchor set, excluding `i` itself.
#[allow(clippy::too_many_arguments)]
fn local_log_likelihood(
    theta: f64,
    i: usize,
    kappa_i: f64,
    anchors: &[Anchor],
    adjacent: &[bool],
    n: f64,
    mu: f64,
    beta: f64,
) -> f64 {
    let mut l = 0.0;
    for (j, anchor) in anchors.iter().enumerate() {
        if j == i {
            continue;
        }
        let delta_theta = angular_separation(theta, anchor.theta);
        let p_hat = connection_probability(n, mu, beta, delta_theta, kappa_i, anchor.kappa);
        l += if adjacent[j] {
            p_hat.ln()
        } else {
            (1.0 - p_hat).ln()
        };
    }
    l
}

/// `dL_i/dtheta` restricted to the anchor set, excluding `i` itself.
#[allow(clippy::too_many_arguments)]
fn local_gradient(
    theta: f64,
    i: usize,
    kappa_i: f64,
    anchors: &[Anchor],
    adjacent: &[bool],
    n: f64,
    mu: f64,
    beta: f64,
) -> f64 {
    let mut grad = 0.0;
    for (j, anchor) in anchors.iter().enumerate() {
        if j == i {
            continue;
        }
        // normalize(theta - theta_j) folds the wraparound at +-pi into the
        // sign of a single principal-range difference, which is exactly
        // the "reversed sign past the wrap" rule in the spec's gradient
        // closed form.
        let raw_diff = normalize(theta - anchor.theta);
        let delta_theta = raw_diff.abs();
        let sign = if raw_diff > 0.0 {
            1.0
        } else if raw_diff < 0.0 {
            -1.0
        } else {
            0.0
        };

        let kappa_j = anchor.kappa;
        let denom = 2.0 * PI * mu * kappa_i * kappa_j;
        let chi = n * delta_theta / denom;
        let dchi_dtheta = sign * n / denom;

        let chi_beta = chi.powf(beta);
        let dp_dchi = -beta * chi.powf(beta - 1.0) * (chi_beta + 1.0).recip().powi(2);

        let p_hat = (1.0 / (chi_beta + 1.0)).clamp(1e-10, 1.0 - 1e-10);
        let dl_dp = if adjacent[j] { 1.0 / p_hat } else { -1.0 / (1.0 - p_hat) };

        grad += dl_dp * dp_dchi * dchi_dtheta;
    }
    grad
}

/// Gradient-ascent result for one starting angle.
struct AscentResult {
    theta: f64,
    log_likelihood: f64,
}

#[allow(clippy::too_many_arguments)]
fn gradient_ascent(
    start: f64,
    i: usize,
    kappa_i: f64,
    anchors: &[Anchor],
    adjacent: &[bool],
    n: f64,
    mu: f64,
    beta: f64,
    config: &EmbeddingConfig,
) -> AscentResult {
    let (lr_min, lr_max) = config.learning_rate_bounds;
    let mut lr = config.initial_learning_rate;
    let mut theta = start;
    let mut prev_grad_sign: Option<f64> = None;
    let mut best_theta = theta;
    let mut best_l = local_log_likelihood(theta, i, kappa_i, anchors, adjacent, n, mu, beta);
    let mut small_step_streak = 0usize;

    for _ in 0..config.max_ascent_iterations {
        let grad = local_gradient(theta, i, kappa_i, anchors, adjacent, n, mu, beta);
        if grad.abs() < config.gradient_tolerance {
            break;
        }

        let grad_sign = grad.signum();
        if let Some(prev) = prev_grad_sign {
            if prev != 0.0 && grad_sign != 0.0 && prev != grad_sign {
                lr = (lr * 0.5).clamp(lr_min, lr_max);
            }
        }
        prev_grad_sign = Some(grad_sign);

        let raw_step = lr * grad;
        let clamped_step = raw_step.clamp(-config.max_step, config.max_step);
        theta = normalize(theta + clamped_step);

        let l = local_log_likelihood(theta, i, kappa_i, anchors, adjacent, n, mu, beta);
        if l > best_l {
            best_l = l;
            best_theta = theta;
        }

        if clamped_step.abs() < 0.1 * config.gradient_tolerance {
            small_step_streak += 1;
            if small_step_streak > config.small_step_patience {
                break;
            }
        } else {
            small_step_streak = 0;
        }
    }

    AscentResult { theta: best_theta, log_likelihood: best_l }
}

/// Optimize `theta` for each node. Returns angles indexed the same as
/// `graph`'s node indices.
pub fn assign_angles(
    graph: &Graph,
    stats: &NetworkStats,
    kappa: &[f64],
    config: &EmbeddingConfig,
    rng: &mut StdRng,
) -> Vec<f64> {
    let n = graph.n();
    let mut theta = vec![0.0; n];

    let mut order: Vec<NodeIndex> = (0..n as NodeIndex).collect();
    order.sort_by(|&a, &b| {
        graph.degree[b as usize]
            .cmp(&graph.degree[a as usize])
            .then(a.cmp(&b))
    });

    let k = config.anchor_set_size.min(n);
    let anchor_ids = &order[..k];
    let tail_ids = &order[k..];

    // Phase 1: even circular spread, then K rounds of restricted ascent.
    let mut anchors: Vec<Anchor> = anchor_ids
        .iter()
        .enumerate()
        .map(|(i, &idx)| Anchor {
            kappa: kappa[idx as usize],
            theta: normalize(-PI + 2.0 * PI * i as f64 / k as f64),
        })
        .collect();

    // Precompute adjacency flags between anchors (K x K), reused across rounds.
    let mut adjacency_flags = vec![vec![false; k]; k];
    for (i, &u) in anchor_ids.iter().enumerate() {
        for (j, &v) in anchor_ids.iter().enumerate() {
            if i != j && graph.adj[u as usize].contains(&v) {
                adjacency_flags[i][j] = true;
            }
        }
    }

    debug!(k, rounds = config.phase1_rounds, "phase 1: optimizing anchor angles");
    for round in 0..config.phase1_rounds {
        for i in 0..k {
            let kappa_i = anchors[i].kappa;
            let start = anchors[i].theta;
            let adjacent = &adjacency_flags[i];

            let mut result = gradient_ascent(
                start, i, kappa_i, &anchors, adjacent, n as f64, stats.mu, stats.beta, config,
            );

            if config.dual_solution_search {
                let antipodal = normalize(start + PI);
                let alt = gradient_ascent(
                    antipodal, i, kappa_i, &anchors, adjacent, n as f64, stats.mu, stats.beta, config,
                );
                if alt.log_likelihood > result.log_likelihood {
                    result = alt;
                }
            }

            anchors[i].theta = result.theta;
        }
        trace!(round, "phase 1 sweep complete");
    }

    for (i, &idx) in anchor_ids.iter().enumerate() {
        theta[idx as usize] = anchors[i].theta;
    }

    // Phase 2: streaming circular mean over already-placed neighbors.
    debug!(tail = tail_ids.len(), batch = config.phase2_batch_size, "phase 2: placing remaining nodes");
    let mut placed = vec![false; n];
    for &idx in anchor_ids {
        placed[idx as usize] = true;
    }

    for batch in tail_ids.chunks(config.phase2_batch_size) {
        for &idx in batch {
            let mut sin_sum = 0.0;
            let mut cos_sum = 0.0;
            let mut any = false;
            for &neighbor in &graph.adj[idx as usize] {
                if placed[neighbor as usize] {
                    sin_sum += theta[neighbor as usize].sin();
                    cos_sum += theta[neighbor as usize].cos();
                    any = true;
                }
            }
            theta[idx as usize] = if any {
                normalize(sin_sum.atan2(cos_sum))
            } else {
                normalize(rng.gen_range(-PI..=PI))
            };
            placed[idx as usize] = true;
        }
    }

    theta
}

/// Even circular spread for the first `k` anchors, exposed separately so
/// the pre-optimization invariant (spec §8 item 5) can be tested without
/// running the full ascent.
pub fn initial_anchor_angles(k: usize) -> Vec<f64> {
    (0..k).map(|i| normalize(-PI + 2.0 * PI * i as f64 / k as f64)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_reduces_to_principal_range() {
        assert!((normalize(3.0 * PI) - PI).abs() < 1e-12);
        assert!((normalize(-3.0 * PI) - PI).abs() < 1e-12);
        assert!(normalize(0.5) > -PI && normalize(0.5) <= PI);
    }

    #[test]
    fn initial_anchor_spread_is_distinct_and_partitions_circle() {
        let k = 8;
        let angles = initial_anchor_angles(k);
        let mut sorted = angles.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for w in sorted.windows(2) {
            assert!((w[1] - w[0] - 2.0 * PI / k as f64).abs() < 1e-9);
        }
        for &t in &angles {
            assert!(t > -PI && t <= PI);
        }
    }

    #[test]
    fn gradient_ascent_never_decreases_local_likelihood() {
        let anchors = vec![
            Anchor { kappa: 2.0, theta: 0.0 },
            Anchor { kappa: 2.0, theta: 1.0 },
            Anchor { kappa: 2.0, theta: -2.0 },
        ];
        let adjacent = vec![false, true, false];
        let config = EmbeddingConfig::default();
        let start = 2.5;
        let start_l = local_log_likelihood(start, 0, 2.0, &anchors, &adjacent, 10.0, 1.5, 2.0);
        let result = gradient_ascent(start, 0, 2.0, &anchors, &adjacent, 10.0, 1.5, 2.0, &config);
        assert!(result.log_likelihood >= start_l - 1e-9);
    }

    #[test]
    fn all_emitted_angles_are_normalized() {
        use crate::edge_parser::parse_edges;
        use crate::graph::build_graph;
        use crate::kappa::assign_kappa;
        use crate::stats::estimate_stats;
        use rand::SeedableRng;

        let g = build_graph(&parse_edges("s,t\nA,B\nB,C\nC,A\nC,D\nD,E").unwrap()).unwrap();
        let stats = estimate_stats(&g).unwrap();
        let kappa = assign_kappa(&g, &stats);
        let config = EmbeddingConfig { anchor_set_size: 2, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(config.seed);
        let angles = assign_angles(&g, &stats, &kappa, &config, &mut rng);
        for &t in &angles {
            assert!(t > -PI && t <= PI);
        }
    }
}
