//! Tunables for the embedding and routing pipeline.
//!
//! Mirrors the teacher's `PIEConfig`/`LandmarkConfig` pattern: a plain
//! struct with a documented `Default`, no config-file or env parsing.

/// Knobs for [`crate::embedding::EmbeddingDriver`].
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Size of the phase-1 high-degree anchor set, `K = min(anchor_set_size, N)`.
    pub anchor_set_size: usize,
    /// Number of gradient-ascent sweeps over the anchor set in phase 1.
    pub phase1_rounds: usize,
    /// Maximum gradient-ascent iterations per node, per round.
    pub max_ascent_iterations: usize,
    /// Initial learning rate for gradient ascent.
    pub initial_learning_rate: f64,
    /// Learning-rate clamp bounds `[min, max]`.
    pub learning_rate_bounds: (f64, f64),
    /// Per-step clamp on `|lr * gradient|`.
    pub max_step: f64,
    /// Gradient-magnitude early-stop tolerance.
    pub gradient_tolerance: f64,
    /// Consecutive-small-step early-stop count.
    pub small_step_patience: usize,
    /// Phase-2 batch size for streaming circular-mean placement.
    pub phase2_batch_size: usize,
    /// When true, phase 1 also tries the antipodal start `theta + pi` and
    /// keeps whichever of the two local optima has higher log-likelihood.
    /// Applied uniformly to every phase-1 node in every round (spec §9).
    pub dual_solution_search: bool,
    /// Seed for the embedding's PRNG (phase-1 tail init, phase-2 isolated
    /// nodes). Fixed by default so embeddings are reproducible (S5).
    pub seed: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            anchor_set_size: 500,
            phase1_rounds: 6,
            max_ascent_iterations: 100,
            initial_learning_rate: 0.1,
            learning_rate_bounds: (0.001, 0.2),
            max_step: 0.1,
            gradient_tolerance: 2e-4,
            small_step_patience: 5,
            phase2_batch_size: 100,
            dual_solution_search: false,
            seed: 0,
        }
    }
}

/// Knobs for [`crate::router::BidirectionalRouter`].
#[derive(Debug, Clone, Copy)]
pub struct RouterConfig {
    /// Hard cap on main-loop iterations, as a multiple of node count.
    /// The termination guarantee (spec §4.8) bounds this at `N`, this
    /// exists only as a defensive backstop against a malformed adjacency.
    pub max_iterations_factor: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_iterations_factor: 1,
        }
    }
}
