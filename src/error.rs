//! Error taxonomy for the embedding and routing core.

use thiserror::Error;

/// Errors surfaced by graph parsing, stats estimation, embedding and routing.
///
/// Numerical domain violations inside the likelihood or the `acosh` are
/// clamped silently (see `router::hyperbolic_distance`) and are not errors.
/// A routing walk that stalls without meeting is reported via
/// `RoutingResult::success = false`, not as an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("edge text is malformed: {0}")]
    MalformedInput(String),

    #[error("stats are degenerate: beta={beta}, kappa0={kappa0}")]
    DegenerateStats { beta: f64, kappa0: f64 },

    /// An empty edge list builds a legal, empty `Graph`/`Embedding` (N=0,
    /// stats fields NaN); this variant only fires when routing is asked to
    /// run against one, which is undefined.
    #[error("cannot route: embedding has zero nodes")]
    EmptyGraph,

    #[error("node {0:?} is not present in the embedding")]
    NodeNotInEmbedding(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
