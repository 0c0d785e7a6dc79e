//! Error types for graph construction and parameter validation.

use thiserror::Error;

use crate::graph::Vertex;

/// Result type for spanner operations.
pub type Result<T> = std::result::Result<T, SpannerError>;

/// Errors raised before any computation begins.
///
/// Unreachable pairs are never errors; they show up as infinite stretch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpannerError {
    /// An edge endpoint lies outside `[0, nvertices)`.
    #[error("vertex {vertex} out of range for a graph on {nvertices} vertices")]
    VertexOutOfRange { vertex: Vertex, nvertices: usize },

    /// Simple graphs have no self-loops.
    #[error("self-loop at vertex {0}")]
    SelfLoop(Vertex),

    #[error("edge probability {0} outside [0, 1]")]
    InvalidProbability(f64),

    #[error("stretch parameter k={k} must be at least {min}")]
    StretchParameterTooSmall { k: u32, min: u32 },

    /// `k` beyond `ln n` gives no useful size guarantee.
    #[error("stretch parameter k={k} invalid for n={n}: k must be at most ln({n}) = {max}")]
    StretchParameterTooLarge { k: u32, n: usize, max: u32 },

    #[error("graph needs more than {min} vertices, got {n}")]
    TooFewVertices { n: usize, min: usize },
}
