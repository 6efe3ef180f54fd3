//! Errors surfaced by diagram construction.

use std::fmt;

use crate::geometry::Point;

/// Errors surfaced by the divide-and-conquer builder.
///
/// Every variant except `NonFiniteSite` signals a violated algorithmic
/// invariant. The merge that hits one is abandoned; no partial diagram is
/// returned.
#[derive(Clone, Debug, PartialEq)]
pub enum VoronoiError {
    /// Input coordinate at `index` is NaN or infinite.
    NonFiniteSite { index: usize },
    /// The merged hull has no left/right transition.
    NoCrossEdge { depth: usize },
    /// The chain between `left` and `right` found no next crossing before
    /// reaching the lower tangent.
    NoIntersection {
        left: Point,
        right: Point,
        chain_len: usize,
        depth: usize,
    },
    /// The chain exceeded its iteration bound without reaching the lower tangent.
    ChainOverrun { limit: usize, depth: usize },
}

impl fmt::Display for VoronoiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoronoiError::NonFiniteSite { index } => {
                write!(f, "site {index} has a non-finite coordinate")
            }
            VoronoiError::NoCrossEdge { depth } => write!(
                f,
                "merged hull at depth {depth} has no left/right transition"
            ),
            VoronoiError::NoIntersection {
                left,
                right,
                chain_len,
                depth,
            } => write!(
                f,
                "no next crossing for bisector of ({}, {}) and ({}, {}) after {} chain edges at depth {}",
                left.x, left.y, right.x, right.y, chain_len, depth
            ),
            VoronoiError::ChainOverrun { limit, depth } => write!(
                f,
                "bisector chain at depth {depth} did not reach the lower tangent within {limit} steps"
            ),
        }
    }
}

impl std::error::Error for VoronoiError {}
