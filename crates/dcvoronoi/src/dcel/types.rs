//! Arena records and their typed ids.
//!
//! Kept small and explicit; all cross-references are ids into the owning
//! `Dcel`, never references.

use crate::geometry::Point;

/// Identifier types for clarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// An input location whose cell is being computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Site {
    pub pos: Point,
    /// Any incident edge, used as a traversal start. `None` until the first
    /// bisector touching this site is built.
    pub edge: Option<EdgeId>,
}

/// An edge endpoint.
///
/// Infinite vertices are ray placeholders: `pos` is a finite point far along
/// the ray direction, `infinite` marks that the position carries no
/// geometric constraint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub pos: Point,
    /// The edge owning this endpoint.
    pub edge: EdgeId,
    pub infinite: bool,
}

/// Bisector segment between two sites, directed `start → end` with `left`
/// on its left-hand side.
///
/// Invariant: `left`/`right` are fixed at creation; merges only move the
/// endpoints and rewire the neighbor links.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub left: SiteId,
    pub right: SiteId,
    pub start: VertexId,
    pub end: VertexId,
    pub cw_predecessor: Option<EdgeId>,
    pub ccw_predecessor: Option<EdgeId>,
    pub cw_successor: Option<EdgeId>,
    pub ccw_successor: Option<EdgeId>,
}

impl Edge {
    #[inline]
    pub fn touches(&self, site: SiteId) -> bool {
        self.left == site || self.right == site
    }

    /// The site across this edge from `site`.
    #[inline]
    pub fn other_site(&self, site: SiteId) -> SiteId {
        if self.left == site {
            self.right
        } else {
            self.left
        }
    }
}
