//! Merge of two solved sub-diagrams.
//!
//! Purpose
//! - Combine the diagrams of a left and a right block of sites (split on the
//!   `x`-sorted input) into the diagram of their union.
//!
//! Stages
//! - `hull`: angular sort around the left block's left-top site and a Graham
//!   scan that keeps collinear boundary sites.
//! - `tangent`: upper/lower cross edges from the left/right transitions on
//!   that hull.
//! - `chain`: the separating bisector chain, grown from the upper to the
//!   lower cross edge and spliced into both sub-diagrams.
//! - `prune`: removal of sub-diagram edges that ended up on the wrong side
//!   of the chain.
//!
//! Per-merge state (which block a site belongs to, which edges the chain
//! consumed) lives in this module's local structures, never on the arena
//! records, so sub-diagrams stay independent of each other.

pub mod chain;
pub mod hull;
pub mod intersect;
pub mod prune;
pub mod tangent;

use std::ops::Range;

use crate::dcel::{Dcel, EdgeId, SiteId};
use crate::error::VoronoiError;
use crate::geometry::Frame;
use crate::observer::{MergeObserver, MergeView};

pub use chain::{build_chain, Chain};
pub use hull::{graham_scan, left_top, sort_ccw};
pub use intersect::{intersect_edges, intersect_segments, Crossing, Intersection, Segment};
pub use prune::prune;
pub use tangent::{locate_cross_edges, CrossEdges, SitePair};

/// Which sub-diagram a site or edge came from during one merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// The unit of recursion: a contiguous block of sites and its edge list.
#[derive(Clone, Debug, Default)]
pub struct SubDiagram {
    pub sites: Range<usize>,
    pub edges: Vec<EdgeId>,
}

impl SubDiagram {
    /// Base case: one site, no edges.
    pub fn single(site: usize) -> Self {
        Self {
            sites: site..site + 1,
            edges: Vec::new(),
        }
    }

    pub fn site_ids(&self) -> impl Iterator<Item = SiteId> {
        self.sites.clone().map(SiteId)
    }
}

/// Side map for one merge. Blocks are contiguous, so membership is a
/// comparison against the split index.
#[derive(Clone, Copy, Debug)]
pub struct Split {
    pub lo: usize,
    pub mid: usize,
    pub hi: usize,
}

impl Split {
    #[inline]
    pub fn side_of(&self, site: SiteId) -> Side {
        debug_assert!(self.lo <= site.0 && site.0 < self.hi);
        if site.0 < self.mid {
            Side::Left
        } else {
            Side::Right
        }
    }
    #[inline]
    pub fn is_left(&self, site: SiteId) -> bool {
        self.side_of(site) == Side::Left
    }
}

/// Numeric context shared by every merge of one run.
#[derive(Clone, Copy, Debug)]
pub struct MergeCtx {
    /// Placeholder length for infinite ray endpoints.
    pub reach: f64,
    pub precision: f64,
    /// Recursion depth of this merge (root is 0).
    pub depth: usize,
    /// Where the arena's coordinates sit in input space.
    pub frame: Frame,
}

/// Merge `left` and `right` (adjacent blocks, `left` first) into one diagram.
pub fn merge<O: MergeObserver + ?Sized>(
    dcel: &mut Dcel,
    left: SubDiagram,
    right: SubDiagram,
    ctx: MergeCtx,
    obs: &mut O,
) -> Result<SubDiagram, VoronoiError> {
    debug_assert_eq!(left.sites.end, right.sites.start);
    let split = Split {
        lo: left.sites.start,
        mid: left.sites.end,
        hi: right.sites.end,
    };
    let SubDiagram {
        edges: mut left_edges,
        ..
    } = left;
    let SubDiagram {
        edges: mut right_edges,
        ..
    } = right;

    let pos = |s: SiteId| dcel.site_pos(s);
    let pivot = left_top((split.lo..split.mid).map(SiteId), pos)
        .ok_or(VoronoiError::NoCrossEdge { depth: ctx.depth })?;
    let hull = graham_scan(
        pivot,
        (split.lo..split.hi).map(SiteId).collect(),
        pos,
        ctx.precision,
    );
    let cross = locate_cross_edges(&hull, |s| split.is_left(s))
        .ok_or(VoronoiError::NoCrossEdge { depth: ctx.depth })?;
    tracing::debug!(
        depth = ctx.depth,
        left_sites = split.mid - split.lo,
        right_sites = split.hi - split.mid,
        hull = hull.len(),
        top = ?cross.top,
        bottom = ?cross.bottom,
        "merge"
    );
    obs.hull_merged(
        &MergeView {
            dcel: &*dcel,
            left: &left_edges,
            right: &right_edges,
            chain: &[],
            depth: ctx.depth,
            frame: ctx.frame,
        },
        &hull,
        &cross,
    );

    let chain = build_chain(dcel, &left_edges, &right_edges, split, cross, ctx, obs)?;

    let removed = prune(
        dcel,
        &mut left_edges,
        &mut right_edges,
        &chain.edges,
        ctx.precision,
    );
    tracing::debug!(
        depth = ctx.depth,
        chain = chain.edges.len(),
        consumed = chain.consumed.len(),
        pruned = removed.len(),
        "merge done"
    );
    obs.pruned(
        &MergeView {
            dcel: &*dcel,
            left: &left_edges,
            right: &right_edges,
            chain: &chain.edges,
            depth: ctx.depth,
            frame: ctx.frame,
        },
        &removed,
    );

    let mut edges = left_edges;
    edges.extend_from_slice(&chain.edges);
    edges.extend(right_edges);
    Ok(SubDiagram {
        sites: split.lo..split.hi,
        edges,
    })
}
