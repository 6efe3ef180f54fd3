//! The separating bisector chain of one merge.
//!
//! Starting at the upper cross edge, each step builds the perpendicular
//! bisector of the current pair `(left, right)`, finds the highest point
//! where it crosses an edge of `left`'s cell (in the left sub-diagram) or
//! `right`'s cell (in the right sub-diagram), trims both edges there, and
//! moves the pair across the crossed edge. The chain ends when the pair
//! equals the lower cross edge; its last bisector stays unbounded below.
//!
//! Orientation conventions
//! - A bisector runs upward with `left` on its left: direction is
//!   `perp(right − left)`.
//! - The first bisector is infinite at both ends. Later ones end (finite) at
//!   the previous crossing and start at an infinite placeholder below it.

use crate::dcel::{Dcel, EdgeId};
use crate::error::VoronoiError;
use crate::geometry::{ccw, less_y_first, perp, Point};
use crate::observer::{MergeObserver, MergeView};

use super::intersect::{intersect_edges, Crossing, Intersection};
use super::tangent::{CrossEdges, SitePair};
use super::{MergeCtx, Side, Split};

/// Result of chain construction.
#[derive(Clone, Debug, Default)]
pub struct Chain {
    /// Bisectors from top to bottom.
    pub edges: Vec<EdgeId>,
    /// Sub-diagram edges the chain crossed, in crossing order.
    pub consumed: Vec<EdgeId>,
}

/// Grow the chain from `cross.top` down to `cross.bottom`, splicing it into
/// the arena.
pub fn build_chain<O: MergeObserver + ?Sized>(
    dcel: &mut Dcel,
    left_edges: &[EdgeId],
    right_edges: &[EdgeId],
    split: Split,
    cross: CrossEdges,
    ctx: MergeCtx,
    obs: &mut O,
) -> Result<Chain, VoronoiError> {
    ChainBuilder {
        dcel,
        left_edges,
        right_edges,
        split,
        ctx,
        chain: Chain::default(),
    }
    .run(cross, obs)
}

struct ChainBuilder<'a> {
    dcel: &'a mut Dcel,
    left_edges: &'a [EdgeId],
    right_edges: &'a [EdgeId],
    split: Split,
    ctx: MergeCtx,
    chain: Chain,
}

impl ChainBuilder<'_> {
    fn run<O: MergeObserver + ?Sized>(
        mut self,
        cross: CrossEdges,
        obs: &mut O,
    ) -> Result<Chain, VoronoiError> {
        // Each step consumes one sub-diagram edge; allow every edge to be
        // crossed from both of its cells before giving up.
        let limit = 2 * (self.left_edges.len() + self.right_edges.len()) + 2;
        let mut pair = cross.top;
        let mut bisector = self.push_bisector(pair, None);
        let mut last: Option<Intersection> = None;

        loop {
            self.chain.edges.push(bisector);
            self.dcel.claim_site_edge(pair.left, bisector);
            self.dcel.claim_site_edge(pair.right, bisector);
            if pair == cross.bottom {
                break;
            }
            if self.chain.edges.len() > limit {
                return Err(VoronoiError::ChainOverrun {
                    limit,
                    depth: self.ctx.depth,
                });
            }

            let hit = self
                .next_crossing(bisector, pair, last.as_ref())
                .ok_or_else(|| VoronoiError::NoIntersection {
                    left: self.dcel.site_pos(pair.left),
                    right: self.dcel.site_pos(pair.right),
                    chain_len: self.chain.edges.len(),
                    depth: self.ctx.depth,
                })?;
            tracing::trace!(
                depth = self.ctx.depth,
                pair = ?pair,
                side = ?hit.side,
                x = hit.point.x,
                y = hit.point.y,
                "chain step"
            );
            self.chain.consumed.push(hit.q);
            self.finish_at(bisector, pair, hit.point);

            pair = pair.across(hit.side, self.dcel.edge(hit.q));
            let next = self.push_bisector(pair, Some(hit.point));
            self.splice(bisector, next, &hit);

            obs.chain_step(
                &MergeView {
                    dcel: &*self.dcel,
                    left: self.left_edges,
                    right: self.right_edges,
                    chain: &self.chain.edges,
                    depth: self.ctx.depth,
                    frame: self.ctx.frame,
                },
                self.ctx.frame.to_world(hit.point),
            );
            bisector = next;
            last = Some(hit);
        }
        Ok(self.chain)
    }

    /// Anchor (midpoint) and reach-scaled upward direction of a pair's bisector.
    ///
    /// The scale is an integer multiple of `perp(right − left)`.
    fn anchor(&self, pair: SitePair) -> (Point, Point) {
        let l = self.dcel.site_pos(pair.left);
        let r = self.dcel.site_pos(pair.right);
        let dir = perp(r - l);
        let k = (self.ctx.reach / dir.norm()).ceil();
        ((l + r) * 0.5, dir * k)
    }

    fn push_bisector(&mut self, pair: SitePair, above: Option<Point>) -> EdgeId {
        let (center, v) = self.anchor(pair);
        match above {
            None => self
                .dcel
                .push_edge(pair.left, pair.right, (center - v, true), (center + v, true)),
            Some(x) => {
                // keep the placeholder below both the anchor and the crossing
                let from_x = x - v;
                let from_center = center - v;
                let start = if less_y_first(from_x, from_center) {
                    from_x
                } else {
                    from_center
                };
                self.dcel
                    .push_edge(pair.left, pair.right, (start, true), (x, false))
            }
        }
    }

    /// Highest admissible crossing of `bisector` with the current cells.
    fn next_crossing(
        &self,
        bisector: EdgeId,
        pair: SitePair,
        last: Option<&Intersection>,
    ) -> Option<Intersection> {
        debug_assert!(self.split.is_left(pair.left) && !self.split.is_left(pair.right));
        let l = self.dcel.site_pos(pair.left);
        let r = self.dcel.site_pos(pair.right);
        let mut best: Option<Intersection> = None;
        for (side, edges) in [(Side::Left, self.left_edges), (Side::Right, self.right_edges)] {
            let site = pair.on(side);
            for &e in edges {
                if !self.dcel.edge(e).touches(site) {
                    continue;
                }
                if last.is_some_and(|h| h.p == e || h.q == e) {
                    continue;
                }
                let Crossing::Hit(hit) =
                    intersect_edges(self.dcel, bisector, e, side, self.ctx.precision)
                else {
                    continue;
                };
                // the new pair must turn downward from the current one
                let moved = pair.across(side, self.dcel.edge(e)).on(side);
                if ccw(l, r, self.dcel.site_pos(moved)) > 0.0 {
                    continue;
                }
                match &best {
                    Some(b) if !less_y_first(b.point, hit.point) => {}
                    _ => best = Some(hit),
                }
            }
        }
        best
    }

    /// Fix the bisector's start at the crossing; pull an open end above it.
    fn finish_at(&mut self, bisector: EdgeId, pair: SitePair, x: Point) {
        let e = *self.dcel.edge(bisector);
        let start = self.dcel.vertex_mut(e.start);
        start.pos = x;
        start.infinite = false;
        let end = *self.dcel.vertex(e.end);
        if end.infinite && less_y_first(end.pos, x) {
            let (_, v) = self.anchor(pair);
            self.dcel.vertex_mut(e.end).pos = x + v;
        }
    }

    /// Wire `bisector`, `next` and the consumed edge together at the crossing
    /// and trim the consumed edge there.
    fn splice(&mut self, bisector: EdgeId, next: EdgeId, hit: &Intersection) {
        let q = hit.q;
        // which end of q meets the chain depends on q's direction
        let trims_end = match hit.side {
            Side::Left => hit.rs < 0.0,
            Side::Right => hit.rs > 0.0,
        };
        let qe = *self.dcel.edge(q);
        if trims_end {
            let v = self.dcel.vertex_mut(qe.end);
            v.pos = hit.point;
            v.infinite = false;
            let far = self.dcel.vertex_mut(qe.start);
            if hit.u < 0.0 && far.infinite {
                far.pos += hit.s * (hit.u - 1.0).floor();
            }
        } else {
            let v = self.dcel.vertex_mut(qe.start);
            v.pos = hit.point;
            v.infinite = false;
            let far = self.dcel.vertex_mut(qe.end);
            if hit.u > 1.0 && far.infinite {
                far.pos += hit.s * hit.u.ceil();
            }
        }

        match hit.side {
            Side::Left => {
                let b = self.dcel.edge_mut(bisector);
                b.ccw_predecessor = Some(q);
                b.cw_predecessor = Some(next);
                let n = self.dcel.edge_mut(next);
                n.cw_successor = Some(q);
                n.ccw_successor = Some(bisector);
                let qm = self.dcel.edge_mut(q);
                if trims_end {
                    qm.cw_successor = Some(bisector);
                    qm.ccw_successor = Some(next);
                } else {
                    qm.cw_predecessor = Some(bisector);
                    qm.ccw_predecessor = Some(next);
                }
            }
            Side::Right => {
                let b = self.dcel.edge_mut(bisector);
                b.cw_predecessor = Some(q);
                b.ccw_predecessor = Some(next);
                let n = self.dcel.edge_mut(next);
                n.cw_successor = Some(bisector);
                n.ccw_successor = Some(q);
                let qm = self.dcel.edge_mut(q);
                if trims_end {
                    qm.ccw_successor = Some(bisector);
                    qm.cw_successor = Some(next);
                } else {
                    qm.ccw_predecessor = Some(bisector);
                    qm.cw_predecessor = Some(next);
                }
            }
        }
    }
}
