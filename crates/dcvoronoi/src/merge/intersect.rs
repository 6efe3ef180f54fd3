//! Crossing of a growing bisector with an existing edge.
//!
//! Parametrize `p(t) = p.start + t·r` and `q(u) = q.start + u·s` with
//! `r = p.end − p.start`, `s = q.end − q.start`. A parameter may leave
//! `[0, 1]` by more than the tolerance only past an infinite endpoint.

use crate::dcel::{Dcel, EdgeId};
use crate::geometry::{cross, Point};

use super::Side;

/// Geometry of one edge as seen by the intersection test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub start_infinite: bool,
    pub end_infinite: bool,
}

impl Segment {
    pub fn of(dcel: &Dcel, id: EdgeId) -> Self {
        let (s, e) = (dcel.start(id), dcel.end(id));
        Self {
            start: s.pos,
            end: e.pos,
            start_infinite: s.infinite,
            end_infinite: e.infinite,
        }
    }

    #[inline]
    fn admits(&self, param: f64, precision: f64) -> bool {
        if param < -precision {
            self.start_infinite
        } else if param <= 1.0 + precision {
            true
        } else {
            self.end_infinite
        }
    }
}

/// A crossing of bisector `p` with candidate edge `q`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub point: Point,
    pub p: EdgeId,
    pub q: EdgeId,
    pub r: Point,
    pub s: Point,
    /// `r × s`; its sign tells which end of `q` faces the chain.
    pub rs: f64,
    pub t: f64,
    pub u: f64,
    /// Sub-diagram `q` belongs to.
    pub side: Side,
}

/// Parametric result of a segment test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Params {
    pub point: Point,
    pub r: Point,
    pub s: Point,
    pub rs: f64,
    pub t: f64,
    pub u: f64,
}

/// Outcome of an intersection test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Crossing<T> {
    /// Both edges lie on one line; never a valid chain step.
    Collinear,
    /// Parallel, or the crossing lies outside an edge's finite range.
    Disjoint,
    Hit(T),
}

/// Intersect two possibly-unbounded segments.
pub fn intersect_segments(p: &Segment, q: &Segment, precision: f64) -> Crossing<Params> {
    let r = p.end - p.start;
    let s = q.end - q.start;
    let pq = q.start - p.start;
    let rs = cross(r, s);
    let pqs = cross(pq, s);
    if rs.abs() <= precision {
        return if pqs.abs() <= precision {
            Crossing::Collinear
        } else {
            Crossing::Disjoint
        };
    }
    let t = pqs / rs;
    let u = cross(pq, r) / rs;
    if !p.admits(t, precision) || !q.admits(u, precision) {
        return Crossing::Disjoint;
    }
    Crossing::Hit(Params {
        point: p.start + r * t,
        r,
        s,
        rs,
        t,
        u,
    })
}

/// Intersect arena edges `p` (bisector) and `q` (candidate from `side`).
pub fn intersect_edges(
    dcel: &Dcel,
    p: EdgeId,
    q: EdgeId,
    side: Side,
    precision: f64,
) -> Crossing<Intersection> {
    match intersect_segments(&Segment::of(dcel, p), &Segment::of(dcel, q), precision) {
        Crossing::Collinear => Crossing::Collinear,
        Crossing::Disjoint => Crossing::Disjoint,
        Crossing::Hit(h) => Crossing::Hit(Intersection {
            point: h.point,
            p,
            q,
            r: h.r,
            s: h.s,
            rs: h.rs,
            t: h.t,
            u: h.u,
            side,
        }),
    }
}
