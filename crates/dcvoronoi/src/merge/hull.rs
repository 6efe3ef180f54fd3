//! Angular sort and convex hull of a merge's sites.
//!
//! The pivot is the left-top site of the left block (smallest `x`, ties by
//! largest `y`), which is always on the union's hull. The hull keeps every
//! collinear boundary site, including the ones on the closing edge back to
//! the pivot, so the tangent locator sees each left/right transition.
//!
//! Collinearity is decided with `nearly_collinear` at the run's precision,
//! the same tolerance the chain builder uses to call two bisectors parallel.
//! A triple the hull treats as a turn therefore always has bisectors that
//! cross.

use std::cmp::Ordering;

use crate::dcel::SiteId;
use crate::geometry::{ccw, nearly_collinear, Point};

/// Left-most site, ties broken by greatest `y`. `None` for an empty block.
pub fn left_top<I, F>(ids: I, pos: F) -> Option<SiteId>
where
    I: IntoIterator<Item = SiteId>,
    F: Fn(SiteId) -> Point,
{
    let mut best: Option<(SiteId, Point)> = None;
    for id in ids {
        let p = pos(id);
        let better = match best {
            None => true,
            Some((_, b)) => p.x < b.x || (p.x == b.x && p.y > b.y),
        };
        if better {
            best = Some((id, p));
        }
    }
    best.map(|(id, _)| id)
}

/// Monotone angular key around `pivot`, valid when no site lies left of it.
///
/// Bucket 0 holds sites straight below the pivot (and the pivot itself),
/// ordered by distance; bucket 1 holds the rest ordered by slope. Ties in
/// slope (sites collinear with the pivot) go nearest first.
fn angular_cmp(pivot: Point, a: Point, b: Point) -> Ordering {
    let key = |p: Point| {
        let d = p - pivot;
        if d.x == 0.0 {
            (0u8, -d.y, d.x)
        } else {
            (1u8, d.y / d.x, d.x)
        }
    };
    let (ka, kb) = (key(a), key(b));
    ka.0.cmp(&kb.0)
        .then_with(|| ka.1.total_cmp(&kb.1))
        .then_with(|| ka.2.total_cmp(&kb.2))
}

/// Sort `ids` counterclockwise around `pivot`.
pub fn sort_ccw<F>(pivot: Point, ids: &mut [SiteId], pos: F)
where
    F: Fn(SiteId) -> Point,
{
    ids.sort_by(|&a, &b| angular_cmp(pivot, pos(a), pos(b)));
}

/// Put runs of sorted sites that share a ray from `pivot` (within
/// `precision`) in distance order. Rounded slopes of such sites can come out
/// in any order.
fn order_rays<F>(pivot: Point, ids: &mut [SiteId], pos: F, precision: f64)
where
    F: Fn(SiteId) -> Point + Copy,
{
    let dist = |s: SiteId| (pos(s) - pivot).norm_squared();
    let mut i = 0;
    while i < ids.len() {
        let a = pos(ids[i]);
        let mut j = i + 1;
        if a != pivot {
            while j < ids.len() {
                let b = pos(ids[j]);
                if (a - pivot).dot(&(b - pivot)) <= 0.0
                    || !nearly_collinear(pivot, a, b, precision)
                {
                    break;
                }
                j += 1;
            }
        }
        ids[i..j].sort_by(|&x, &y| dist(x).total_cmp(&dist(y)));
        i = j;
    }
}

/// Graham scan that preserves collinear sites (in both directions).
///
/// Returns the hull counterclockwise starting at `pivot`. Sites collinear
/// with the first and last sorted site are repeated on the way back, so a
/// fully collinear input comes out as a there-and-back walk. Only a turn
/// that is clearly clockwise (beyond `precision`) removes a site.
pub fn graham_scan<F>(pivot: SiteId, mut ids: Vec<SiteId>, pos: F, precision: f64) -> Vec<SiteId>
where
    F: Fn(SiteId) -> Point + Copy,
{
    let origin = pos(pivot);
    sort_ccw(origin, &mut ids, pos);
    order_rays(origin, &mut ids, pos, precision);
    if ids.len() < 3 {
        return ids;
    }

    let last = ids.len() - 1;
    let (a, c) = (pos(ids[0]), pos(ids[last]));
    for i in (1..last).rev() {
        if !nearly_collinear(a, pos(ids[i]), c, precision) {
            break;
        }
        ids.push(ids[i]);
    }

    let mut hull: Vec<SiteId> = Vec::with_capacity(ids.len());
    for &cand in &ids {
        while hull.len() >= 2 {
            let (o, m, q) = (
                pos(hull[hull.len() - 2]),
                pos(hull[hull.len() - 1]),
                pos(cand),
            );
            if ccw(o, m, q) >= 0.0 || nearly_collinear(o, m, q, precision) {
                break;
            }
            hull.pop();
        }
        hull.push(cand);
    }
    hull
}
