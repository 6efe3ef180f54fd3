//! Planar primitives shared by every merge stage.
//!
//! All orientation and intersection decisions go through `cross`/`ccw`; the
//! tolerance for near-zero results lives in `cfg::PRECISION`.

use std::cmp::Ordering;

use nalgebra::Vector2;

/// A point (or free vector) in the plane. Equality is exact-coordinate.
pub type Point = Vector2<f64>;

/// 2D cross product `a × b = a.x·b.y − a.y·b.x`.
#[inline]
pub fn cross(a: Point, b: Point) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Orientation of the triple `(a, b, c)`: `(b − a) × (c − a)`.
///
/// Positive for a left turn, zero for collinear, negative for a right turn.
#[inline]
pub fn ccw(a: Point, b: Point, c: Point) -> f64 {
    cross(b - a, c - a)
}

/// Rotate a vector by +90° (counterclockwise).
#[inline]
pub fn perp(v: Point) -> Point {
    Point::new(-v.y, v.x)
}

/// Whether `a` and `b` lie on one line through `o`, up to a relative
/// tolerance: `|ccw(o, a, b)| <= precision·|a − o|·|b − o|`, i.e. the sine of
/// the angle at `o` is at most `precision`.
#[inline]
pub fn nearly_collinear(o: Point, a: Point, b: Point, precision: f64) -> bool {
    ccw(o, a, b).abs() <= precision * (a - o).norm() * (b - o).norm()
}

/// Affine map between input coordinates and the unit frame merges run in.
///
/// `to_local` translates the bounding box's lower corner to the origin and
/// divides by the larger side, so every site lands in `[0, 1]²` and the
/// absolute tolerances mean the same thing at any input scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub origin: Point,
    pub scale: f64,
}

impl Default for Frame {
    fn default() -> Self {
        Self::identity()
    }
}

impl Frame {
    pub fn identity() -> Self {
        Self {
            origin: Point::zeros(),
            scale: 1.0,
        }
    }

    /// Frame of the bounding box of `sites`. Identity for an empty input;
    /// a zero-size box keeps unit scale.
    pub fn fit(sites: &[Point]) -> Self {
        let Some(first) = sites.first() else {
            return Self::identity();
        };
        let (lo, hi) = sites
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.inf(p), hi.sup(p)));
        let span = (hi.x - lo.x).max(hi.y - lo.y);
        Self {
            origin: lo,
            scale: if span > 0.0 { span } else { 1.0 },
        }
    }

    #[inline]
    pub fn to_local(&self, p: Point) -> Point {
        (p - self.origin) / self.scale
    }

    #[inline]
    pub fn to_world(&self, p: Point) -> Point {
        p * self.scale + self.origin
    }
}

/// Input order: `x` ascending, ties by `y` descending.
#[inline]
pub fn cmp_x_then_y_desc(a: &Point, b: &Point) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| b.y.total_cmp(&a.y))
}

/// Lexicographic `(x, y)` ascending; used for the persisted text format.
#[inline]
pub fn cmp_xy(a: &Point, b: &Point) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}

/// `y` first, ties by `x`. The chain grows downward, so "higher" means
/// greater under this order.
#[inline]
pub fn less_y_first(a: Point, b: Point) -> bool {
    a.y < b.y || (a.y == b.y && a.x < b.x)
}
