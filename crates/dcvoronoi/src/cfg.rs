//! Tolerances and ray reach.
//!
//! Policy
//! - `PRECISION` is fixed and used for every boundary decision (parallel
//!   test, parametric range checks, pruning side test). Chain building and
//!   pruning must agree on edge validity, so both read it from one place.
//! - Tolerances are absolute, so merges run on sites mapped into the unit
//!   frame of their bounding box (`geometry::Frame`) and every threshold is
//!   relative to the input's extent.
//! - Unbounded rays are stored as finite placeholders. Their length ("reach")
//!   is derived from the extent of the frame's sites once per run.

use crate::geometry::Point;

/// Tolerance for near-zero orientation and parameter comparisons.
pub const PRECISION: f64 = 1e-7;

/// Run configuration.
#[derive(Clone, Copy, Debug)]
pub struct VoronoiCfg {
    pub precision: f64,
    /// Placeholder reach as a multiple of the input extent.
    pub reach_factor: f64,
    /// Lower bound on the extent, so one or two coincident-axis sites still
    /// get a usable reach.
    pub min_extent: f64,
}

impl Default for VoronoiCfg {
    fn default() -> Self {
        Self {
            precision: PRECISION,
            reach_factor: 4.0,
            min_extent: 1.0,
        }
    }
}

impl VoronoiCfg {
    /// Placeholder length for infinite ray endpoints over `sites`.
    pub fn reach_for(&self, sites: &[Point]) -> f64 {
        let mut lo = Point::new(f64::INFINITY, f64::INFINITY);
        let mut hi = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in sites {
            lo = lo.inf(p);
            hi = hi.sup(p);
        }
        let span = if sites.is_empty() {
            0.0
        } else {
            (hi.x - lo.x).max(hi.y - lo.y)
        };
        self.reach_factor * span.max(self.min_extent)
    }
}
