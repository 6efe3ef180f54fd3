//! Input normalization and the divide-and-conquer recursion.
//!
//! Flow
//! - `normalize_sites`: reject non-finite coordinates, sort by `x` ascending
//!   (ties `y` descending), drop exact duplicates.
//! - `build_voronoi_with`: move the sites into the unit frame of their
//!   bounding box, compute the ray reach once, split the sorted sites at the
//!   midpoint, solve both halves, merge, and finally compact the arena into
//!   a `Diagram` mapped back to input coordinates.
//!
//! Merges run in the unit frame so `PRECISION` is relative to the input's
//! extent: scaling or translating the input scales or translates the result.

use crate::cfg::VoronoiCfg;
use crate::dcel::{Dcel, Diagram};
use crate::error::VoronoiError;
use crate::geometry::{cmp_x_then_y_desc, Frame, Point};
use crate::merge::{merge, MergeCtx, SubDiagram};
use crate::observer::{MergeObserver, NoopObserver};

/// Sorted, deduplicated copy of `points`.
///
/// Errors with the index (in `points`) of the first non-finite coordinate.
pub fn normalize_sites(points: &[Point]) -> Result<Vec<Point>, VoronoiError> {
    if let Some(index) = points
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite()))
    {
        return Err(VoronoiError::NonFiniteSite { index });
    }
    let mut sites = points.to_vec();
    sites.sort_by(cmp_x_then_y_desc);
    sites.dedup();
    Ok(sites)
}

/// Voronoi diagram of `points` with default settings and no observer.
pub fn build_voronoi(points: &[Point]) -> Result<Diagram, VoronoiError> {
    build_voronoi_with(points, &VoronoiCfg::default(), &mut NoopObserver)
}

/// Voronoi diagram of `points`, reporting merge checkpoints to `obs`.
///
/// Sites of the result are the normalized input (see `normalize_sites`).
/// An empty input yields an empty diagram.
pub fn build_voronoi_with<O: MergeObserver + ?Sized>(
    points: &[Point],
    cfg: &VoronoiCfg,
    obs: &mut O,
) -> Result<Diagram, VoronoiError> {
    let sites = normalize_sites(points)?;
    if sites.is_empty() {
        return Ok(Diagram::default());
    }
    let frame = Frame::fit(&sites);
    let local: Vec<Point> = sites.iter().map(|&p| frame.to_local(p)).collect();
    let reach = cfg.reach_for(&local);
    tracing::debug!(
        input = points.len(),
        sites = sites.len(),
        scale = frame.scale,
        reach,
        "building voronoi diagram"
    );
    let mut dcel = Dcel::from_sites(&local);
    let mut solver = Solver {
        dcel: &mut dcel,
        reach,
        precision: cfg.precision,
        frame,
        obs,
    };
    let root = solver.solve(0, sites.len(), 0)?;
    let diagram = dcel.compact(&root.edges).into_world(&frame, &sites);
    tracing::debug!(
        edges = diagram.edges().len(),
        unbounded = diagram.unbounded_edge_count(),
        "diagram done"
    );
    Ok(diagram)
}

struct Solver<'a, O: ?Sized> {
    dcel: &'a mut Dcel,
    reach: f64,
    precision: f64,
    frame: Frame,
    obs: &'a mut O,
}

impl<O: MergeObserver + ?Sized> Solver<'_, O> {
    /// Diagram of sites `lo..hi` (non-empty).
    fn solve(&mut self, lo: usize, hi: usize, depth: usize) -> Result<SubDiagram, VoronoiError> {
        if hi - lo == 1 {
            return Ok(SubDiagram::single(lo));
        }
        let mid = lo + (hi - lo) / 2;
        let left = self.solve(lo, mid, depth + 1)?;
        let right = self.solve(mid, hi, depth + 1)?;
        let ctx = MergeCtx {
            reach: self.reach,
            precision: self.precision,
            depth,
            frame: self.frame,
        };
        merge(self.dcel, left, right, ctx, &mut *self.obs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dcel::{EdgeId, SiteId};
    use crate::io::DiagramFile;
    use crate::observer::Recorder;
    use nalgebra::vector;
    use proptest::prelude::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| vector![x, y]).collect()
    }

    fn close(a: Point, b: Point) -> bool {
        (a - b).norm() < 1e-9
    }

    /// Point on edge `e` that is interior to it (away from bounded vertices).
    fn probe(d: &Diagram, e: EdgeId) -> Point {
        let (s, t) = d.endpoints(e);
        let edge = d.edge(e);
        match (s.infinite, t.infinite) {
            (true, true) => (d.site(edge.left).pos + d.site(edge.right).pos) * 0.5,
            (true, false) => t.pos + (s.pos - t.pos) * 1e-3,
            (false, true) => s.pos + (t.pos - s.pos) * 1e-3,
            (false, false) => (s.pos + t.pos) * 0.5,
        }
    }

    /// Both incident sites are equally near the probe and no site is nearer.
    /// The tolerance is relative to the sites' extent.
    fn assert_edges_equidistant(d: &Diagram) {
        let positions: Vec<Point> = d.sites().iter().map(|s| s.pos).collect();
        let extent = Frame::fit(&positions).scale;
        for e in d.edge_ids() {
            let p = probe(d, e);
            let edge = d.edge(e);
            let dl = (p - d.site(edge.left).pos).norm();
            let dr = (p - d.site(edge.right).pos).norm();
            let tol = 1e-6 * dl.max(extent);
            assert!((dl - dr).abs() <= tol, "edge {e:?}: {dl} vs {dr}");
            let nearest = d
                .sites()
                .iter()
                .map(|s| (p - s.pos).norm())
                .fold(f64::INFINITY, f64::min);
            assert!(nearest >= dl - tol, "edge {e:?} is inside another cell");
        }
    }

    /// Hull vertex count, strict (collinear boundary sites excluded).
    fn hull_count(points: &[Point]) -> usize {
        let mut p = points.to_vec();
        p.sort_by(crate::geometry::cmp_xy);
        p.dedup();
        let turn = |o: Point, a: Point, b: Point| crate::geometry::ccw(o, a, b);
        let mut lower: Vec<Point> = Vec::new();
        for &q in &p {
            while lower.len() >= 2 && turn(lower[lower.len() - 2], lower[lower.len() - 1], q) <= 0.0 {
                lower.pop();
            }
            lower.push(q);
        }
        let mut upper: Vec<Point> = Vec::new();
        for &q in p.iter().rev() {
            while upper.len() >= 2 && turn(upper[upper.len() - 2], upper[upper.len() - 1], q) <= 0.0 {
                upper.pop();
            }
            upper.push(q);
        }
        lower.len() + upper.len() - 2
    }

    #[test]
    fn normalize_sorts_and_dedups() {
        let got = normalize_sites(&pts(&[(1.0, 0.0), (0.0, 0.0), (0.0, 2.0), (1.0, 0.0)])).unwrap();
        assert_eq!(got, pts(&[(0.0, 2.0), (0.0, 0.0), (1.0, 0.0)]));
    }

    #[test]
    fn normalize_rejects_nan() {
        let err = normalize_sites(&pts(&[(0.0, 0.0), (f64::NAN, 1.0)])).unwrap_err();
        assert_eq!(err, VoronoiError::NonFiniteSite { index: 1 });
        let err = build_voronoi(&pts(&[(f64::INFINITY, 0.0)])).unwrap_err();
        assert_eq!(err, VoronoiError::NonFiniteSite { index: 0 });
    }

    #[test]
    fn empty_and_single_inputs() {
        let d = build_voronoi(&[]).unwrap();
        assert!(d.sites().is_empty() && d.edges().is_empty());
        let d = build_voronoi(&pts(&[(3.0, 4.0)])).unwrap();
        assert_eq!(d.sites().len(), 1);
        assert!(d.edges().is_empty());
        assert_eq!(d.site(SiteId(0)).edge, None);
    }

    #[test]
    fn two_sites_split_by_vertical_line() {
        let d = build_voronoi(&pts(&[(0.0, 0.0), (10.0, 0.0)])).unwrap();
        assert_eq!(d.edges().len(), 1);
        let (s, t) = d.endpoints(EdgeId(0));
        assert!(s.infinite && t.infinite);
        assert_eq!(s.pos.x, 5.0);
        assert_eq!(t.pos.x, 5.0);
        assert!(s.pos.y < t.pos.y);
        assert_eq!(d.unbounded_edge_count(), 1);
    }

    #[test]
    fn triangle_meets_at_circumcenter() {
        let d = build_voronoi(&pts(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)])).unwrap();
        assert_eq!(d.edges().len(), 3);
        let c = vector![5.0, 3.75];
        for e in d.edge_ids() {
            let (s, t) = d.endpoints(e);
            assert!(s.infinite != t.infinite, "edge {e:?} must be a ray");
            let finite = if s.infinite { t } else { s };
            assert!(close(finite.pos, c));
        }
        for site in d.sites() {
            assert!(((site.pos - c).norm() - 6.25).abs() < 1e-12);
        }
        assert_eq!(d.bounded_edge_count(), 0);
        assert_eq!(d.unbounded_edge_count(), 3);
        // every site sees two of the three rays
        for i in 0..3 {
            assert_eq!(d.edges_of(SiteId(i)).len(), 2);
        }
        assert_edges_equidistant(&d);
    }

    #[test]
    fn duplicate_input_matches_deduplicated() {
        let a = build_voronoi(&pts(&[(0.0, 0.0), (0.0, 0.0), (5.0, 5.0)])).unwrap();
        let b = build_voronoi(&pts(&[(0.0, 0.0), (5.0, 5.0)])).unwrap();
        assert_eq!(a.sites().len(), 2);
        assert_eq!(a.edges().len(), 1);
        assert_eq!(
            DiagramFile::from_diagram(&a).to_text(),
            DiagramFile::from_diagram(&b).to_text()
        );
        // diagonal bisector through (2.5, 2.5), reach 20 in steps of |(-5, 5)|
        let (s, t) = a.endpoints(EdgeId(0));
        assert!(close(s.pos, vector![17.5, -12.5]));
        assert!(close(t.pos, vector![-12.5, 17.5]));
    }

    #[test]
    fn four_collinear_sites_give_parallel_lines() {
        let d = build_voronoi(&pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)])).unwrap();
        assert_eq!(d.edges().len(), 3);
        let mut xs: Vec<f64> = d
            .edge_ids()
            .map(|e| {
                let (s, t) = d.endpoints(e);
                assert!(s.infinite && t.infinite);
                assert_eq!(s.pos.x, t.pos.x);
                s.pos.x
            })
            .collect();
        xs.sort_by(f64::total_cmp);
        for (x, want) in xs.into_iter().zip([0.5, 1.5, 2.5]) {
            assert!((x - want).abs() < 1e-12, "{x} vs {want}");
        }
    }

    #[test]
    fn three_collinear_sites_give_two_lines() {
        for raw in [
            [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
            [(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)],
            [(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)],
            // on one line, but the rounded turn is about 5e-14
            [(40.37, 7.44), (41.11, 21.44), (41.48, 28.44)],
            [(25.56, 20.25), (29.59, 18.28), (33.62, 16.31)],
        ] {
            let d = build_voronoi(&pts(&raw)).unwrap();
            assert_eq!(d.edges().len(), 2, "{raw:?}");
            assert_eq!(d.bounded_edge_count(), 0);
            assert_eq!(d.unbounded_edge_count(), 2);
            assert_edges_equidistant(&d);
        }
    }

    #[test]
    fn skewed_lattice() {
        let mut raw = Vec::new();
        for i in 0..5 {
            for j in 0..5 {
                let (i, j) = (i as f64, j as f64);
                raw.push(vector![10.0 * i + 0.37 * j, 7.0 * j + 0.11 * i]);
            }
        }
        let d = build_voronoi(&raw).unwrap();
        assert_eq!(d.sites().len(), 25);
        // all 16 boundary sites own an unbounded edge
        assert_eq!(d.unbounded_edge_count(), 16);
        assert_eq!(d.edges().len(), 3 * 25 - 3 - 16);
        assert_edges_equidistant(&d);
    }

    #[test]
    fn shrunk_copy_keeps_its_shape() {
        let input = crate::sample::draw_sites(
            crate::sample::SiteCfg {
                count: 60,
                extent: 100.0,
                integer: false,
            },
            crate::sample::ReplayToken { seed: 3, index: 0 },
        );
        let big = build_voronoi(&input).unwrap();
        for factor in [1e-3, 1e-6] {
            let shrunk: Vec<Point> = input.iter().map(|p| p * factor).collect();
            let small = build_voronoi(&shrunk).unwrap();
            assert_eq!(small.edges().len(), big.edges().len());
            assert_eq!(small.unbounded_edge_count(), big.unbounded_edge_count());
            assert_edges_equidistant(&small);
        }
        // far from the origin as well
        let moved: Vec<Point> = input.iter().map(|p| p + vector![1e6, -1e6]).collect();
        let far = build_voronoi(&moved).unwrap();
        assert_eq!(far.edges().len(), big.edges().len());
        assert_edges_equidistant(&far);
    }

    #[test]
    fn square_with_center() {
        let d = build_voronoi(&pts(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (0.0, 4.0),
            (4.0, 4.0),
            (2.0, 1.0),
        ]))
        .unwrap();
        assert_eq!(d.sites().len(), 5);
        assert_eq!(d.unbounded_edge_count(), 4);
        assert_eq!(d.edges().len(), 3 * 5 - 3 - 4);
        assert_edges_equidistant(&d);
    }

    #[test]
    fn deterministic_and_observer_independent() {
        let input = pts(&[
            (0.3, 7.1),
            (4.2, 1.9),
            (8.8, 6.4),
            (2.5, 3.3),
            (6.1, 9.7),
            (9.4, 0.6),
            (5.0, 5.2),
        ]);
        let plain = DiagramFile::from_diagram(&build_voronoi(&input).unwrap()).to_text();
        let again = DiagramFile::from_diagram(&build_voronoi(&input).unwrap()).to_text();
        assert_eq!(plain, again);

        let mut rec = Recorder::default();
        let observed = build_voronoi_with(&input, &VoronoiCfg::default(), &mut rec).unwrap();
        assert_eq!(DiagramFile::from_diagram(&observed).to_text(), plain);
        // 7 sites split into 6 merges
        assert_eq!(rec.merges, 6);
        assert_eq!(rec.hull_sizes.len(), 6);
        assert_eq!(rec.chain_lengths.len(), 6);
        assert_eq!(rec.depths.last(), Some(&0));
    }

    #[test]
    fn compacted_links_stay_in_range() {
        let input = crate::sample::draw_sites(
            crate::sample::SiteCfg {
                count: 40,
                extent: 100.0,
                integer: false,
            },
            crate::sample::ReplayToken { seed: 7, index: 0 },
        );
        let d = build_voronoi(&input).unwrap();
        let n = d.edges().len();
        for e in d.edges() {
            for link in [
                e.cw_predecessor,
                e.ccw_predecessor,
                e.cw_successor,
                e.ccw_successor,
            ]
            .into_iter()
            .flatten()
            {
                assert!(link.0 < n);
            }
        }
        for (i, s) in d.sites().iter().enumerate() {
            let e = s.edge.expect("every site of a multi-site diagram has an edge");
            assert!(d.edge(e).touches(SiteId(i)));
        }
        for e in d.edge_ids() {
            let (s, t) = d.endpoints(e);
            assert_eq!(s.edge, e);
            assert_eq!(t.edge, e);
        }
        assert_edges_equidistant(&d);
    }

    fn general_position() -> impl Strategy<Value = Vec<Point>> {
        prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 1..48)
            .prop_map(|raw| raw.into_iter().map(|(x, y)| vector![x, y]).collect())
    }

    /// `n` sites `p + k·d` on a line that is not close to vertical.
    fn collinear_sites() -> impl Strategy<Value = Vec<Point>> {
        (
            (-100.0f64..100.0, -100.0f64..100.0),
            (0.1f64..10.0, any::<bool>(), -10.0f64..10.0),
            3usize..=8,
        )
            .prop_map(|((px, py), (dx, flip, dy), n)| {
                let p = vector![px, py];
                let d = vector![if flip { -dx } else { dx }, dy];
                (0..n).map(|k| p + d * k as f64).collect()
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn collinear_sites_give_parallel_lines(input in collinear_sites()) {
            let d = build_voronoi(&input).unwrap();
            let n = input.len();
            prop_assert_eq!(d.sites().len(), n);
            prop_assert_eq!(d.edges().len(), n - 1);
            prop_assert_eq!(d.unbounded_edge_count(), n - 1);
            prop_assert_eq!(d.bounded_edge_count(), 0);
            assert_edges_equidistant(&d);
        }

        #[test]
        fn tiny_extent_builds_valid_diagrams(input in general_position()) {
            let input: Vec<Point> = input.iter().map(|p| p * 1e-4).collect();
            let d = build_voronoi(&input).unwrap();
            let n = normalize_sites(&input).unwrap().len();
            if n >= 3 {
                let h = hull_count(&input);
                prop_assert_eq!(d.unbounded_edge_count(), h);
                prop_assert_eq!(d.edges().len(), 3 * n - 3 - h);
            } else {
                prop_assert_eq!(d.edges().len(), n - 1);
            }
            assert_edges_equidistant(&d);
        }

        #[test]
        fn random_sites_build_valid_diagrams(input in general_position()) {
            let d = build_voronoi(&input).unwrap();
            let n = normalize_sites(&input).unwrap().len();
            prop_assert_eq!(d.sites().len(), n);
            for (site, want) in d.sites().iter().zip(normalize_sites(&input).unwrap()) {
                prop_assert_eq!(site.pos, want);
            }
            if n >= 3 {
                let h = hull_count(&input);
                prop_assert_eq!(d.unbounded_edge_count(), h);
                prop_assert_eq!(d.edges().len(), 3 * n - 3 - h);
            } else {
                prop_assert_eq!(d.edges().len(), n - 1);
            }
            assert_edges_equidistant(&d);
        }
    }
}
