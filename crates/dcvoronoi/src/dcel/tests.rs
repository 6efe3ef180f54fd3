use super::*;
use nalgebra::vector;

fn three_sites() -> Dcel {
    Dcel::from_sites(&[vector![0.0, 0.0], vector![5.0, 10.0], vector![10.0, 0.0]])
}

#[test]
fn push_edge_allocates_owned_vertices() {
    let mut d = three_sites();
    let e = d.push_edge(
        SiteId(0),
        SiteId(1),
        (vector![1.0, -1.0], true),
        (vector![-1.0, 1.0], false),
    );
    assert_eq!(e, EdgeId(0));
    assert_eq!(d.start(e).edge, e);
    assert_eq!(d.end(e).edge, e);
    assert!(d.start(e).infinite);
    assert!(!d.end(e).infinite);
    assert!(d.edge(e).touches(SiteId(1)));
    assert!(!d.edge(e).touches(SiteId(2)));
    assert_eq!(d.edge(e).other_site(SiteId(0)), SiteId(1));
    assert_eq!(d.edge(e).other_site(SiteId(1)), SiteId(0));
}

#[test]
fn claim_keeps_first_edge() {
    let mut d = three_sites();
    let a = d.push_edge(SiteId(0), SiteId(1), (vector![0.0, 0.0], true), (vector![1.0, 1.0], true));
    let b = d.push_edge(SiteId(0), SiteId(2), (vector![0.0, 0.0], true), (vector![1.0, 1.0], true));
    d.claim_site_edge(SiteId(0), a);
    d.claim_site_edge(SiteId(0), b);
    assert_eq!(d.site(SiteId(0)).edge, Some(a));
}

#[test]
fn compact_drops_dead_links_and_repoints_sites() {
    let mut d = three_sites();
    let dead = d.push_edge(SiteId(0), SiteId(1), (vector![0.0, 0.0], true), (vector![1.0, 1.0], true));
    let a = d.push_edge(SiteId(0), SiteId(2), (vector![2.0, 0.0], true), (vector![3.0, 1.0], false));
    let b = d.push_edge(SiteId(1), SiteId(2), (vector![3.0, 1.0], false), (vector![4.0, 4.0], true));
    d.claim_site_edge(SiteId(0), dead);
    d.claim_site_edge(SiteId(1), dead);
    d.claim_site_edge(SiteId(2), b);
    d.edge_mut(a).cw_successor = Some(b);
    d.edge_mut(a).ccw_successor = Some(dead);
    d.edge_mut(b).ccw_predecessor = Some(a);

    let diagram = d.compact(&[a, b]);
    assert_eq!(diagram.edges().len(), 2);
    let (na, nb) = (EdgeId(0), EdgeId(1));
    assert_eq!(diagram.edge(na).cw_successor, Some(nb));
    assert_eq!(diagram.edge(na).ccw_successor, None);
    assert_eq!(diagram.edge(nb).ccw_predecessor, Some(na));
    // vertex back-references follow the renumbering
    let (s, e) = diagram.endpoints(nb);
    assert_eq!(s.edge, nb);
    assert_eq!(e.edge, nb);
    assert_eq!(s.pos, vector![3.0, 1.0]);
    // sites whose edge was removed fall back to a surviving incident edge
    assert_eq!(diagram.site(SiteId(0)).edge, Some(na));
    assert_eq!(diagram.site(SiteId(1)).edge, Some(nb));
    assert_eq!(diagram.site(SiteId(2)).edge, Some(nb));
    assert_eq!(diagram.unbounded_edge_count(), 2);
    assert_eq!(diagram.bounded_edge_count(), 0);
    assert_eq!(diagram.edges_of(SiteId(2)), vec![na, nb]);
}

#[test]
fn empty_diagram_has_nothing() {
    let d = Diagram::default();
    assert!(d.sites().is_empty());
    assert!(d.edges().is_empty());
    assert_eq!(d.unbounded_edge_count(), 0);
}
