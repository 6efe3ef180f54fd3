//! Upper and lower cross edges between the two blocks of a merge.

use crate::dcel::{Edge, SiteId};

use super::Side;

/// An ordered pair of sites, left block first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SitePair {
    pub left: SiteId,
    pub right: SiteId,
}

impl SitePair {
    #[inline]
    pub fn new(left: SiteId, right: SiteId) -> Self {
        Self { left, right }
    }

    /// The pair after crossing `edge` on `side`: the site on that side is
    /// replaced by its neighbor across the edge.
    #[inline]
    pub fn across(self, side: Side, edge: &Edge) -> Self {
        match side {
            Side::Left => Self::new(edge.other_site(self.left), self.right),
            Side::Right => Self::new(self.left, edge.other_site(self.right)),
        }
    }

    #[inline]
    pub fn on(self, side: Side) -> SiteId {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Tangent pairs bounding the merge region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossEdges {
    pub top: SitePair,
    pub bottom: SitePair,
}

impl CrossEdges {
    /// Single shared tangent (e.g. collinear blocks).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.top == self.bottom
    }
}

/// Walk `hull` cyclically and record every left/right transition.
///
/// The hull starts at the left block's left-top site and runs
/// counterclockwise, so the last transition found (on the closing pair) is
/// the upper tangent and the one before it the lower tangent. With a single
/// transition both are the same pair. `None` if no transition exists.
pub fn locate_cross_edges<F>(hull: &[SiteId], is_left: F) -> Option<CrossEdges>
where
    F: Fn(SiteId) -> bool,
{
    if hull.len() < 2 {
        return None;
    }
    let mut top: Option<SitePair> = None;
    let mut bottom: Option<SitePair> = None;
    let mut check = |a: SiteId, b: SiteId| {
        let (la, lb) = (is_left(a), is_left(b));
        if la != lb {
            bottom = top;
            top = Some(if la {
                SitePair::new(a, b)
            } else {
                SitePair::new(b, a)
            });
        }
    };
    for w in hull.windows(2) {
        check(w[0], w[1]);
    }
    check(hull[0], hull[hull.len() - 1]);

    let top = top?;
    Some(CrossEdges {
        top,
        bottom: bottom.unwrap_or(top),
    })
}
