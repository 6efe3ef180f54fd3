//! Removal of sub-diagram edges left on the wrong side of the chain.
//!
//! A left-block vertex is invalid when it lies strictly right of the chain,
//! a right-block vertex when it lies strictly left. The chain is scanned top
//! to bottom; the first chain edge whose `y`-range covers the vertex decides.
//! Any edge with an invalid endpoint is dropped from its sub-diagram list
//! (the arena record stays, unreferenced).

use crate::dcel::{Dcel, EdgeId, Vertex};
use crate::geometry::ccw;

use super::Side;

/// Whether `v`, owned by an edge of block `side`, lies across the chain.
fn crosses_chain(dcel: &Dcel, chain: &[EdgeId], v: &Vertex, side: Side, precision: f64) -> bool {
    for &hp in chain {
        let (s, e) = (dcel.start(hp), dcel.end(hp));
        // above a finite upper end; the remaining chain lies lower still
        if v.pos.y > e.pos.y + precision && !e.infinite {
            return false;
        }
        if v.pos.y >= s.pos.y || s.infinite {
            let turn = ccw(s.pos, e.pos, v.pos);
            let wrong = match side {
                Side::Left => turn < -precision,
                Side::Right => turn > precision,
            };
            if wrong {
                return true;
            }
        }
    }
    false
}

fn retain_valid(
    dcel: &Dcel,
    edges: &mut Vec<EdgeId>,
    chain: &[EdgeId],
    side: Side,
    precision: f64,
    removed: &mut Vec<EdgeId>,
) {
    edges.retain(|&id| {
        let (s, e) = (dcel.start(id), dcel.end(id));
        let keep = !crosses_chain(dcel, chain, s, side, precision)
            && !crosses_chain(dcel, chain, e, side, precision);
        if !keep {
            removed.push(id);
        }
        keep
    });
}

/// Drop invalid edges from `left` and `right` in place and return them,
/// left block first.
pub fn prune(
    dcel: &Dcel,
    left: &mut Vec<EdgeId>,
    right: &mut Vec<EdgeId>,
    chain: &[EdgeId],
    precision: f64,
) -> Vec<EdgeId> {
    let mut removed = Vec::new();
    retain_valid(dcel, left, chain, Side::Left, precision, &mut removed);
    retain_valid(dcel, right, chain, Side::Right, precision, &mut removed);
    if !removed.is_empty() {
        tracing::trace!(removed = removed.len(), "pruned sub-diagram edges");
    }
    removed
}
