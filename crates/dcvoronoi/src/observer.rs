//! Merge checkpoints for visualization or diagnostics.
//!
//! A `MergeObserver` is told about each merge three times: after the hull
//! and cross edges are known, after every chain step, and after pruning.
//! Callbacks get read-only views; nothing an observer does can change the
//! result. Every hook defaults to a no-op.
//!
//! Arena positions are in the run's unit frame (see `Frame`); points passed
//! to the hooks directly are already in input coordinates.

use crate::dcel::{Dcel, EdgeId, SiteId};
use crate::geometry::{Frame, Point};
use crate::merge::CrossEdges;

/// Read-only snapshot of one merge in progress.
#[derive(Clone, Copy, Debug)]
pub struct MergeView<'a> {
    pub dcel: &'a Dcel,
    /// Surviving left sub-diagram edges.
    pub left: &'a [EdgeId],
    /// Surviving right sub-diagram edges.
    pub right: &'a [EdgeId],
    /// Chain built so far (top first).
    pub chain: &'a [EdgeId],
    pub depth: usize,
    /// Maps `dcel` positions back to input coordinates.
    pub frame: Frame,
}

pub trait MergeObserver {
    /// Merged hull (counterclockwise from the pivot) and its tangents.
    fn hull_merged(&mut self, _view: &MergeView<'_>, _hull: &[SiteId], _cross: &CrossEdges) {}

    /// The chain crossed a sub-diagram edge at `at`.
    fn chain_step(&mut self, _view: &MergeView<'_>, _at: Point) {}

    /// Pruning finished; `removed` lists the dropped sub-diagram edges.
    fn pruned(&mut self, _view: &MergeView<'_>, _removed: &[EdgeId]) {}
}

/// Observer that ignores every checkpoint.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl MergeObserver for NoopObserver {}

/// Collects per-merge summaries in callback order.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    /// Number of merges started.
    pub merges: usize,
    pub hull_sizes: Vec<usize>,
    /// Every chain crossing point, across all merges.
    pub chain_hits: Vec<Point>,
    /// Final chain length of each merge.
    pub chain_lengths: Vec<usize>,
    /// Every pruned edge, across all merges.
    pub pruned: Vec<EdgeId>,
    /// Depth of each merge, in completion order.
    pub depths: Vec<usize>,
}

impl MergeObserver for Recorder {
    fn hull_merged(&mut self, _view: &MergeView<'_>, hull: &[SiteId], _cross: &CrossEdges) {
        self.merges += 1;
        self.hull_sizes.push(hull.len());
    }

    fn chain_step(&mut self, _view: &MergeView<'_>, at: Point) {
        self.chain_hits.push(at);
    }

    fn pruned(&mut self, view: &MergeView<'_>, removed: &[EdgeId]) {
        self.chain_lengths.push(view.chain.len());
        self.pruned.extend_from_slice(removed);
        self.depths.push(view.depth);
    }
}

impl<O: MergeObserver + ?Sized> MergeObserver for &mut O {
    fn hull_merged(&mut self, view: &MergeView<'_>, hull: &[SiteId], cross: &CrossEdges) {
        (**self).hull_merged(view, hull, cross)
    }
    fn chain_step(&mut self, view: &MergeView<'_>, at: Point) {
        (**self).chain_step(view, at)
    }
    fn pruned(&mut self, view: &MergeView<'_>, removed: &[EdgeId]) {
        (**self).pruned(view, removed)
    }
}
