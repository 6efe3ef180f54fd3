//! Reproducible random site sets.
//!
//! Sites are drawn uniformly from the square `[0, extent]²`, optionally
//! snapped to integer coordinates (the classic hand-entered test format).
//! Draws are addressed by a replay token `(seed, index)`, so the `k`-th set of
//! a run can be regenerated without replaying the ones before it.
//!
//! Integer sets can contain duplicates and cocircular quadruples; float sets
//! are in general position with probability one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::Point;

/// Site sampler configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SiteCfg {
    pub count: usize,
    /// Side length of the sampling square. Non-positive values give a
    /// unit square.
    pub extent: f64,
    /// Round coordinates to integers.
    pub integer: bool,
}

impl Default for SiteCfg {
    fn default() -> Self {
        Self {
            count: 16,
            extent: 100.0,
            integer: false,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

/// 64-bit golden-ratio increment of the SplitMix64 sequence.
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// SplitMix64 output finalizer (Stafford's "Mix13" constants): a bijection
/// on `u64` that spreads every input bit over the whole word, so nearby
/// `(seed, index)` pairs get unrelated stream seeds.
#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

impl ReplayToken {
    /// Generator for this draw: the `index`-th SplitMix64 state after
    /// `seed`, finalized.
    fn to_std_rng(self) -> StdRng {
        let state = self
            .seed
            .wrapping_add(self.index.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA));
        StdRng::seed_from_u64(splitmix64(state))
    }

    /// Token for the next draw of the same run.
    pub fn successor(self) -> Self {
        Self {
            seed: self.seed,
            index: self.index.wrapping_add(1),
        }
    }
}

/// Draw `cfg.count` sites (before any deduplication).
pub fn draw_sites(cfg: SiteCfg, tok: ReplayToken) -> Vec<Point> {
    let mut rng = tok.to_std_rng();
    let extent = if cfg.extent > 0.0 { cfg.extent } else { 1.0 };
    (0..cfg.count)
        .map(|_| {
            let x = rng.gen::<f64>() * extent;
            let y = rng.gen::<f64>() * extent;
            if cfg.integer {
                Point::new(x.round(), y.round())
            } else {
                Point::new(x, y)
            }
        })
        .collect()
}
