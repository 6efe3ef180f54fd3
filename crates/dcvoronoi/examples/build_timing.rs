//! Timing probe for full diagram builds.
//!
//! Usage:
//!   cargo run --release -p dcvoronoi --example build_timing -- 10000
//!
//! Draws one float site set of the requested size, builds its diagram, and
//! prints counts plus wall time. Merge statistics come from a `Recorder`.

use std::time::Instant;

use dcvoronoi::prelude::*;

fn main() {
    let count: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2000);
    let cfg = SiteCfg {
        count,
        extent: 1000.0,
        integer: false,
    };
    let sites = draw_sites(cfg, ReplayToken { seed: 2025, index: 0 });

    let mut rec = Recorder::default();
    let start = Instant::now();
    let diagram = build_voronoi_with(&sites, &VoronoiCfg::default(), &mut rec)
        .expect("float sites are in general position");
    let elapsed = start.elapsed().as_secs_f64() * 1e3;

    let longest_chain = rec.chain_lengths.iter().copied().max().unwrap_or(0);
    println!(
        "sites={} edges={} unbounded={}",
        diagram.sites().len(),
        diagram.edges().len(),
        diagram.unbounded_edge_count()
    );
    println!(
        "merges={} chain_hits={} longest_chain={longest_chain} pruned={}",
        rec.merges,
        rec.chain_hits.len(),
        rec.pruned.len()
    );
    println!("build_time_ms={elapsed:.3}");
}
