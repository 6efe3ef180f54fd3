//! Divide-and-conquer Voronoi diagrams in the plane.
//!
//! The crate builds the Voronoi diagram of a finite set of distinct 2D sites
//! as a doubly-connected edge list (sites, vertices, edges with cyclic
//! neighbor links). Sub-diagrams are merged bottom-up: the merged convex hull
//! yields the upper and lower tangents, and a chain of perpendicular
//! bisectors is grown downward between them and spliced into both halves.
//!
//! Layout
//! - `geometry`: `Point`, cross product, orientation test.
//! - `dcel`: index-addressed arena and the final `Diagram`.
//! - `merge`: hull merge, tangent location, intersection, chain builder, pruning.
//! - `driver`: input normalization and the recursion.
//! - `observer`: optional checkpoint callbacks for visualization layers.
//! - `io`: persisted text formats.
//! - `sample`: reproducible random site sets.

pub mod cfg;
pub mod dcel;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod io;
pub mod merge;
pub mod observer;
pub mod sample;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::{VoronoiCfg, PRECISION};
pub use dcel::{Diagram, Edge, EdgeId, Site, SiteId, Vertex, VertexId};
pub use driver::{build_voronoi, build_voronoi_with, normalize_sites};
pub use error::VoronoiError;
pub use geometry::{ccw, cross, Point};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::{VoronoiCfg, PRECISION};
    pub use crate::dcel::{Diagram, Edge, EdgeId, Site, SiteId, Vertex, VertexId};
    pub use crate::driver::{build_voronoi, build_voronoi_with};
    pub use crate::error::VoronoiError;
    pub use crate::geometry::{ccw, cross, Point};
    pub use crate::io::{parse_cases, DiagramFile};
    pub use crate::observer::{MergeObserver, NoopObserver, Recorder};
    pub use crate::sample::{draw_sites, ReplayToken, SiteCfg};
    pub use nalgebra::Vector2;
}
