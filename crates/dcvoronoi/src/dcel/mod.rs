//! Doubly-connected edge list of sites, vertices and bisector edges.
//!
//! Purpose
//! - Hold the whole recursion's geometry in one arena addressed by stable
//!   ids (`SiteId`, `VertexId`, `EdgeId`), so cyclic links (site → edge,
//!   edge → edge, vertex → edge) are plain optional indices.
//! - Sub-diagrams are edge-id lists over the shared arena; merging moves ids
//!   into the parent list and never copies records.
//!
//! `Diagram` is the compacted result handed to callers: only surviving edges,
//! densely renumbered.

mod types;

pub use types::{Edge, EdgeId, Site, SiteId, Vertex, VertexId};

use crate::geometry::{Frame, Point};

/// Arena of sites, vertices and edges.
#[derive(Clone, Debug, Default)]
pub struct Dcel {
    sites: Vec<Site>,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl Dcel {
    /// One site per point, in the given order; no edges yet.
    pub fn from_sites(points: &[Point]) -> Self {
        Self {
            sites: points
                .iter()
                .map(|&pos| Site { pos, edge: None })
                .collect(),
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }

    #[inline]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }
    #[inline]
    pub fn site(&self, id: SiteId) -> &Site {
        &self.sites[id.0]
    }
    #[inline]
    pub fn site_pos(&self, id: SiteId) -> Point {
        self.sites[id.0].pos
    }
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }
    /// Number of edges ever allocated (including pruned ones).
    #[inline]
    pub fn edge_capacity(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn start(&self, id: EdgeId) -> &Vertex {
        self.vertex(self.edges[id.0].start)
    }
    #[inline]
    pub fn end(&self, id: EdgeId) -> &Vertex {
        self.vertex(self.edges[id.0].end)
    }

    /// Allocate an edge between `left` and `right` with fresh endpoints.
    /// Endpoints are `(position, infinite)`.
    pub(crate) fn push_edge(
        &mut self,
        left: SiteId,
        right: SiteId,
        start: (Point, bool),
        end: (Point, bool),
    ) -> EdgeId {
        let id = EdgeId(self.edges.len());
        let sv = self.push_vertex(start.0, id, start.1);
        let ev = self.push_vertex(end.0, id, end.1);
        self.edges.push(Edge {
            left,
            right,
            start: sv,
            end: ev,
            cw_predecessor: None,
            ccw_predecessor: None,
            cw_successor: None,
            ccw_successor: None,
        });
        id
    }

    fn push_vertex(&mut self, pos: Point, edge: EdgeId, infinite: bool) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex {
            pos,
            edge,
            infinite,
        });
        id
    }

    #[inline]
    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id.0]
    }
    #[inline]
    pub(crate) fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.0]
    }

    /// Record `edge` as the traversal start of `site` unless it has one.
    pub(crate) fn claim_site_edge(&mut self, site: SiteId, edge: EdgeId) {
        let s = &mut self.sites[site.0];
        if s.edge.is_none() {
            s.edge = Some(edge);
        }
    }

    /// Keep only `live` edges (in that order), renumber densely, and drop
    /// links that point at removed edges.
    pub(crate) fn compact(self, live: &[EdgeId]) -> Diagram {
        let mut remap: Vec<Option<EdgeId>> = vec![None; self.edges.len()];
        for (k, &old) in live.iter().enumerate() {
            remap[old.0] = Some(EdgeId(k));
        }
        let map = |link: Option<EdgeId>| link.and_then(|e| remap[e.0]);

        let mut vertices = Vec::with_capacity(2 * live.len());
        let mut edges = Vec::with_capacity(live.len());
        for (k, &old) in live.iter().enumerate() {
            let e = self.edges[old.0];
            let id = EdgeId(k);
            let start = VertexId(vertices.len());
            vertices.push(Vertex {
                edge: id,
                ..self.vertices[e.start.0]
            });
            let end = VertexId(vertices.len());
            vertices.push(Vertex {
                edge: id,
                ..self.vertices[e.end.0]
            });
            edges.push(Edge {
                left: e.left,
                right: e.right,
                start,
                end,
                cw_predecessor: map(e.cw_predecessor),
                ccw_predecessor: map(e.ccw_predecessor),
                cw_successor: map(e.cw_successor),
                ccw_successor: map(e.ccw_successor),
            });
        }

        let sites = self
            .sites
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let sid = SiteId(i);
                let edge = map(s.edge).or_else(|| {
                    edges
                        .iter()
                        .position(|e: &Edge| e.touches(sid))
                        .map(EdgeId)
                });
                Site { pos: s.pos, edge }
            })
            .collect();

        Diagram {
            dcel: Dcel {
                sites,
                vertices,
                edges,
            },
        }
    }
}

/// A finished Voronoi diagram: every stored edge is part of the result.
#[derive(Clone, Debug, Default)]
pub struct Diagram {
    dcel: Dcel,
}

impl Diagram {
    /// Move every vertex from `frame`'s local coordinates to input space
    /// and put back the exact input `sites` (same order as the arena's).
    pub(crate) fn into_world(mut self, frame: &Frame, sites: &[Point]) -> Self {
        debug_assert_eq!(sites.len(), self.dcel.sites.len());
        for (site, &pos) in self.dcel.sites.iter_mut().zip(sites) {
            site.pos = pos;
        }
        for v in &mut self.dcel.vertices {
            v.pos = frame.to_world(v.pos);
        }
        self
    }

    /// Sites in input order (`x` ascending, ties `y` descending).
    #[inline]
    pub fn sites(&self) -> &[Site] {
        &self.dcel.sites
    }
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.dcel.edges
    }
    #[inline]
    pub fn site(&self, id: SiteId) -> &Site {
        self.dcel.site(id)
    }
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        self.dcel.edge(id)
    }
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        self.dcel.vertex(id)
    }
    /// Underlying arena (read-only).
    #[inline]
    pub fn dcel(&self) -> &Dcel {
        &self.dcel
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.dcel.edges.len()).map(EdgeId)
    }

    /// `(start, end)` of an edge.
    #[inline]
    pub fn endpoints(&self, id: EdgeId) -> (&Vertex, &Vertex) {
        (self.dcel.start(id), self.dcel.end(id))
    }

    /// Edges bounding the cell of `site`.
    pub fn edges_of(&self, site: SiteId) -> Vec<EdgeId> {
        self.edge_ids()
            .filter(|&e| self.dcel.edge(e).touches(site))
            .collect()
    }

    #[inline]
    pub fn is_unbounded(&self, id: EdgeId) -> bool {
        let (s, e) = self.endpoints(id);
        s.infinite || e.infinite
    }

    pub fn unbounded_edge_count(&self) -> usize {
        self.edge_ids().filter(|&e| self.is_unbounded(e)).count()
    }

    pub fn bounded_edge_count(&self) -> usize {
        self.dcel.edges.len() - self.unbounded_edge_count()
    }
}

#[cfg(test)]
mod tests;
