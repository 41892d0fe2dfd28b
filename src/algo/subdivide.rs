//! Recursive triangle subdivision with a shared edge table.
//!
//! Every base triangle is split into four by inserting edge midpoints. Edges
//! live in a single arena keyed by their sorted vertex pair, so the two
//! triangles on either side of an edge split it once and share the midpoint.
//!
//! Each edge carries three weights (`w0`, `w1`, `wc`) describing how close it
//! lies to the inside of a base face. Base edges start at `wc = weight`
//! (default 1); interior edges created at recursion level `l` get
//! `wc = l + 2`; the halves of a split edge interpolate the parent's weights.
//! The spanning tree later prefers high-`wc` edges as folds.
//!
//! At the final depth every surviving edge learns which triangle lies on
//! each side of it: slot 0 holds the face that traverses the edge in its
//! stored `v0 → v1` direction, slot 1 the face that traverses it backwards.
//!
//! # Example
//!
//! ```
//! use myriahedral::algo::subdivide::{subdivide, SubdivideOptions};
//! use myriahedral::mesh::solids::tetrahedron;
//!
//! let mesh = subdivide(&tetrahedron(), &SubdivideOptions::new(1)).unwrap();
//! assert_eq!(mesh.num_faces(), 16);
//! assert_eq!(mesh.num_edges(), 24);
//! ```

use std::collections::HashMap;

use nalgebra::Point3;

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::math::{middle, normalize_to_sphere};
use crate::mesh::{EdgeId, FaceId, Polyhedron, VertexId};

/// Options for subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of recursive 1-to-4 splits.
    pub depth: usize,

    /// Whether to project every vertex onto the unit sphere afterwards.
    pub normalize: bool,
}

impl SubdivideOptions {
    /// Create options for the given depth, normalizing to the sphere.
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            normalize: true,
        }
    }

    /// Set whether to normalize vertices to the unit sphere.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(3)
    }
}

/// An undirected mesh edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Endpoints in insertion order. This order defines the edge direction
    /// used to assign face slots.
    pub vertices: [VertexId; 2],
    /// Weight at the `vertices[0]` end.
    pub w0: f64,
    /// Weight at the `vertices[1]` end.
    pub w1: f64,
    /// Central weight, used to rank fold candidates.
    pub wc: f64,
    /// Midpoint vertex once the edge has been split.
    pub center: Option<VertexId>,
    /// Faces on either side: `[forward, backward]`.
    pub faces: [Option<FaceId>; 2],
}

impl Edge {
    fn new(v0: VertexId, v1: VertexId, w0: f64, w1: f64, wc: f64) -> Self {
        Self {
            vertices: [v0, v1],
            w0,
            w1,
            wc,
            center: None,
            faces: [None, None],
        }
    }

    /// Sorted vertex pair identifying this edge.
    #[inline]
    pub fn key(&self) -> (VertexId, VertexId) {
        edge_key(self.vertices[0], self.vertices[1])
    }

    /// Whether the edge has been split into two halves.
    #[inline]
    pub fn is_split(&self) -> bool {
        self.center.is_some()
    }

    /// Number of faces recorded on this edge.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_some()).count()
    }
}

#[inline]
fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Edge arena with symmetric lookup by vertex pair.
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    edges: Vec<Edge>,
    lookup: HashMap<(VertexId, VertexId), EdgeId>,
}

impl EdgeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of edges, including split ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Look up the edge between two vertices, in either order.
    #[inline]
    pub fn find(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.lookup.get(&edge_key(a, b)).copied()
    }

    /// Borrow an edge.
    #[inline]
    pub fn get(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Iterate over all edges.
    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Insert an edge with explicit weights.
    ///
    /// If the vertex pair already has an edge the table is left unchanged
    /// and the existing id is returned.
    pub fn insert(&mut self, v0: VertexId, v1: VertexId, w0: f64, w1: f64, wc: f64) -> EdgeId {
        let key = edge_key(v0, v1);
        if let Some(&existing) = self.lookup.get(&key) {
            log::debug!("edge {:?}-{:?} already present, skipping", v0, v1);
            return existing;
        }
        let id = EdgeId::new(self.edges.len());
        self.edges.push(Edge::new(v0, v1, w0, w1, wc));
        self.lookup.insert(key, id);
        id
    }

    /// Insert an interior edge created at recursion `level`.
    pub fn insert_at_level(&mut self, v0: VertexId, v1: VertexId, level: usize) -> EdgeId {
        let l = (level + 1) as f64;
        self.insert(v0, v1, l, l, l + 1.0)
    }

    /// Insert a base edge whose central weight is `weight`.
    pub fn insert_base(&mut self, v0: VertexId, v1: VertexId, weight: f64) -> EdgeId {
        self.insert(v0, v1, 0.0, 0.0, weight)
    }

    /// Split an edge at its midpoint, appending the midpoint to `vertices`.
    ///
    /// Splitting an edge that is already split is a no-op and returns the
    /// existing midpoint.
    fn split(&mut self, id: EdgeId, vertices: &mut Vec<Point3<f64>>) -> VertexId {
        let edge = &self.edges[id.index()];
        if let Some(center) = edge.center {
            return center;
        }

        let [v0, v1] = edge.vertices;
        let (w0, w1, wc) = (edge.w0, edge.w1, edge.wc);

        let midpoint = middle(&vertices[v0.index()], &vertices[v1.index()]);
        let m = VertexId::new(vertices.len());
        vertices.push(midpoint);
        self.edges[id.index()].center = Some(m);

        self.insert(v0, m, w0, wc, (w0 + wc) / 2.0);
        self.insert(m, v1, wc, w1, (wc + w1) / 2.0);
        m
    }

    /// Record `face` on the edge between `from` and `to`, traversed in that
    /// direction.
    fn assign_face(&mut self, from: VertexId, to: VertexId, face: FaceId) -> Result<()> {
        let id = self.require(from, to)?;
        let edge = &mut self.edges[id.index()];
        let preferred = if edge.vertices[0] == from { 0 } else { 1 };

        if edge.faces[preferred].is_none() {
            edge.faces[preferred] = Some(face);
        } else if edge.faces[1 - preferred].is_none() {
            log::debug!(
                "edge {:?}-{:?}: slot {} taken, placing {:?} in the other slot",
                edge.vertices[0],
                edge.vertices[1],
                preferred,
                face
            );
            edge.faces[1 - preferred] = Some(face);
        } else {
            return Err(MeshError::NonManifoldEdge {
                v0: from.index(),
                v1: to.index(),
            });
        }
        Ok(())
    }

    fn require(&self, a: VertexId, b: VertexId) -> Result<EdgeId> {
        self.find(a, b).ok_or(MeshError::MissingEdge {
            v0: a.index(),
            v1: b.index(),
        })
    }
}

/// Result of subdividing a base polyhedron.
#[derive(Debug, Clone)]
pub struct SubdividedMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,
    /// Triangles in depth-first recursion order.
    pub triangles: Vec<[VertexId; 3]>,
    /// Edges that survived to the final depth; `EdgeId`s index this list.
    pub edges: Vec<Edge>,
}

impl SubdividedMesh {
    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.triangles.len()
    }

    /// Number of surviving edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Borrow an edge.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Positions of a triangle's corners.
    #[inline]
    pub fn triangle_positions(&self, face: FaceId) -> [Point3<f64>; 3] {
        self.triangles[face.index()].map(|v| self.vertices[v.index()])
    }
}

/// Subdivide a base polyhedron.
///
/// # Errors
/// Fails if the base polyhedron is invalid, if a triangle side is missing
/// from its explicit edge list, or if an edge ends up with more than two
/// faces.
pub fn subdivide(base: &Polyhedron, options: &SubdivideOptions) -> Result<SubdividedMesh> {
    subdivide_with_progress(base, options, &Progress::none())
}

/// Subdivision with progress reporting, one step per base face.
pub fn subdivide_with_progress(
    base: &Polyhedron,
    options: &SubdivideOptions,
    progress: &Progress,
) -> Result<SubdividedMesh> {
    subdivide_in_stage(base, options, progress, 0, 1)
}

/// Largest face count whose duplicated vertices still fit 32-bit indices.
const MAX_FACES: usize = u32::MAX as usize / 3;

/// Number of faces after `depth` levels, if it stays addressable.
fn face_count(base_faces: usize, depth: usize) -> Result<usize> {
    u32::try_from(depth)
        .ok()
        .and_then(|d| 4usize.checked_pow(d))
        .and_then(|f| f.checked_mul(base_faces))
        .filter(|&f| f <= MAX_FACES)
        .ok_or_else(|| MeshError::invalid_param("depth", depth, "face count exceeds 32-bit indices"))
}

/// Subdivision reporting as stage `stage` of `stages` of a larger build.
pub(crate) fn subdivide_in_stage(
    base: &Polyhedron,
    options: &SubdivideOptions,
    progress: &Progress,
    stage: usize,
    stages: usize,
) -> Result<SubdividedMesh> {
    base.validate()?;

    let depth = options.depth;
    let expected_faces = face_count(base.num_faces(), depth)?;

    let mut vertices = base.vertices.clone();
    let mut triangles: Vec<[VertexId; 3]> = Vec::with_capacity(expected_faces);
    let mut table = EdgeTable::new();

    for edge in base.edge_list() {
        let [a, b] = edge.vertices;
        table.insert_base(VertexId::new(a), VertexId::new(b), edge.weight);
    }

    let total = base.num_faces();
    let mut stack: Vec<(usize, [VertexId; 3])> = Vec::new();

    for (fi, face) in base.faces.iter().enumerate() {
        progress.report_sub(fi, total, stage, stages, "Subdividing");
        stack.push((0, face.map(VertexId::new)));

        while let Some((level, [a, b, c])) = stack.pop() {
            if level == depth {
                let face = FaceId::new(triangles.len());
                table.assign_face(a, b, face)?;
                table.assign_face(b, c, face)?;
                table.assign_face(c, a, face)?;
                triangles.push([a, b, c]);
                continue;
            }

            let ab = table.require(a, b)?;
            let bc = table.require(b, c)?;
            let ca = table.require(c, a)?;
            let m_ab = table.split(ab, &mut vertices);
            let m_bc = table.split(bc, &mut vertices);
            let m_ca = table.split(ca, &mut vertices);

            table.insert_at_level(m_ab, m_ca, level);
            table.insert_at_level(m_ab, m_bc, level);
            table.insert_at_level(m_ca, m_bc, level);

            // Reverse order so the stack yields children depth-first in
            // corner, corner, center, corner order.
            stack.push((level + 1, [m_ca, m_bc, c]));
            stack.push((level + 1, [m_bc, m_ca, m_ab]));
            stack.push((level + 1, [m_ab, b, m_bc]));
            stack.push((level + 1, [a, m_ab, m_ca]));
        }
    }
    progress.report_sub(total, total, stage, stages, "Subdividing");

    if options.normalize {
        for v in vertices.iter_mut() {
            *v = normalize_to_sphere(v);
        }
    }

    let mut edges = Vec::with_capacity(table.len());
    for edge in table.edges {
        if edge.is_split() {
            continue;
        }
        if edge.face_count() == 0 {
            log::debug!(
                "dropping edge {:?}-{:?}: not a side of any face",
                edge.vertices[0],
                edge.vertices[1]
            );
            continue;
        }
        edges.push(edge);
    }

    log::debug!(
        "subdivided {} to depth {}: {} vertices, {} faces, {} edges",
        base.name,
        depth,
        vertices.len(),
        triangles.len(),
        edges.len()
    );

    Ok(SubdividedMesh {
        vertices,
        triangles,
        edges,
    })
}
