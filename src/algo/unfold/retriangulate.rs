//! Cut/duplicate step.
//!
//! Every face gets three vertices of its own so that faces can move
//! independently. Face `f` owns vertices `3f`, `3f + 1`, `3f + 2`, copied
//! from its corners in the subdivided mesh; face ids are unchanged.

use nalgebra::{Point3, Vector3};

use crate::algo::fold::{DualGraph, SpanningTree};
use crate::algo::subdivide::SubdividedMesh;
use crate::error::{MeshError, Result};
use crate::mesh::math::{face_normal, triangle_normal};
use crate::mesh::{EdgeId, FaceId, FoldId, VertexId};

/// What bounds one side of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// A hinge shared with the neighbouring face.
    Fold(FoldId),
    /// A severed edge shared with the neighbouring face.
    Cut(FoldId),
    /// An open edge with no neighbour.
    Boundary(EdgeId),
}

/// Per-face record after vertex duplication.
#[derive(Debug, Clone)]
pub struct FaceInfo {
    /// The face's own vertices in the duplicated buffer.
    pub vertices: [VertexId; 3],
    /// Side `k` runs from corner `k` to corner `k + 1`.
    pub bounds: [Bound; 3],
    /// Corner vertices in the subdivided mesh numbering.
    pub prev_vertices: [VertexId; 3],
    /// Unit normal of the canonical (folded) face.
    pub normal: Vector3<f64>,
}

impl FaceInfo {
    /// Local corner index (0..3) of a subdivided-mesh vertex.
    #[inline]
    pub fn corner_of(&self, v: VertexId) -> Option<usize> {
        self.prev_vertices.iter().position(|&p| p == v)
    }
}

/// The duplicated mesh.
#[derive(Debug, Clone)]
pub struct Retriangulated {
    /// Canonical positions, three per face.
    pub positions: Vec<Point3<f64>>,
    /// Face records, indexed by face id.
    pub faces: Vec<FaceInfo>,
}

impl Retriangulated {
    /// Duplicate vertices and classify every face side.
    ///
    /// # Errors
    /// Returns [`MeshError::FaceEdgeCount`] if a face is not bounded by
    /// exactly three fold, cut or boundary edges.
    pub fn build(mesh: &SubdividedMesh, graph: &DualGraph, tree: &SpanningTree) -> Result<Self> {
        let n = mesh.num_faces();
        let mut sides: Vec<Vec<(usize, Bound)>> = vec![Vec::with_capacity(3); n];

        let side_of = |face: FaceId, a: VertexId, b: VertexId| -> Option<usize> {
            let t = mesh.triangles[face.index()];
            (0..3).find(|&k| {
                let (p, q) = (t[k], t[(k + 1) % 3]);
                (p == a && q == b) || (p == b && q == a)
            })
        };

        let mut misplaced = vec![0usize; n];
        for (i, edge) in graph.edges().iter().enumerate() {
            let id = FoldId::new(i);
            let bound = if tree.is_fold(id) {
                Bound::Fold(id)
            } else {
                Bound::Cut(id)
            };
            let [a, b] = edge.vertices;
            for face in [edge.from, edge.to] {
                match side_of(face, a, b) {
                    Some(k) => sides[face.index()].push((k, bound)),
                    None => misplaced[face.index()] += 1,
                }
            }
        }

        for &eid in graph.boundary() {
            let edge = mesh.edge(eid);
            let [a, b] = edge.vertices;
            for face in edge.faces.iter().flatten() {
                match side_of(*face, a, b) {
                    Some(k) => sides[face.index()].push((k, Bound::Boundary(eid))),
                    None => misplaced[face.index()] += 1,
                }
            }
        }

        let mut positions = Vec::with_capacity(3 * n);
        let mut faces = Vec::with_capacity(n);
        let mut degenerate = 0;

        for (fi, mut found) in sides.into_iter().enumerate() {
            let count = found.len() + misplaced[fi];
            found.sort_by_key(|&(k, _)| k);
            let distinct = found.windows(2).all(|w| w[0].0 != w[1].0);
            if count != 3 || !distinct {
                return Err(MeshError::FaceEdgeCount { face: fi, count });
            }

            let face = FaceId::new(fi);
            let prev_vertices = mesh.triangles[fi];
            let corners = mesh.triangle_positions(face);
            if triangle_normal(&corners[0], &corners[1], &corners[2]).is_none() {
                degenerate += 1;
            }

            let base = positions.len();
            positions.extend_from_slice(&corners);
            faces.push(FaceInfo {
                vertices: [
                    VertexId::new(base),
                    VertexId::new(base + 1),
                    VertexId::new(base + 2),
                ],
                bounds: [found[0].1, found[1].1, found[2].1],
                prev_vertices,
                normal: face_normal(&corners),
            });
        }

        if degenerate > 0 {
            log::warn!(
                "{} degenerate faces, using radial direction as their normal",
                degenerate
            );
        }

        Ok(Self { positions, faces })
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Canonical corner positions of a face.
    #[inline]
    pub fn corners(&self, face: FaceId) -> [Point3<f64>; 3] {
        self.faces[face.index()]
            .vertices
            .map(|v| self.positions[v.index()])
    }
}
