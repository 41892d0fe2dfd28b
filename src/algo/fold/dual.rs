//! Dual graph and spanning tree.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::algo::subdivide::SubdividedMesh;
use crate::error::{MeshError, Result};
use crate::mesh::{EdgeId, FaceId, FoldId, VertexId};

/// A dual-graph edge: two faces sharing a mesh edge.
///
/// `from`/`to` and the vertex order are changed together by [`swap`](Self::swap),
/// so the edge and its reverse never coexist.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceEdge {
    /// The shared mesh edge.
    pub edge: EdgeId,
    /// Endpoints of the shared edge, in the order `from` traverses them.
    pub vertices: [VertexId; 2],
    /// Face on the root side once the fold tree is built.
    pub from: FaceId,
    /// Face on the leaf side once the fold tree is built.
    pub to: FaceId,
    /// Spanning tree weight (negated central weight of the mesh edge).
    pub weight: f64,
    /// Sign applied to the unfolding rotation, `1.0` or `-1.0`.
    pub orientation: f64,
}

impl FaceEdge {
    /// Reverse the edge direction.
    pub fn swap(&mut self) {
        self.vertices.swap(0, 1);
        std::mem::swap(&mut self.from, &mut self.to);
    }

    /// Whether `face` is one of the two endpoints.
    #[inline]
    pub fn touches(&self, face: FaceId) -> bool {
        self.from == face || self.to == face
    }

    /// The endpoint opposite `face`, if `face` is an endpoint.
    #[inline]
    pub fn other(&self, face: FaceId) -> Option<FaceId> {
        if self.from == face {
            Some(self.to)
        } else if self.to == face {
            Some(self.from)
        } else {
            None
        }
    }

    /// Endpoints as a sorted pair.
    #[inline]
    fn face_key(&self) -> (FaceId, FaceId) {
        if self.from < self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        }
    }
}

/// Face adjacency graph of a subdivided mesh.
#[derive(Debug, Clone)]
pub struct DualGraph {
    edges: Vec<FaceEdge>,
    adjacency: Vec<Vec<FoldId>>,
    boundary: Vec<EdgeId>,
}

impl DualGraph {
    /// Build the dual graph: one [`FaceEdge`] per mesh edge with two faces.
    ///
    /// Edges with a single face (open boundaries) are not part of the graph
    /// and are listed by [`boundary`](Self::boundary) instead.
    pub fn build(mesh: &SubdividedMesh) -> Self {
        let mut edges = Vec::with_capacity(mesh.num_edges());
        let mut adjacency = vec![Vec::new(); mesh.num_faces()];
        let mut boundary = Vec::new();

        for (ei, edge) in mesh.edges.iter().enumerate() {
            let id = EdgeId::new(ei);
            let (from, to) = match edge.faces {
                [Some(a), Some(b)] if a != b => (a, b),
                [Some(_), Some(_)] => {
                    log::debug!("edge {:?} borders the same face twice, ignoring", id);
                    continue;
                }
                _ => {
                    boundary.push(id);
                    continue;
                }
            };

            let fold = FoldId::new(edges.len());
            adjacency[from.index()].push(fold);
            adjacency[to.index()].push(fold);
            edges.push(FaceEdge {
                edge: id,
                vertices: edge.vertices,
                from,
                to,
                weight: -edge.wc,
                orientation: 1.0,
            });
        }

        log::debug!(
            "dual graph: {} faces, {} dual edges, {} boundary edges",
            adjacency.len(),
            edges.len(),
            boundary.len()
        );

        Self {
            edges,
            adjacency,
            boundary,
        }
    }

    /// Number of faces (dual nodes).
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of dual edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Borrow a dual edge.
    #[inline]
    pub fn edge(&self, id: FoldId) -> &FaceEdge {
        &self.edges[id.index()]
    }

    /// Mutably borrow a dual edge.
    #[inline]
    pub fn edge_mut(&mut self, id: FoldId) -> &mut FaceEdge {
        &mut self.edges[id.index()]
    }

    /// All dual edges, indexed by [`FoldId`].
    #[inline]
    pub fn edges(&self) -> &[FaceEdge] {
        &self.edges
    }

    /// Dual edges incident to a face.
    #[inline]
    pub fn incident(&self, face: FaceId) -> &[FoldId] {
        &self.adjacency[face.index()]
    }

    /// Mesh edges with fewer than two faces.
    #[inline]
    pub fn boundary(&self) -> &[EdgeId] {
        &self.boundary
    }

    /// Grow a minimum-weight spanning tree from face 0 (Prim).
    ///
    /// Equal weights are broken by the sorted face pair, then by dual edge
    /// id, so the result does not depend on hashing or insertion order.
    ///
    /// # Errors
    /// Returns [`MeshError::DisconnectedDualGraph`] if some face cannot be
    /// reached, and [`MeshError::EmptyMesh`] if there are no faces.
    pub fn spanning_tree(&self) -> Result<SpanningTree> {
        let total = self.num_faces();
        if total == 0 {
            return Err(MeshError::EmptyMesh);
        }

        let mut in_tree = vec![false; total];
        let mut is_fold = vec![false; self.edges.len()];
        let mut folds = Vec::with_capacity(total - 1);
        let mut heap = BinaryHeap::new();

        let mut reached = 1;
        in_tree[0] = true;
        self.push_frontier(FaceId::new(0), &in_tree, &mut heap);

        while reached < total {
            let Some(entry) = heap.pop() else {
                return Err(MeshError::DisconnectedDualGraph { reached, total });
            };

            let edge = &self.edges[entry.fold.index()];
            let next = match (in_tree[edge.from.index()], in_tree[edge.to.index()]) {
                (true, false) => edge.to,
                (false, true) => edge.from,
                _ => continue,
            };

            in_tree[next.index()] = true;
            is_fold[entry.fold.index()] = true;
            folds.push(entry.fold);
            reached += 1;
            self.push_frontier(next, &in_tree, &mut heap);
        }

        let cuts: Vec<FoldId> = (0..self.edges.len())
            .filter(|&i| !is_fold[i])
            .map(FoldId::new)
            .collect();

        log::debug!("spanning tree: {} folds, {} cuts", folds.len(), cuts.len());

        Ok(SpanningTree {
            folds,
            cuts,
            is_fold,
        })
    }

    fn push_frontier(&self, face: FaceId, in_tree: &[bool], heap: &mut BinaryHeap<PrimEntry>) {
        for &fold in self.incident(face) {
            let edge = &self.edges[fold.index()];
            if let Some(other) = edge.other(face) {
                if !in_tree[other.index()] {
                    heap.push(PrimEntry::new(fold, edge));
                }
            }
        }
    }
}

/// Candidate edge in Prim's priority queue.
#[derive(Debug, Clone)]
struct PrimEntry {
    weight: f64,
    faces: (FaceId, FaceId),
    fold: FoldId,
}

impl PrimEntry {
    fn new(fold: FoldId, edge: &FaceEdge) -> Self {
        Self {
            weight: edge.weight,
            faces: edge.face_key(),
            fold,
        }
    }

    fn key(&self) -> (f64, FaceId, FaceId, FoldId) {
        (self.weight, self.faces.0, self.faces.1, self.fold)
    }
}

impl PartialEq for PrimEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PrimEntry {}

impl PartialOrd for PrimEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PrimEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap and we want the smallest key.
        let (wa, a0, a1, af) = self.key();
        let (wb, b0, b1, bf) = other.key();
        wb.total_cmp(&wa)
            .then_with(|| b0.cmp(&a0))
            .then_with(|| b1.cmp(&a1))
            .then_with(|| bf.cmp(&af))
    }
}

/// Partition of the dual edges into folds and cuts.
#[derive(Debug, Clone)]
pub struct SpanningTree {
    /// Fold edges, in the order the tree grew.
    pub folds: Vec<FoldId>,
    /// All remaining dual edges.
    pub cuts: Vec<FoldId>,
    is_fold: Vec<bool>,
}

impl SpanningTree {
    /// Whether a dual edge is a fold.
    #[inline]
    pub fn is_fold(&self, id: FoldId) -> bool {
        self.is_fold[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::subdivide::{subdivide, SubdivideOptions};
    use crate::mesh::solids::{cube, icosahedron, tetrahedron};
    use crate::mesh::{BaseEdge, Polyhedron};
    use nalgebra::Point3;

    fn graph(base: &Polyhedron, depth: usize) -> DualGraph {
        DualGraph::build(&subdivide(base, &SubdivideOptions::new(depth)).unwrap())
    }

    #[test]
    fn test_closed_mesh_has_no_boundary() {
        let g = graph(&icosahedron(), 2);
        assert_eq!(g.num_faces(), 320);
        assert_eq!(g.num_edges(), 480);
        assert!(g.boundary().is_empty());
        for f in 0..g.num_faces() {
            assert_eq!(g.incident(FaceId::new(f)).len(), 3);
        }
    }

    #[test]
    fn test_spanning_tree_size() {
        let g = graph(&icosahedron(), 3);
        let tree = g.spanning_tree().unwrap();
        assert_eq!(tree.folds.len(), g.num_faces() - 1);
        assert_eq!(tree.cuts.len(), g.num_edges() - (g.num_faces() - 1));
        assert!(tree.folds.iter().all(|&f| tree.is_fold(f)));
        assert!(tree.cuts.iter().all(|&f| !tree.is_fold(f)));
    }

    #[test]
    fn test_spanning_tree_is_deterministic() {
        let a = graph(&cube(), 2).spanning_tree().unwrap();
        let b = graph(&cube(), 2).spanning_tree().unwrap();
        assert_eq!(a.folds, b.folds);
    }

    #[test]
    fn test_folds_stay_inside_base_faces() {
        // At depth 1 the three interior edges of each base face weigh more
        // than the split base edges, so every interior edge is a fold.
        let mesh = subdivide(&tetrahedron(), &SubdivideOptions::new(1)).unwrap();
        let g = DualGraph::build(&mesh);
        let tree = g.spanning_tree().unwrap();
        let interior = tree
            .folds
            .iter()
            .filter(|&&f| g.edge(f).weight == -2.0)
            .count();
        assert_eq!(interior, 12);
        assert_eq!(tree.folds.len(), 15);
    }

    #[test]
    fn test_swap_reverses_both_orders() {
        let g = graph(&tetrahedron(), 0);
        let mut e = g.edge(FoldId::new(0)).clone();
        let before = e.clone();
        e.swap();
        assert_eq!(e.from, before.to);
        assert_eq!(e.to, before.from);
        assert_eq!(e.vertices, [before.vertices[1], before.vertices[0]]);
        assert_eq!(e.other(e.from), Some(e.to));
        assert!(e.touches(before.from));
    }

    #[test]
    fn test_open_mesh_boundary_and_disconnected_error() {
        // Two triangles sharing nothing but a vertex: four-edge boundary
        // each, no dual edges between them.
        let poly = Polyhedron::new(
            "bowtie",
            vec![
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(1.0, 0.0, 1.0),
                Point3::new(0.0, 1.0, 1.0),
                Point3::new(-1.0, 0.0, 1.0),
                Point3::new(0.0, -1.0, 1.0),
            ],
            vec![[0, 1, 2], [0, 3, 4]],
        );
        let mesh = subdivide(&poly, &SubdivideOptions::new(0).with_normalize(false)).unwrap();
        let g = DualGraph::build(&mesh);
        assert_eq!(g.num_edges(), 0);
        assert_eq!(g.boundary().len(), 6);
        assert!(matches!(
            g.spanning_tree(),
            Err(MeshError::DisconnectedDualGraph { reached: 1, total: 2 })
        ));
    }

    #[test]
    fn test_base_weight_becomes_dual_weight() {
        // Two triangles sharing the explicitly weighted edge 1-2.
        let poly = Polyhedron::new(
            "strip",
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [1, 3, 2]],
        )
        .with_edges(vec![
            BaseEdge::new(0, 1),
            BaseEdge::weighted(1, 2, 4.0),
            BaseEdge::new(2, 0),
            BaseEdge::new(1, 3),
            BaseEdge::new(3, 2),
        ]);
        let mesh = subdivide(&poly, &SubdivideOptions::new(0).with_normalize(false)).unwrap();
        let g = DualGraph::build(&mesh);
        assert_eq!(g.num_edges(), 1);
        assert_eq!(g.edge(FoldId::new(0)).weight, -4.0);
        assert_eq!(g.boundary().len(), 4);
    }
}
