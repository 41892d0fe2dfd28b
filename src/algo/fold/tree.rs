//! Rooted fold tree.
//!
//! The spanning tree's folds are linked into a tree whose edges all point
//! away from a single root face: every fold's `from` face is its parent's
//! `to` face. The root fold is the one hanging off the lowest-numbered leaf
//! face, so that leaf is the face that stays fixed while the rest of the
//! mesh unfolds around it.

use std::collections::VecDeque;

use super::dual::{DualGraph, SpanningTree};
use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, FoldId};

/// Folds incident to `face`.
fn folds_of(graph: &DualGraph, tree: &SpanningTree, face: FaceId) -> Vec<FoldId> {
    graph
        .incident(face)
        .iter()
        .copied()
        .filter(|&f| tree.is_fold(f))
        .collect()
}

/// Folds linked as a rooted tree, stored as index arenas.
#[derive(Debug, Clone)]
pub struct FoldTree {
    root: Option<FoldId>,
    root_face: FaceId,
    /// Folds in breadth-first order from the root.
    order: Vec<FoldId>,
    /// Parent of each dual edge; `None` for the root and for cuts.
    parent: Vec<Option<FoldId>>,
    children: Vec<Vec<FoldId>>,
    /// Fold through which each face is reached; `None` for the root face.
    incoming: Vec<Option<FoldId>>,
    depth: usize,
}

impl FoldTree {
    /// Root and orient the folds of `tree`.
    ///
    /// Folds are [`swap`](super::FaceEdge::swap)ped in `graph` where needed so
    /// that every fold points away from the root.
    ///
    /// # Errors
    /// Returns [`MeshError::FoldTree`] if the folds do not form a single tree
    /// covering every face.
    pub fn build(graph: &mut DualGraph, tree: &SpanningTree) -> Result<Self> {
        let num_faces = graph.num_faces();
        let num_edges = graph.num_edges();

        let mut parent = vec![None; num_edges];
        let mut children = vec![Vec::new(); num_edges];
        let mut incoming = vec![None; num_faces];
        let mut order = Vec::with_capacity(tree.folds.len());

        if tree.folds.is_empty() {
            if num_faces == 1 {
                return Ok(Self {
                    root: None,
                    root_face: FaceId::new(0),
                    order,
                    parent,
                    children,
                    incoming,
                    depth: 0,
                });
            }
            return Err(MeshError::FoldTree(format!(
                "{} faces but no folds",
                num_faces
            )));
        }

        let root_face = (0..num_faces)
            .map(FaceId::new)
            .find(|&f| folds_of(graph, tree, f).len() == 1)
            .ok_or_else(|| MeshError::FoldTree("no leaf face".to_string()))?;
        let root = folds_of(graph, tree, root_face)[0];
        if graph.edge(root).from != root_face {
            graph.edge_mut(root).swap();
        }

        let mut visited_fold = vec![false; num_edges];
        let mut visited_face = vec![false; num_faces];
        let mut fold_depth = vec![0usize; num_edges];
        visited_fold[root.index()] = true;
        visited_face[root_face.index()] = true;
        fold_depth[root.index()] = 1;
        order.push(root);

        let mut queue = VecDeque::new();
        queue.push_back(root);

        while let Some(current) = queue.pop_front() {
            let face = graph.edge(current).to;
            if visited_face[face.index()] {
                return Err(MeshError::FoldTree(format!(
                    "face {:?} reached twice",
                    face
                )));
            }
            visited_face[face.index()] = true;
            incoming[face.index()] = Some(current);

            for fold in folds_of(graph, tree, face) {
                if visited_fold[fold.index()] {
                    continue;
                }
                visited_fold[fold.index()] = true;

                if graph.edge(fold).from != face {
                    graph.edge_mut(fold).swap();
                }
                parent[fold.index()] = Some(current);
                children[current.index()].push(fold);
                fold_depth[fold.index()] = fold_depth[current.index()] + 1;
                order.push(fold);
                queue.push_back(fold);
            }
        }

        if order.len() != tree.folds.len() {
            return Err(MeshError::FoldTree(format!(
                "{} of {} folds reachable from the root",
                order.len(),
                tree.folds.len()
            )));
        }
        if let Some(missing) = visited_face.iter().position(|&v| !v) {
            return Err(MeshError::FoldTree(format!(
                "face {} not reachable from the root",
                missing
            )));
        }

        let depth = order.iter().map(|f| fold_depth[f.index()]).max().unwrap_or(0);
        log::debug!(
            "fold tree: root {:?} at face {:?}, {} folds, depth {}",
            root,
            root_face,
            order.len(),
            depth
        );

        Ok(Self {
            root: Some(root),
            root_face,
            order,
            parent,
            children,
            incoming,
            depth,
        })
    }

    /// The root fold, or `None` for a single-face mesh.
    #[inline]
    pub fn root(&self) -> Option<FoldId> {
        self.root
    }

    /// The face that stays fixed during unfolding.
    #[inline]
    pub fn root_face(&self) -> FaceId {
        self.root_face
    }

    /// Folds in breadth-first order: every fold comes after its parent.
    #[inline]
    pub fn order(&self) -> &[FoldId] {
        &self.order
    }

    /// Number of folds.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the tree has no folds.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Parent fold, `None` for the root.
    #[inline]
    pub fn parent(&self, fold: FoldId) -> Option<FoldId> {
        self.parent[fold.index()]
    }

    /// Child folds.
    #[inline]
    pub fn children(&self, fold: FoldId) -> &[FoldId] {
        &self.children[fold.index()]
    }

    /// The fold whose `to` face is `face`, `None` for the root face.
    #[inline]
    pub fn incoming(&self, face: FaceId) -> Option<FoldId> {
        self.incoming[face.index()]
    }

    /// Number of folds on the longest root-to-leaf path.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }
}
