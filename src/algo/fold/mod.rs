//! Fold/cut selection.
//!
//! The faces of a subdivided mesh and the edges they share form the dual
//! graph. A maximum-preference spanning tree over that graph decides which
//! shared edges stay hinged (folds) and which are severed (cuts); the tree
//! is then rooted and oriented so the unfold engine can compose rotations
//! from the root outward.
//!
//! # Example
//!
//! ```
//! use myriahedral::algo::fold::{DualGraph, FoldTree};
//! use myriahedral::algo::subdivide::{subdivide, SubdivideOptions};
//! use myriahedral::mesh::solids::octahedron;
//!
//! let mesh = subdivide(&octahedron(), &SubdivideOptions::new(1)).unwrap();
//! let mut graph = DualGraph::build(&mesh);
//! let tree = graph.spanning_tree().unwrap();
//! let folds = FoldTree::build(&mut graph, &tree).unwrap();
//!
//! assert_eq!(folds.len(), mesh.num_faces() - 1);
//! ```

mod dual;
mod tree;

pub use dual::{DualGraph, FaceEdge, SpanningTree};
pub use tree::FoldTree;

/// A fold expressed as the pair of faces it hinges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FoldPair {
    /// Face the fold rotates from (closer to the root).
    pub f0: usize,
    /// Face the fold rotates.
    pub f1: usize,
}

/// A cut expressed as the mesh vertices of the severed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CutEdge {
    /// First vertex, in the subdivided mesh numbering.
    pub v0: usize,
    /// Second vertex, in the subdivided mesh numbering.
    pub v1: usize,
}
