//! Base polyhedron description.
//!
//! A [`Polyhedron`] is the coarse triangulated solid that the subdivision
//! engine refines: vertex positions, counter-clockwise (outward) triangles,
//! and optionally an explicit edge list carrying per-edge fold weights.

use std::collections::{HashMap, HashSet};

use nalgebra::Point3;

use crate::error::{MeshError, Result};

/// Default fold weight of a base edge.
///
/// Edges inserted at subdivision level `l` get weight `l + 1`, so base edges
/// (level 0) weigh `1`.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// An undirected edge of a base polyhedron.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseEdge {
    /// The two endpoint vertex indices.
    pub vertices: [usize; 2],
    /// Fold preference. Higher weights are more likely to become folds.
    pub weight: f64,
}

impl BaseEdge {
    /// Create an edge with the default weight.
    pub fn new(v0: usize, v1: usize) -> Self {
        Self::weighted(v0, v1, DEFAULT_EDGE_WEIGHT)
    }

    /// Create an edge with an explicit weight.
    pub fn weighted(v0: usize, v1: usize, weight: f64) -> Self {
        Self {
            vertices: [v0, v1],
            weight,
        }
    }

    /// Canonical (sorted) key of this edge.
    #[inline]
    pub fn key(&self) -> (usize, usize) {
        let [a, b] = self.vertices;
        if a < b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// A triangulated base solid.
#[derive(Debug, Clone)]
pub struct Polyhedron {
    /// Human readable name.
    pub name: String,
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,
    /// Triangles as counter-clockwise vertex index triples.
    pub faces: Vec<[usize; 3]>,
    /// Optional explicit edge list. Derived from `faces` when absent.
    pub edges: Option<Vec<BaseEdge>>,
}

impl Polyhedron {
    /// Create a polyhedron whose edges are derived from its faces.
    pub fn new(name: impl Into<String>, vertices: Vec<Point3<f64>>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            name: name.into(),
            vertices,
            faces,
            edges: None,
        }
    }

    /// Attach an explicit edge list.
    pub fn with_edges(mut self, edges: Vec<BaseEdge>) -> Self {
        self.edges = Some(edges);
        self
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Check that the polyhedron is usable as a subdivision base.
    ///
    /// Rejects empty meshes, out-of-range vertex indices, triangles that
    /// repeat a vertex, and edges shared by more than two faces.
    pub fn validate(&self) -> Result<()> {
        if self.faces.is_empty() {
            return Err(MeshError::EmptyMesh);
        }

        for (fi, face) in self.faces.iter().enumerate() {
            for &vi in face {
                if vi >= self.vertices.len() {
                    return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
                }
            }
            if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
                return Err(MeshError::DegenerateFace { face: fi });
            }
        }

        let mut incidence: HashMap<(usize, usize), usize> = HashMap::new();
        for face in &self.faces {
            for i in 0..3 {
                let edge = BaseEdge::new(face[i], face[(i + 1) % 3]);
                let count = incidence.entry(edge.key()).or_insert(0);
                *count += 1;
                if *count > 2 {
                    let (v0, v1) = edge.key();
                    return Err(MeshError::NonManifoldEdge { v0, v1 });
                }
            }
        }

        if let Some(edges) = &self.edges {
            for edge in edges {
                for &vi in &edge.vertices {
                    if vi >= self.vertices.len() {
                        return Err(MeshError::invalid_param(
                            "edge vertex",
                            vi,
                            "edge references a missing vertex",
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// The edge list: the explicit one if present, otherwise every distinct
    /// triangle side in first-seen order with the default weight.
    pub fn edge_list(&self) -> Vec<BaseEdge> {
        if let Some(edges) = &self.edges {
            return edges.clone();
        }

        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        let mut edges = Vec::with_capacity(self.faces.len() * 3 / 2);
        for face in &self.faces {
            for i in 0..3 {
                let edge = BaseEdge::new(face[i], face[(i + 1) % 3]);
                if seen.insert(edge.key()) {
                    edges.push(edge);
                }
            }
        }
        edges
    }
}
