//! Error types for myriahedral.
//!
//! Every stage of mesh construction returns [`Result`]. A failed build never
//! yields a partially constructed mesh: topology errors mean the input
//! geometry cannot be unfolded and the caller must not render anything
//! derived from it.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building or unfolding a myriahedron.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The base polyhedron has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A triangle side is absent from the base polyhedron's edge list.
    #[error("edge ({v0}, {v1}) is used by a face but missing from the edge table")]
    MissingEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// An edge has more than two incident faces.
    #[error("edge ({v0}, {v1}) has more than two incident faces")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// The spanning tree could not grow to cover every face.
    #[error("dual graph is disconnected: spanning tree reached {reached} of {total} faces")]
    DisconnectedDualGraph {
        /// Number of faces covered when growth stalled.
        reached: usize,
        /// Total number of faces.
        total: usize,
    },

    /// The fold tree does not satisfy its structural invariants.
    #[error("invalid fold tree: {0}")]
    FoldTree(String),

    /// A face does not have exactly three fold/cut/boundary edges.
    #[error("face {face} is bounded by {count} edges, expected 3")]
    FaceEdgeCount {
        /// The face index.
        face: usize,
        /// Number of bounding edges found.
        count: usize,
    },

    /// Unfolding was requested on a mesh built without unfoldable topology.
    #[error("mesh was built without unfoldable topology")]
    NotUnfoldable,

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported export format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_param_message() {
        let err = MeshError::invalid_param("scale", 1.5, "must be within [0, 1]");
        assert_eq!(
            err.to_string(),
            "invalid parameter: scale = 1.5 (must be within [0, 1])"
        );
    }

    #[test]
    fn test_disconnected_message() {
        let err = MeshError::DisconnectedDualGraph {
            reached: 4,
            total: 8,
        };
        assert!(err.to_string().contains("4 of 8"));
    }
}
