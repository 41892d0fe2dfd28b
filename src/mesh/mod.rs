//! Mesh data model.
//!
//! This module holds the static side of the pipeline: typed indices, the
//! vector/quaternion helpers, and the base polyhedra that subdivision
//! starts from.
//!
//! # Index Types
//!
//! Mesh elements live in flat arenas and are identified by type-safe index
//! wrappers:
//! - [`VertexId`] - a vertex
//! - [`FaceId`] - a triangle
//! - [`EdgeId`] - an undirected mesh edge
//! - [`FoldId`] - a dual-graph edge (fold or cut candidate)
//!
//! # Base Polyhedra
//!
//! ```
//! use myriahedral::mesh::{solids, BaseGeometry, GraticuleLayout};
//!
//! let ico = solids::icosahedron();
//! assert_eq!(ico.num_faces(), 20);
//!
//! let grid = BaseGeometry::Graticule { parallels: 6, layout: GraticuleLayout::Cylindrical };
//! assert_eq!(grid.to_polyhedron().unwrap().num_faces(), 4 * 6 * 5);
//! ```

pub mod graticule;
mod index;
pub mod math;
mod polyhedron;
pub mod solids;

pub use graticule::{graticule, GraticuleLayout};
pub use index::{EdgeId, FaceId, FoldId, VertexId};
pub use polyhedron::{BaseEdge, Polyhedron, DEFAULT_EDGE_WEIGHT};
pub use solids::BaseGeometry;
