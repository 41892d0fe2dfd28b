//! # Myriahedral
//!
//! Myriahedral projections of the sphere: subdivide a base polyhedron into
//! many small triangles, choose a spanning tree of hinges ("folds") across
//! which the faces stay connected, sever the remaining edges ("cuts"), and
//! interpolate between the folded sphere and a flat net.
//!
//! ## Features
//!
//! - **Base solids**: tetrahedron, cube, octahedron, icosahedron, and
//!   latitude/longitude graticules with classic fold layouts
//! - **Weighted subdivision**: edges remember how deep inside a base face
//!   they lie, steering folds toward face interiors
//! - **Deterministic fold trees**: Prim spanning tree with a fixed tie-break
//! - **Idempotent unfolding**: positions rebuilt from the folded shape on
//!   every call, optionally in parallel
//! - **Export**: flat renderer buffers, Wavefront OBJ and PLY nets
//!
//! ## Quick Start
//!
//! ```
//! use myriahedral::prelude::*;
//!
//! let options = MyriahedronOptions::new(BaseGeometry::Icosahedron).with_subdivisions(2);
//! let mut myria = Myriahedron::build(&options).unwrap();
//!
//! // 20 * 4^2 faces, hinged by a spanning tree.
//! assert_eq!(myria.num_faces(), 320);
//! assert_eq!(myria.folds().len(), 319);
//!
//! // Halfway between sphere and net.
//! myria.unfold(0.5).unwrap();
//! let data = myria.mesh_data();
//! println!("{} vertices, {} cuts", data.num_vertices(), data.cuts.len());
//! ```
//!
//! ## Graticules
//!
//! ```
//! use myriahedral::prelude::*;
//!
//! let geometry = BaseGeometry::Graticule { parallels: 8, layout: GraticuleLayout::Polyconical };
//! let mut myria = Myriahedron::build(&MyriahedronOptions::new(geometry).with_subdivisions(1)).unwrap();
//! myria.unfold(1.0).unwrap();
//! ```
//!
//! ## Exporting a Net
//!
//! ```no_run
//! use myriahedral::prelude::*;
//!
//! let mut myria = Myriahedron::build(&MyriahedronOptions::default()).unwrap();
//! myria.unfold(1.0).unwrap();
//! myriahedral::io::save(&myria.mesh_data(), "net.obj").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
mod myriahedron;

pub use error::{MeshError, Result};
pub use mesh::BaseGeometry;
pub use myriahedron::{MeshData, MeshStats, Myriahedron, MyriahedronOptions};

/// Prelude module for convenient imports.
///
/// ```
/// use myriahedral::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::fold::{CutEdge, FoldPair};
    pub use crate::algo::uv::{UVMap, UvOffset};
    pub use crate::algo::Progress;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{BaseGeometry, FaceId, FoldId, GraticuleLayout, Polyhedron, VertexId};
    pub use crate::{MeshData, MeshStats, Myriahedron, MyriahedronOptions};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_tetrahedron_round_trip() {
        let options = MyriahedronOptions::new(BaseGeometry::Tetrahedron).with_subdivisions(1);
        let mut myria = Myriahedron::build(&options).unwrap();

        assert_eq!(myria.num_faces(), 16);
        assert_eq!(myria.folds().len(), 15);
        assert_eq!(myria.uv().len(), myria.num_vertices());

        myria.unfold(0.0).unwrap();
        let folded = myria.positions().to_vec();
        myria.unfold(1.0).unwrap();
        myria.unfold(0.0).unwrap();
        for (a, b) in folded.iter().zip(myria.positions()) {
            assert!((a - b).norm() < 1e-12);
        }
    }
}
