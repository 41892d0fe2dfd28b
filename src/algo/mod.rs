//! The myriahedral pipeline.
//!
//! Stages, in the order a build runs them:
//!
//! - **Subdivision** ([`subdivide`]): recursive 1-to-4 triangle splits over a
//!   shared, weighted edge table.
//! - **Fold selection** ([`fold`]): dual graph, minimum spanning tree, and
//!   the rooted fold tree.
//! - **Unfolding** ([`unfold`]): per-face vertex duplication and the
//!   hinge-rotation engine.
//! - **Texture coordinates** ([`uv`]): equirectangular projection with seam
//!   correction.
//!
//! Most callers go through [`Myriahedron`](crate::Myriahedron), which runs
//! every stage; the stages are public for callers who want to inspect or
//! replace one of them.

pub mod fold;
pub mod progress;
pub mod subdivide;
pub mod unfold;
pub mod uv;

pub use progress::Progress;
