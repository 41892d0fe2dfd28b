//! Vertex duplication and unfolding.
//!
//! [`Retriangulated`] gives every face private vertices and classifies its
//! sides as folds, cuts or open boundary. [`Unfolder`] then rotates faces
//! about their folds to interpolate between the sphere (scale 0) and the
//! flat net (scale 1).

mod engine;
mod retriangulate;

pub use engine::Unfolder;
pub use retriangulate::{Bound, FaceInfo, Retriangulated};
