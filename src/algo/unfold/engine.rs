//! The unfold engine.
//!
//! Each fold rotates the face on its leaf side about the shared edge by
//! `scale × dihedral × orientation`. A face's final placement is the product
//! of the rotations of every fold between it and the root face, so the
//! engine walks the folds in breadth-first order and accumulates one rigid
//! transform per face:
//!
//! ```text
//! T[root] = identity
//! T[to]   = T[from] * R(fold, scale)
//! ```
//!
//! Rotations are expressed in the canonical (folded) frame, so hinge
//! pivots, axes and dihedral angles are computed once. Positions are always
//! rebuilt from the canonical snapshot, which makes `unfold` idempotent.

use nalgebra::{Isometry3, Point3, Unit, UnitQuaternion, Vector3};
use rayon::prelude::*;

use super::retriangulate::Retriangulated;
use crate::algo::fold::{DualGraph, FoldTree};
use crate::error::{MeshError, Result};
use crate::mesh::math::{angle_between, direction, hinge_rotation};
use crate::mesh::{FaceId, FoldId};

/// Precomputed hinge of one fold.
#[derive(Debug, Clone)]
struct Hinge {
    from: FaceId,
    to: FaceId,
    pivot: Point3<f64>,
    axis: Unit<Vector3<f64>>,
    /// Dihedral angle between the canonical normals.
    angle: f64,
    orientation: f64,
}

/// Moves duplicated face vertices between the folded and unfolded shape.
#[derive(Debug, Clone)]
pub struct Unfolder {
    canonical: Vec<Point3<f64>>,
    canonical_normals: Vec<Vector3<f64>>,
    hinges: Vec<Hinge>,
    positions: Vec<Point3<f64>>,
    normals: Vec<Vector3<f64>>,
    scale: f64,
    parallel: bool,
}

impl Unfolder {
    /// Prepare hinges for every fold and run the orientation pass.
    ///
    /// The orientation pass probes both rotation senses at full scale and
    /// stores, in each fold's [`orientation`](crate::algo::fold::FaceEdge::orientation),
    /// the sign that brings the two faces closer to coplanar.
    ///
    /// # Errors
    /// Returns [`MeshError::FoldTree`] if a fold's edge is not a side of its
    /// `from` face, and [`MeshError::DegenerateFace`] if the hinge has zero
    /// length.
    pub fn new(mesh: &Retriangulated, graph: &mut DualGraph, tree: &FoldTree) -> Result<Self> {
        let mut hinges = Vec::with_capacity(tree.len());
        let mut flipped = 0;

        for &fold in tree.order() {
            let hinge = Self::hinge(mesh, graph, fold)?;
            if hinge.orientation < 0.0 {
                flipped += 1;
            }
            graph.edge_mut(fold).orientation = hinge.orientation;
            hinges.push(hinge);
        }
        log::debug!(
            "orientation pass: {} of {} folds rotate in the negative sense",
            flipped,
            hinges.len()
        );

        let canonical_normals: Vec<Vector3<f64>> = mesh.faces.iter().map(|f| f.normal).collect();

        Ok(Self {
            canonical: mesh.positions.clone(),
            positions: mesh.positions.clone(),
            normals: canonical_normals.clone(),
            canonical_normals,
            hinges,
            scale: 0.0,
            parallel: true,
        })
    }

    fn hinge(mesh: &Retriangulated, graph: &DualGraph, fold: FoldId) -> Result<Hinge> {
        let edge = graph.edge(fold);
        let from = &mesh.faces[edge.from.index()];
        let to = &mesh.faces[edge.to.index()];

        let (Some(a), Some(b)) = (from.corner_of(edge.vertices[0]), from.corner_of(edge.vertices[1])) else {
            return Err(MeshError::FoldTree(format!(
                "fold {:?} is not a side of face {:?}",
                fold, edge.from
            )));
        };

        let pivot = mesh.positions[from.vertices[a].index()];
        let end = mesh.positions[from.vertices[b].index()];
        let axis = direction(&pivot, &end).ok_or(MeshError::DegenerateFace {
            face: edge.from.index(),
        })?;

        let angle = angle_between(&from.normal, &to.normal);
        let positive = UnitQuaternion::from_axis_angle(&axis, angle) * to.normal;
        let negative = UnitQuaternion::from_axis_angle(&axis, -angle) * to.normal;
        let orientation = if negative.dot(&from.normal) > positive.dot(&from.normal) {
            -1.0
        } else {
            1.0
        };

        Ok(Hinge {
            from: edge.from,
            to: edge.to,
            pivot,
            axis,
            angle,
            orientation,
        })
    }

    /// Set whether vertex transforms run on the rayon thread pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Move every face to the shape at `scale` (0 folded, 1 flat).
    ///
    /// # Errors
    /// Returns [`MeshError::InvalidParameter`] if `scale` is not within
    /// `[0, 1]`.
    pub fn unfold(&mut self, scale: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&scale) {
            return Err(MeshError::invalid_param(
                "scale",
                scale,
                "must be within [0, 1]",
            ));
        }

        let transforms = self.transforms(scale);

        if self.parallel {
            self.positions
                .par_chunks_mut(3)
                .zip(self.canonical.par_chunks(3))
                .zip(transforms.par_iter())
                .for_each(|((out, src), t)| {
                    for (o, s) in out.iter_mut().zip(src) {
                        *o = t * s;
                    }
                });
            self.normals
                .par_iter_mut()
                .zip(self.canonical_normals.par_iter())
                .zip(transforms.par_iter())
                .for_each(|((out, src), t)| *out = t.rotation * src);
        } else {
            for ((out, src), t) in self
                .positions
                .chunks_mut(3)
                .zip(self.canonical.chunks(3))
                .zip(&transforms)
            {
                for (o, s) in out.iter_mut().zip(src) {
                    *o = t * s;
                }
            }
            for ((out, src), t) in self
                .normals
                .iter_mut()
                .zip(&self.canonical_normals)
                .zip(&transforms)
            {
                *out = t.rotation * src;
            }
        }

        self.scale = scale;
        Ok(())
    }

    /// Rigid transform of every face at `scale`.
    fn transforms(&self, scale: f64) -> Vec<Isometry3<f64>> {
        let mut transforms = vec![Isometry3::identity(); self.canonical_normals.len()];
        for h in &self.hinges {
            let rotation = hinge_rotation(&h.pivot, &h.axis, scale * h.angle * h.orientation);
            transforms[h.to.index()] = transforms[h.from.index()] * rotation;
        }
        transforms
    }

    /// The scale of the last successful `unfold` call.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current vertex positions, three per face.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Canonical (folded) vertex positions.
    #[inline]
    pub fn canonical(&self) -> &[Point3<f64>] {
        &self.canonical
    }

    /// Current face normals.
    #[inline]
    pub fn normals(&self) -> &[Vector3<f64>] {
        &self.normals
    }

    /// Current normal of one face.
    #[inline]
    pub fn face_normal(&self, face: FaceId) -> Vector3<f64> {
        self.normals[face.index()]
    }

    /// Current corner positions of one face.
    #[inline]
    pub fn face_positions(&self, face: FaceId) -> [Point3<f64>; 3] {
        let i = face.index() * 3;
        [self.positions[i], self.positions[i + 1], self.positions[i + 2]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::subdivide::{subdivide, SubdivideOptions};
    use crate::mesh::math::triangle_normal;
    use crate::mesh::solids::{cube, octahedron, tetrahedron};
    use crate::mesh::Polyhedron;

    fn setup(base: &Polyhedron, depth: usize) -> (DualGraph, FoldTree, Unfolder) {
        let mesh = subdivide(base, &SubdivideOptions::new(depth)).unwrap();
        let mut graph = DualGraph::build(&mesh);
        let spanning = graph.spanning_tree().unwrap();
        let tree = FoldTree::build(&mut graph, &spanning).unwrap();
        let retri = Retriangulated::build(&mesh, &graph, &spanning).unwrap();
        let unfolder = Unfolder::new(&retri, &mut graph, &tree).unwrap();
        (graph, tree, unfolder)
    }

    #[test]
    fn test_scale_zero_is_identity() {
        let (_, _, mut u) = setup(&octahedron(), 2);
        u.unfold(0.0).unwrap();
        for (p, c) in u.positions().iter().zip(u.canonical()) {
            assert!((p - c).norm() < 1e-12);
        }
    }

    #[test]
    fn test_full_unfold_is_flat() {
        let (graph, tree, mut u) = setup(&tetrahedron(), 2);
        u.unfold(1.0).unwrap();
        for &fold in tree.order() {
            let e = graph.edge(fold);
            let d = u.face_normal(e.from).dot(&u.face_normal(e.to));
            assert!(d >= 1.0 - 1e-4, "fold {:?}: dot {}", fold, d);
        }
    }

    #[test]
    fn test_rotated_normals_match_recomputed() {
        let (_, _, mut u) = setup(&cube(), 1);
        u.unfold(0.7).unwrap();
        for f in 0..u.normals().len() {
            let face = FaceId::new(f);
            let [a, b, c] = u.face_positions(face);
            let n = triangle_normal(&a, &b, &c).unwrap();
            assert!((n - u.face_normal(face)).norm() < 1e-9);
        }
    }

    #[test]
    fn test_folds_keep_hinge_vertices_together() {
        let (graph, tree, mut u) = setup(&octahedron(), 1);
        u.unfold(0.4).unwrap();
        for &fold in tree.order() {
            let e = graph.edge(fold);
            let from = u.face_positions(e.from);
            let to = u.face_positions(e.to);
            let c0 = u.canonical();
            let from_c = &c0[e.from.index() * 3..e.from.index() * 3 + 3];
            let to_c = &c0[e.to.index() * 3..e.to.index() * 3 + 3];
            // Shared corners coincide before and after unfolding.
            for (i, pf) in from_c.iter().enumerate() {
                for (j, pt) in to_c.iter().enumerate() {
                    if (pf - pt).norm() < 1e-12 {
                        assert!((from[i] - to[j]).norm() < 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let (_, _, mut par) = setup(&octahedron(), 2);
        let mut seq = par.clone().with_parallel(false);
        par.unfold(0.6).unwrap();
        seq.unfold(0.6).unwrap();
        assert_eq!(par.positions(), seq.positions());
    }

    #[test]
    fn test_rejects_out_of_range_scale() {
        let (_, _, mut u) = setup(&tetrahedron(), 0);
        assert!(matches!(
            u.unfold(1.5),
            Err(MeshError::InvalidParameter { name: "scale", .. })
        ));
        assert!(u.unfold(f64::NAN).is_err());
        assert_eq!(u.scale(), 0.0);
    }
}
