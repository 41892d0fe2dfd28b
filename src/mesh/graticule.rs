//! Latitude/longitude graticule meshes.
//!
//! A graticule with `P` parallels has `P` latitude bands and `2P` longitude
//! columns. Every cell of a middle band is a quad split along its diagonal
//! into two triangles; the two polar bands are triangle fans around a single
//! pole vertex, so the result is a closed manifold that the regular
//! subdivision/unfolding pipeline accepts.
//!
//! # Layouts
//!
//! Classic graticule projections differ in where the sphere is cut. A
//! [`GraticuleLayout`] expresses that choice as base edge weights: edges
//! weighted above the default become folds, edges weighted below it become
//! cuts. Quad diagonals always fold so cells stay intact.
//!
//! | Layout | Horizontal hinge | Vertical hinges |
//! |--------|------------------|-----------------|
//! | `Cylindrical` | equator band | every column |
//! | `Conical` | band at one third | every column |
//! | `Azimuthal` | north cap | every column |
//! | `AzimuthalTwoHemispheres` | both caps | every column, joined once at the equator |
//! | `Polyconical` | every band | central meridian |

use std::f64::consts::PI;

use nalgebra::Point3;

use super::polyhedron::{BaseEdge, Polyhedron, DEFAULT_EDGE_WEIGHT};
use crate::error::{MeshError, Result};

const DIAGONAL_WEIGHT: f64 = 3.0;
const FOLD_WEIGHT: f64 = 2.0;
const CUT_WEIGHT: f64 = 0.5;

/// Preferred fold pattern of a graticule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraticuleLayout {
    /// No preference: every base edge has the default weight.
    #[default]
    Free,
    /// Unrolled around the equator band, columns hanging north and south.
    Cylindrical,
    /// Like cylindrical, anchored on the band at one third of the latitude range.
    Conical,
    /// Anchored on the north polar cap.
    Azimuthal,
    /// Both polar caps as anchors, the hemispheres joined by one equator hinge.
    AzimuthalTwoHemispheres,
    /// Every band unrolled horizontally, bands joined along the central meridian.
    Polyconical,
}

impl GraticuleLayout {
    /// All layouts, in declaration order.
    pub const ALL: [GraticuleLayout; 6] = [
        GraticuleLayout::Free,
        GraticuleLayout::Cylindrical,
        GraticuleLayout::Conical,
        GraticuleLayout::Azimuthal,
        GraticuleLayout::AzimuthalTwoHemispheres,
        GraticuleLayout::Polyconical,
    ];

    fn weights(self, parallels: usize) -> LayoutWeights {
        LayoutWeights {
            layout: self,
            parallels,
        }
    }
}

/// Point on the unit sphere at longitude fraction `t` and colatitude fraction `u`.
fn spherical(t: f64, u: f64) -> Point3<f64> {
    let t = t * PI * 2.0;
    let u = u * PI;
    Point3::new(u.sin() * t.cos(), u.cos(), u.sin() * t.sin())
}

/// Edge weights for one layout.
struct LayoutWeights {
    layout: GraticuleLayout,
    parallels: usize,
}

impl LayoutWeights {
    /// Meridian edge of band `row` at vertex column `column`.
    fn meridian(&self, row: usize, column: usize) -> f64 {
        let p = self.parallels;
        let anchored = |anchor: usize| {
            if row == anchor && column != 0 {
                FOLD_WEIGHT
            } else {
                CUT_WEIGHT
            }
        };
        match self.layout {
            GraticuleLayout::Free => DEFAULT_EDGE_WEIGHT,
            GraticuleLayout::Cylindrical => anchored(p / 2),
            GraticuleLayout::Conical => anchored(p / 3),
            GraticuleLayout::Azimuthal => anchored(0),
            GraticuleLayout::AzimuthalTwoHemispheres => {
                if (row == 0 || row == p - 1) && column != 0 {
                    FOLD_WEIGHT
                } else {
                    CUT_WEIGHT
                }
            }
            GraticuleLayout::Polyconical => {
                if column != 0 {
                    FOLD_WEIGHT
                } else {
                    CUT_WEIGHT
                }
            }
        }
    }

    /// Parallel edge on ring `ring` (between bands `ring - 1` and `ring`) in
    /// quad column `column`.
    fn parallel(&self, ring: usize, column: usize) -> f64 {
        let p = self.parallels;
        match self.layout {
            GraticuleLayout::Free => DEFAULT_EDGE_WEIGHT,
            GraticuleLayout::Cylindrical | GraticuleLayout::Conical | GraticuleLayout::Azimuthal => {
                FOLD_WEIGHT
            }
            GraticuleLayout::AzimuthalTwoHemispheres => {
                if ring != p / 2 || column == 0 {
                    FOLD_WEIGHT
                } else {
                    CUT_WEIGHT
                }
            }
            GraticuleLayout::Polyconical => {
                if column == p {
                    FOLD_WEIGHT
                } else {
                    CUT_WEIGHT
                }
            }
        }
    }

    fn diagonal(&self) -> f64 {
        match self.layout {
            GraticuleLayout::Free => DEFAULT_EDGE_WEIGHT,
            _ => DIAGONAL_WEIGHT,
        }
    }
}

/// Build a graticule with `parallels` latitude bands.
///
/// # Errors
/// Returns [`MeshError::InvalidParameter`] if `parallels < 2`.
pub fn graticule(parallels: usize, layout: GraticuleLayout) -> Result<Polyhedron> {
    if parallels < 2 {
        return Err(MeshError::invalid_param(
            "parallels",
            parallels,
            "a graticule needs at least two bands",
        ));
    }

    let rows = parallels;
    let cols = parallels * 2;
    let south = 1 + (rows - 1) * cols;

    // Vertex id at colatitude step `i` and longitude step `j`; the poles
    // collapse to a single vertex and longitude wraps around.
    let vid = |i: usize, j: usize| -> usize {
        if i == 0 {
            0
        } else if i == rows {
            south
        } else {
            1 + (i - 1) * cols + (j % cols)
        }
    };

    let mut vertices = Vec::with_capacity(south + 1);
    vertices.push(Point3::new(0.0, 1.0, 0.0));
    for i in 1..rows {
        for j in 0..cols {
            vertices.push(spherical(j as f64 / cols as f64, i as f64 / rows as f64));
        }
    }
    vertices.push(Point3::new(0.0, -1.0, 0.0));

    let mut faces = Vec::with_capacity(2 * cols * (rows - 1));
    for i in 0..rows {
        for j in 0..cols {
            let p0 = vid(i, j);
            let p1 = vid(i, j + 1);
            let p2 = vid(i + 1, j + 1);
            let p3 = vid(i + 1, j);

            if i == 0 {
                faces.push([p0, p2, p3]);
            } else if i == rows - 1 {
                faces.push([p0, p1, p2]);
            } else {
                faces.push([p0, p1, p2]);
                faces.push([p0, p2, p3]);
            }
        }
    }

    let weights = layout.weights(parallels);
    let mut edges = Vec::with_capacity(cols * (3 * rows - 3));
    for i in 0..rows {
        for j in 0..cols {
            edges.push(BaseEdge::weighted(vid(i, j), vid(i + 1, j), weights.meridian(i, j)));
            if i > 0 {
                edges.push(BaseEdge::weighted(vid(i, j), vid(i, j + 1), weights.parallel(i, j)));
            }
            if i > 0 && i < rows - 1 {
                edges.push(BaseEdge::weighted(vid(i, j), vid(i + 1, j + 1), weights.diagonal()));
            }
        }
    }

    Ok(Polyhedron::new(format!("graticule-{}", parallels), vertices, faces).with_edges(edges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::math::triangle_normal;

    #[test]
    fn test_counts_and_euler() {
        for p in 2..7 {
            let g = graticule(p, GraticuleLayout::Free).unwrap();
            g.validate().unwrap();
            let f = g.num_faces();
            let e = g.edge_list().len();
            let v = g.num_vertices();
            assert_eq!(f, 4 * p * (p - 1));
            assert_eq!(v as i64 - e as i64 + f as i64, 2, "Euler characteristic for P={}", p);
        }
    }

    #[test]
    fn test_faces_point_outward() {
        let g = graticule(5, GraticuleLayout::Free).unwrap();
        for face in &g.faces {
            let [a, b, c] = face.map(|i| g.vertices[i]);
            let n = triangle_normal(&a, &b, &c).expect("pole fans are not degenerate");
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            assert!(n.dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn test_vertices_on_unit_sphere() {
        let g = graticule(4, GraticuleLayout::Free).unwrap();
        for v in &g.vertices {
            assert!((v.coords.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_every_face_side_has_an_edge() {
        for layout in GraticuleLayout::ALL {
            let g = graticule(4, layout).unwrap();
            let keys: std::collections::HashSet<_> = g.edge_list().iter().map(|e| e.key()).collect();
            for face in &g.faces {
                for k in 0..3 {
                    assert!(keys.contains(&BaseEdge::new(face[k], face[(k + 1) % 3]).key()));
                }
            }
        }
    }

    #[test]
    fn test_layout_hinges_form_spanning_tree() {
        // Heavy edges (diagonals and folds) must connect all faces without a
        // cycle: exactly F - 1 of them.
        for layout in GraticuleLayout::ALL.into_iter().skip(1) {
            let g = graticule(6, layout).unwrap();
            let heavy = g
                .edge_list()
                .iter()
                .filter(|e| e.weight > DEFAULT_EDGE_WEIGHT)
                .count();
            assert_eq!(heavy, g.num_faces() - 1, "{:?}", layout);
        }
    }

    #[test]
    fn test_rejects_single_band() {
        assert!(matches!(
            graticule(1, GraticuleLayout::Free),
            Err(MeshError::InvalidParameter { name: "parallels", .. })
        ));
    }
}
