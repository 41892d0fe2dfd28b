//! Base solids.
//!
//! Vertex and face tables for the platonic solids used as myriahedron bases,
//! plus [`BaseGeometry`], the selector that turns a configuration choice into
//! a [`Polyhedron`].

use nalgebra::Point3;

use super::graticule::{graticule, GraticuleLayout};
use super::polyhedron::{BaseEdge, Polyhedron};
use crate::error::Result;

const TETRAHEDRON_VERTICES: [[f64; 3]; 4] = [
    [0.0, -1.0, 2.0],
    [1.73205081, -1.0, -1.0],
    [-1.73205081, -1.0, -1.0],
    [0.0, 2.0, 0.0],
];

const TETRAHEDRON_FACES: [[usize; 3]; 4] = [[0, 2, 1], [0, 3, 2], [0, 1, 3], [1, 2, 3]];

const TETRAHEDRON_EDGES: [[usize; 2]; 6] = [[2, 0], [0, 1], [3, 0], [1, 2], [2, 3], [3, 1]];

const CUBE_VERTICES: [[f64; 3]; 8] = [
    [0.5, -0.5, -0.5],
    [-0.5, -0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [-0.5, 0.5, 0.5],
    [0.5, 0.5, 0.5],
];

const CUBE_FACES: [[usize; 3]; 12] = [
    [2, 1, 0],
    [3, 2, 0],
    [3, 0, 4],
    [7, 3, 4],
    [0, 1, 5],
    [4, 0, 5],
    [1, 2, 6],
    [5, 1, 6],
    [2, 3, 7],
    [6, 2, 7],
    [4, 5, 6],
    [7, 4, 6],
];

const CUBE_EDGES: [[usize; 2]; 18] = [
    [2, 0],
    [3, 0],
    [3, 4],
    [0, 1],
    [4, 0],
    [0, 5],
    [1, 2],
    [5, 1],
    [1, 6],
    [2, 3],
    [3, 7],
    [6, 2],
    [2, 7],
    [4, 5],
    [5, 6],
    [7, 4],
    [4, 6],
    [6, 7],
];

const OCTAHEDRON_VERTICES: [[f64; 3]; 6] = [
    [0.0, 1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, -1.0],
    [-1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, -1.0, 0.0],
];

const OCTAHEDRON_FACES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [0, 2, 3],
    [0, 3, 4],
    [0, 4, 1],
    [5, 2, 1],
    [5, 3, 2],
    [5, 4, 3],
    [5, 1, 4],
];

const ICOSAHEDRON_VERTICES: [[f64; 3]; 12] = [
    [-0.26286500, 0.0, 0.42532500],
    [0.26286500, 0.0, 0.42532500],
    [-0.26286500, 0.0, -0.42532500],
    [0.26286500, 0.0, -0.42532500],
    [0.0, 0.42532500, 0.26286500],
    [0.0, 0.42532500, -0.26286500],
    [0.0, -0.42532500, 0.26286500],
    [0.0, -0.42532500, -0.26286500],
    [0.42532500, 0.26286500, 0.0],
    [-0.42532500, 0.26286500, 0.0],
    [0.42532500, -0.26286500, 0.0],
    [-0.42532500, -0.26286500, 0.0],
];

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 6, 1],
    [0, 11, 6],
    [1, 4, 0],
    [1, 8, 4],
    [1, 10, 8],
    [2, 5, 3],
    [2, 9, 5],
    [2, 11, 9],
    [3, 7, 2],
    [3, 10, 7],
    [4, 8, 5],
    [4, 9, 0],
    [5, 8, 3],
    [5, 9, 4],
    [6, 10, 1],
    [6, 11, 7],
    [7, 10, 6],
    [7, 11, 2],
    [8, 10, 3],
    [9, 11, 0],
];

fn points(table: &[[f64; 3]]) -> Vec<Point3<f64>> {
    table.iter().map(|&[x, y, z]| Point3::new(x, y, z)).collect()
}

fn edges(table: &[[usize; 2]]) -> Vec<BaseEdge> {
    table.iter().map(|&[a, b]| BaseEdge::new(a, b)).collect()
}

/// Regular tetrahedron (4 faces) with its explicit edge list.
pub fn tetrahedron() -> Polyhedron {
    Polyhedron::new("tetrahedron", points(&TETRAHEDRON_VERTICES), TETRAHEDRON_FACES.to_vec())
        .with_edges(edges(&TETRAHEDRON_EDGES))
}

/// Axis-aligned cube split into 12 triangles, with its 18-edge list
/// (including the square diagonals).
pub fn cube() -> Polyhedron {
    Polyhedron::new("cube", points(&CUBE_VERTICES), CUBE_FACES.to_vec()).with_edges(edges(&CUBE_EDGES))
}

/// Regular octahedron (8 faces) with vertices on the coordinate axes.
pub fn octahedron() -> Polyhedron {
    Polyhedron::new("octahedron", points(&OCTAHEDRON_VERTICES), OCTAHEDRON_FACES.to_vec())
}

/// Regular icosahedron (20 faces).
pub fn icosahedron() -> Polyhedron {
    Polyhedron::new("icosahedron", points(&ICOSAHEDRON_VERTICES), ICOSAHEDRON_FACES.to_vec())
}

/// Selector for the base geometry of a myriahedron.
#[derive(Debug, Clone)]
pub enum BaseGeometry {
    /// Regular tetrahedron.
    Tetrahedron,
    /// Triangulated cube.
    Cube,
    /// Regular octahedron.
    Octahedron,
    /// Regular icosahedron.
    Icosahedron,
    /// Latitude/longitude grid.
    Graticule {
        /// Number of latitude bands (rows). Longitude gets twice as many.
        parallels: usize,
        /// Preferred fold pattern.
        layout: GraticuleLayout,
    },
    /// A caller-supplied triangulated solid.
    Custom(Polyhedron),
}

impl BaseGeometry {
    /// Short name of the geometry.
    pub fn name(&self) -> &str {
        match self {
            BaseGeometry::Tetrahedron => "tetrahedron",
            BaseGeometry::Cube => "cube",
            BaseGeometry::Octahedron => "octahedron",
            BaseGeometry::Icosahedron => "icosahedron",
            BaseGeometry::Graticule { .. } => "graticule",
            BaseGeometry::Custom(poly) => &poly.name,
        }
    }

    /// Build the base polyhedron.
    pub fn to_polyhedron(&self) -> Result<Polyhedron> {
        match self {
            BaseGeometry::Tetrahedron => Ok(tetrahedron()),
            BaseGeometry::Cube => Ok(cube()),
            BaseGeometry::Octahedron => Ok(octahedron()),
            BaseGeometry::Icosahedron => Ok(icosahedron()),
            BaseGeometry::Graticule { parallels, layout } => graticule(*parallels, *layout),
            BaseGeometry::Custom(poly) => Ok(poly.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::math::triangle_normal;

    fn assert_outward(poly: &Polyhedron) {
        for (fi, face) in poly.faces.iter().enumerate() {
            let [a, b, c] = face.map(|i| poly.vertices[i]);
            let n = triangle_normal(&a, &b, &c).unwrap();
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            assert!(n.dot(&centroid) > 0.0, "{} face {} points inward", poly.name, fi);
        }
    }

    #[test]
    fn test_solids_are_valid_and_outward() {
        for poly in [tetrahedron(), cube(), octahedron(), icosahedron()] {
            poly.validate().unwrap();
            assert_outward(&poly);
        }
    }

    #[test]
    fn test_solid_counts() {
        assert_eq!(tetrahedron().num_faces(), 4);
        assert_eq!(cube().num_faces(), 12);
        assert_eq!(octahedron().num_faces(), 8);
        assert_eq!(icosahedron().num_faces(), 20);
        assert_eq!(icosahedron().edge_list().len(), 30);
        assert_eq!(cube().edge_list().len(), 18);
    }

    #[test]
    fn test_explicit_edge_lists_cover_every_side() {
        for poly in [tetrahedron(), cube()] {
            let keys: Vec<_> = poly.edge_list().iter().map(|e| e.key()).collect();
            for face in &poly.faces {
                for i in 0..3 {
                    let side = BaseEdge::new(face[i], face[(i + 1) % 3]).key();
                    assert!(keys.contains(&side), "{} misses edge {:?}", poly.name, side);
                }
            }
        }
    }

    #[test]
    fn test_geometry_selector() {
        let g = BaseGeometry::Graticule {
            parallels: 4,
            layout: GraticuleLayout::Free,
        };
        assert_eq!(g.name(), "graticule");
        assert!(g.to_polyhedron().unwrap().num_faces() > 0);
        assert_eq!(BaseGeometry::Cube.to_polyhedron().unwrap().name, "cube");
    }
}
