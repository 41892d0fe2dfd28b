//! Equirectangular texture coordinates.
//!
//! A point on the unit sphere maps to
//!
//! ```text
//! u = 0.5 + atan2(x, z) / 2π
//! v = 0.5 - asin(y) / π
//! ```
//!
//! Coordinates are computed from the canonical (folded) positions, so they
//! do not change while the mesh unfolds. An optional longitude/latitude
//! offset rotates the sphere first, moving the seam.
//!
//! When every triangle owns its vertices, each triangle is corrected
//! independently: if two of its corners lie more than half the texture
//! apart in U (or V), the corners below 0.5 are shifted by one so the
//! triangle does not stretch across the whole map. A corner sitting on the
//! polar axis has no meaningful longitude and takes the mean U of the
//! other two corners.
//!
//! A triangle that wraps around the polar axis without a corner on it spans
//! every longitude, and no whole shift brings its corners within half the
//! texture. All its corners take the longitude of its centroid instead, so
//! the U spread of every corrected triangle stays at most one half.

use std::f64::consts::PI;

use nalgebra::{Point2, Point3, UnitQuaternion, Vector3};
use rayon::prelude::*;

use crate::mesh::math::normalize_to_sphere;

/// Squared distance from the polar axis below which a point counts as a pole.
const POLE_EPSILON: f64 = 1e-18;

/// Tolerance of the axis-inside-triangle test, so an axis grazing an edge
/// counts as enclosed.
const ENCLOSE_EPSILON: f64 = 1e-12;

/// UV coordinates, one per vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UVMap {
    coords: Vec<Point2<f64>>,
}

impl UVMap {
    /// Wrap existing coordinates.
    pub fn new(coords: Vec<Point2<f64>>) -> Self {
        Self { coords }
    }

    /// Number of coordinates.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Coordinates of one vertex.
    #[inline]
    pub fn get(&self, index: usize) -> Point2<f64> {
        self.coords[index]
    }

    /// All coordinates.
    #[inline]
    pub fn as_slice(&self) -> &[Point2<f64>] {
        &self.coords
    }

    /// Interleaved `u, v` pairs as `f32`, the layout renderers upload.
    pub fn to_flat_f32(&self) -> Vec<f32> {
        self.coords
            .iter()
            .flat_map(|uv| [uv.x as f32, uv.y as f32])
            .collect()
    }
}

/// Longitude/latitude rotation applied before projecting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UvOffset {
    /// Longitude offset in radians, about the polar (y) axis.
    pub lon: f64,
    /// Latitude offset in radians, about the x axis.
    pub lat: f64,
}

impl UvOffset {
    /// Create an offset.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), self.lat)
            * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.lon)
    }
}

/// Project one point. The point is normalized first.
#[inline]
pub fn equirectangular(p: &Point3<f64>) -> Point2<f64> {
    let p = normalize_to_sphere(p);
    Point2::new(
        0.5 + p.x.atan2(p.z) / (2.0 * PI),
        0.5 - p.y.clamp(-1.0, 1.0).asin() / PI,
    )
}

fn project_all(positions: &[Point3<f64>], offset: UvOffset, parallel: bool) -> Vec<Point2<f64>> {
    let rotation = offset.rotation();
    if parallel {
        positions
            .par_iter()
            .map(|p| equirectangular(&(rotation * p)))
            .collect()
    } else {
        positions
            .iter()
            .map(|p| equirectangular(&(rotation * p)))
            .collect()
    }
}

/// UVs for an indexed mesh whose vertices are shared between triangles.
///
/// Shared vertices cannot take a per-triangle seam shift, so no correction
/// is applied.
pub fn indexed_uv(positions: &[Point3<f64>], offset: UvOffset, parallel: bool) -> UVMap {
    UVMap::new(project_all(positions, offset, parallel))
}

/// UVs for a mesh where face `f` owns vertices `3f..3f + 3`, with per-triangle
/// seam and pole correction.
pub fn per_face_uv(positions: &[Point3<f64>], offset: UvOffset, parallel: bool) -> UVMap {
    let rotation = offset.rotation();
    let mut coords = project_all(positions, offset, parallel);

    if parallel {
        coords
            .par_chunks_mut(3)
            .zip(positions.par_chunks(3))
            .for_each(|(uv, corners)| correct_triangle(uv, &rotated(&rotation, corners)));
    } else {
        for (uv, corners) in coords.chunks_mut(3).zip(positions.chunks(3)) {
            correct_triangle(uv, &rotated(&rotation, corners));
        }
    }

    UVMap::new(coords)
}

fn rotated(rotation: &UnitQuaternion<f64>, corners: &[Point3<f64>]) -> [Point3<f64>; 3] {
    std::array::from_fn(|k| rotation * corners[k])
}

#[inline]
fn on_polar_axis(p: &Point3<f64>) -> bool {
    p.x * p.x + p.z * p.z < POLE_EPSILON
}

/// Whether the polar axis passes through the triangle, tested on its
/// projection onto the equatorial (x, z) plane.
fn encloses_polar_axis(corners: &[Point3<f64>; 3]) -> bool {
    let side = |a: &Point3<f64>, b: &Point3<f64>| a.x * b.z - a.z * b.x;
    let d = [
        side(&corners[0], &corners[1]),
        side(&corners[1], &corners[2]),
        side(&corners[2], &corners[0]),
    ];
    d.iter().all(|&x| x >= -ENCLOSE_EPSILON) || d.iter().all(|&x| x <= ENCLOSE_EPSILON)
}

/// Seam and pole correction of one triangle's UVs, given its corners in the
/// rotated frame.
fn correct_triangle(uv: &mut [Point2<f64>], corners: &[Point3<f64>; 3]) {
    let poles: [bool; 3] = std::array::from_fn(|k| on_polar_axis(&corners[k]));
    let regular: Vec<usize> = (0..3).filter(|&k| !poles[k]).collect();

    if regular.len() == 3 && encloses_polar_axis(corners) {
        let centroid = Point3::from((corners[0].coords + corners[1].coords + corners[2].coords) / 3.0);
        let u = equirectangular(&centroid).x;
        for c in uv.iter_mut() {
            c.x = u;
        }
    } else {
        unwrap_axis(uv, &regular, |p| &mut p.x);
    }
    unwrap_axis(uv, &[0, 1, 2], |p| &mut p.y);

    if regular.len() < 3 && !regular.is_empty() {
        let mean = regular.iter().map(|&k| uv[k].x).sum::<f64>() / regular.len() as f64;
        for k in 0..3 {
            if poles[k] {
                uv[k].x = mean;
            }
        }
    }
}

/// Shift values below 0.5 up by one when the spread among `corners`
/// exceeds one half.
fn unwrap_axis<F>(uv: &mut [Point2<f64>], corners: &[usize], mut component: F)
where
    F: FnMut(&mut Point2<f64>) -> &mut f64,
{
    let values: Vec<f64> = corners.iter().map(|&k| *component(&mut uv[k])).collect();
    let spread = values
        .iter()
        .flat_map(|a| values.iter().map(move |b| (a - b).abs()))
        .fold(0.0, f64::max);
    if spread > 0.5 {
        for &k in corners {
            let c = component(&mut uv[k]);
            if *c < 0.5 {
                *c += 1.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_spread(uv: &[Point2<f64>]) -> f64 {
        let mut m: f64 = 0.0;
        for a in uv {
            for b in uv {
                m = m.max((a.x - b.x).abs());
            }
        }
        m
    }

    #[test]
    fn test_reference_points() {
        let front = equirectangular(&Point3::new(0.0, 0.0, 1.0));
        assert!((front.x - 0.5).abs() < 1e-12 && (front.y - 0.5).abs() < 1e-12);

        let east = equirectangular(&Point3::new(1.0, 0.0, 0.0));
        assert!((east.x - 0.75).abs() < 1e-12);

        let north = equirectangular(&Point3::new(0.0, 1.0, 0.0));
        assert!(north.y.abs() < 1e-12);

        let south = equirectangular(&Point3::new(0.0, -2.0, 0.0));
        assert!((south.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_seam_triangle_is_unwrapped() {
        // Straddles the back meridian (z < 0, x changing sign).
        let tri = [
            Point3::new(0.1, 0.0, -1.0),
            Point3::new(-0.1, 0.0, -1.0),
            Point3::new(0.0, 0.1, -1.0),
        ];
        let raw = indexed_uv(&tri, UvOffset::default(), false);
        assert!(max_spread(raw.as_slice()) > 0.5);

        let fixed = per_face_uv(&tri, UvOffset::default(), false);
        assert!(max_spread(fixed.as_slice()) <= 0.5);
        assert!(fixed.as_slice().iter().all(|uv| uv.x >= 0.5));
    }

    #[test]
    fn test_pole_takes_mean_longitude() {
        let tri = [
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.5, 0.5),
            Point3::new(0.5, 0.5, 0.0),
        ];
        let uv = per_face_uv(&tri, UvOffset::default(), false);
        let expected = (uv.get(1).x + uv.get(2).x) / 2.0;
        assert!((uv.get(0).x - expected).abs() < 1e-12);
    }

    #[test]
    fn test_polar_cap_collapses_to_one_longitude() {
        // Corners at longitudes 0, 1/3 and 2/3 around the north pole.
        let tri: Vec<_> = (0..3)
            .map(|k| {
                let t = k as f64 * 2.0 * PI / 3.0;
                Point3::new(0.4 * t.sin(), 0.9, 0.4 * t.cos())
            })
            .collect();
        let raw = indexed_uv(&tri, UvOffset::default(), false);
        assert!(max_spread(raw.as_slice()) > 0.6);

        let fixed = per_face_uv(&tri, UvOffset::default(), false);
        assert!(max_spread(fixed.as_slice()) <= 0.5);
        assert_eq!(fixed.get(0).x, fixed.get(2).x);
        // Latitudes are untouched.
        assert!((fixed.get(1).y - raw.get(1).y).abs() < 1e-12);
    }

    #[test]
    fn test_enclosure_after_offset() {
        // Ordinary triangle near the equator: never enclosed.
        let tri = [
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.9, 0.1, 0.1),
            Point3::new(0.9, -0.1, 0.1),
        ];
        assert!(!encloses_polar_axis(&tri));

        // A quarter turn about x carries the front point to a pole.
        let offset = UvOffset::new(0.0, PI / 2.0);
        let cap = [
            Point3::new(0.3, 0.0, 0.9),
            Point3::new(-0.2, 0.25, 0.9),
            Point3::new(-0.2, -0.25, 0.9),
        ];
        assert!(encloses_polar_axis(&rotated(&offset.rotation(), &cap)));
        let uv = per_face_uv(&cap, offset, false);
        assert!(max_spread(uv.as_slice()) <= 0.5);
    }

    #[test]
    fn test_offset_moves_longitude() {
        let p = [Point3::new(0.0, 0.0, 1.0)];
        let base = indexed_uv(&p, UvOffset::default(), false);
        let turned = indexed_uv(&p, UvOffset::new(PI / 2.0, 0.0), false);
        assert!((turned.get(0).x - base.get(0).x).abs() > 0.2);
        assert!((turned.get(0).y - base.get(0).y).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pts: Vec<_> = (0..30)
            .map(|i| {
                let t = i as f64 * 0.37;
                Point3::new(t.cos(), (t * 0.5).sin(), t.sin())
            })
            .collect();
        let a = per_face_uv(&pts, UvOffset::new(0.3, -0.2), true);
        let b = per_face_uv(&pts, UvOffset::new(0.3, -0.2), false);
        assert_eq!(a, b);
        assert_eq!(a.to_flat_f32().len(), 60);
    }
}
