//! Vector and quaternion helpers.
//!
//! Thin conveniences over `nalgebra` for the handful of operations the
//! unfolding pipeline needs: midpoints, robust face normals, dihedral
//! angles, and rigid rotations about a hinge line.

use nalgebra::{Isometry3, Point3, Translation3, Unit, UnitQuaternion, Vector3};

/// Squared-length threshold below which a vector is treated as zero.
pub const DEGENERATE_EPSILON: f64 = 1e-24;

/// Midpoint of two points.
#[inline]
pub fn middle(a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    a + (b - a) / 2.0
}

/// Project a point onto the unit sphere.
///
/// The origin has no direction and is returned unchanged.
pub fn normalize_to_sphere(p: &Point3<f64>) -> Point3<f64> {
    let len = p.coords.norm();
    if len > 0.0 {
        Point3::from(p.coords / len)
    } else {
        *p
    }
}

/// Unit normal of a counter-clockwise triangle, or `None` if the triangle
/// has (near) zero area.
pub fn triangle_normal(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Option<Vector3<f64>> {
    let n = (p1 - p0).cross(&(p2 - p0));
    if n.norm_squared() > DEGENERATE_EPSILON {
        Some(n.normalize())
    } else {
        None
    }
}

/// Unit normal of a triangle, falling back to the radial direction of its
/// centroid when the triangle is degenerate.
///
/// Collinear or coincident corners would otherwise produce NaN; on a sphere
/// the centroid direction is the normal the face would have had.
pub fn face_normal(corners: &[Point3<f64>; 3]) -> Vector3<f64> {
    if let Some(n) = triangle_normal(&corners[0], &corners[1], &corners[2]) {
        return n;
    }
    let centroid = (corners[0].coords + corners[1].coords + corners[2].coords) / 3.0;
    if centroid.norm_squared() > DEGENERATE_EPSILON {
        centroid.normalize()
    } else {
        Vector3::y()
    }
}

/// Angle in radians between two unit vectors, with the dot product clamped
/// to `[-1, 1]` so rounding never produces NaN.
#[inline]
pub fn angle_between(n0: &Vector3<f64>, n1: &Vector3<f64>) -> f64 {
    n0.dot(n1).clamp(-1.0, 1.0).acos()
}

/// Rigid rotation by `angle` radians about the line through `pivot` along
/// `axis`.
pub fn hinge_rotation(pivot: &Point3<f64>, axis: &Unit<Vector3<f64>>, angle: f64) -> Isometry3<f64> {
    let rotation = UnitQuaternion::from_axis_angle(axis, angle);
    let translation = Translation3::from(pivot.coords - rotation * pivot.coords);
    Isometry3::from_parts(translation, rotation)
}

/// Unit direction from `a` to `b`, or `None` if the points coincide.
pub fn direction(a: &Point3<f64>, b: &Point3<f64>) -> Option<Unit<Vector3<f64>>> {
    let d = b - a;
    if d.norm_squared() > DEGENERATE_EPSILON {
        Some(Unit::new_normalize(d))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_middle() {
        let m = middle(&Point3::new(0.0, 0.0, 0.0), &Point3::new(2.0, -4.0, 6.0));
        assert_eq!(m, Point3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn test_normalize_to_sphere() {
        let p = normalize_to_sphere(&Point3::new(0.0, 3.0, 4.0));
        assert!((p.coords.norm() - 1.0).abs() < 1e-12);
        assert_eq!(normalize_to_sphere(&Point3::origin()), Point3::origin());
    }

    #[test]
    fn test_triangle_normal_ccw() {
        let n = triangle_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert!((n - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn test_degenerate_normal_falls_back_to_radial() {
        let p = Point3::new(0.0, 0.0, 2.0);
        let n = face_normal(&[p, p, Point3::new(0.0, 0.0, 3.0)]);
        assert!((n - Vector3::z()).norm() < 1e-12);
        assert!(n.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_angle_between_clamps() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        // Slightly longer than unit: dot exceeds 1 without clamping.
        let b = Vector3::new(1.0 + 1e-12, 0.0, 0.0);
        assert_eq!(angle_between(&a, &b), 0.0);
        assert!((angle_between(&a, &Vector3::y()) - FRAC_PI_2).abs() < 1e-12);
        assert!((angle_between(&a, &-a) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_hinge_rotation_keeps_axis_fixed() {
        let pivot = Point3::new(1.0, 0.0, 0.0);
        let axis = direction(&pivot, &Point3::new(1.0, 1.0, 0.0)).unwrap();
        let iso = hinge_rotation(&pivot, &axis, FRAC_PI_2);

        let on_axis = Point3::new(1.0, 5.0, 0.0);
        assert!((iso * on_axis - on_axis).norm() < 1e-12);

        // (2,0,0) is one unit off the axis along +x; a quarter turn about +y
        // takes it to -z.
        let moved = iso * Point3::new(2.0, 0.0, 0.0);
        assert!((moved - Point3::new(1.0, 0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_direction_of_coincident_points() {
        let p = Point3::new(0.3, 0.2, 0.1);
        assert!(direction(&p, &p).is_none());
    }
}
