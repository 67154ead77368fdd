//! Ray-triangle intersection and barycentric helpers.

use crate::{Ray, Vec3};

/// Tolerance for parallel rays and self-intersection at the ray origin.
pub const EPSILON: f32 = 1e-6;

/// Result of a successful ray-triangle test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Distance along the ray (in units of the direction length)
    pub t: f32,
    /// Barycentric weight of the second vertex
    pub u: f32,
    /// Barycentric weight of the third vertex
    pub v: f32,
}

/// Möller-Trumbore ray-triangle intersection.
///
/// Returns `None` for rays parallel to the triangle plane, for hits outside
/// the triangle and for hits at `t <= EPSILON`. Degenerate (zero-area)
/// triangles are always parallel and therefore never hit.
#[inline]
pub fn intersect_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<TriangleHit> {
    let edge1 = b - a;
    let edge2 = c - a;
    let h = ray.direction.cross(edge2);
    let det = edge1.dot(h);

    if det.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / det;
    let s = ray.origin - a;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t > EPSILON {
        Some(TriangleHit { t, u, v })
    } else {
        None
    }
}

/// Barycentric weights of `p` with respect to triangle (a, b, c).
///
/// Computed from the areas of the sub-triangles opposite each vertex, so
/// the result is only meaningful for points on the triangle. The returned
/// vector holds the weights of a, b and c and sums to one. Zero-area
/// triangles yield `None`.
pub fn barycentric_weights(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<Vec3> {
    let ca = a - c;
    let cb = b - c;
    let cp = p - c;

    let area = cb.cross(ca).length();
    if area <= f32::EPSILON {
        return None;
    }

    // Triangle (a, c, p) is opposite b, triangle (b, c, p) is opposite a
    let weight_b = ca.cross(cp).length() / area;
    let weight_a = cb.cross(cp).length() / area;
    Some(Vec3::new(weight_a, weight_b, 1.0 - weight_a - weight_b))
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
