//! Analytic sphere primitive.

use crate::hittable::{Hit, Hittable};
use crate::material::Material;
use lumen_math::{Aabb, Interval, Ray, Vec2, Vec3, EPSILON};
use std::f32::consts::PI;

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Outward unit normal at a surface point.
    pub fn normal_at(&self, p: Vec3) -> Vec3 {
        ((p - self.center) / self.radius).normalize_or_zero()
    }

    /// Texture coordinates for a point given by its outward unit normal.
    ///
    /// theta is measured up from -Y, phi around Y starting at -X.
    pub fn uv(normal: Vec3) -> Vec2 {
        let theta = (-normal.y).clamp(-1.0, 1.0).acos();
        let phi = (-normal.z).atan2(normal.x) + PI;
        Vec2::new(phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        if self.radius <= 0.0 {
            return None;
        }

        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        if a == 0.0 {
            return None;
        }
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Same self-intersection floor as triangles
        let range = Interval::new(ray_t.min.max(EPSILON), ray_t.max);

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !range.surrounds(root) {
            root = (h + sqrtd) / a;
            if !range.surrounds(root) {
                return None;
            }
        }

        Some(Hit { t: root, index: 0 })
    }

    fn bounding_box(&self) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        Aabb::from_points(self.center - rvec, self.center + rvec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere() -> Sphere {
        Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Material::default())
    }

    #[test]
    fn test_sphere_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let hit = sphere().hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((hit.t - 0.5).abs() < 0.001); // Should hit at t=0.5
    }

    #[test]
    fn test_sphere_miss() {
        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere().hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_sphere_hit_from_inside() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::X);
        let hit = sphere().hit(&ray, Interval::new(0.0, f32::INFINITY)).unwrap();
        assert!((hit.t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_spheres_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let point = Sphere::new(Vec3::new(0.0, 0.0, -1.0), -1.0, Material::default());
        assert_eq!(point.radius, 0.0);
        assert!(point.hit(&ray, Interval::UNIVERSE).is_none());

        let still = Ray::new(Vec3::ZERO, Vec3::ZERO);
        assert!(sphere().hit(&still, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_sphere_normal_and_uv() {
        let s = sphere();
        let top = s.center + Vec3::new(0.0, 0.5, 0.0);
        assert!((s.normal_at(top) - Vec3::Y).length() < 1e-6);

        let uv = Sphere::uv(Vec3::Y);
        assert!((uv.y - 1.0).abs() < 1e-6);
        let uv = Sphere::uv(Vec3::NEG_Y);
        assert!(uv.y.abs() < 1e-6);
        let uv = Sphere::uv(Vec3::NEG_X);
        assert!(uv.x.abs() < 1e-6 || (uv.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_bounding_box() {
        let bbox = sphere().bounding_box();
        assert_eq!(bbox.min(), Vec3::new(-0.5, -0.5, -1.5));
        assert_eq!(bbox.max(), Vec3::new(0.5, 0.5, -0.5));
    }
}
