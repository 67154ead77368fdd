//! Hittable trait for ray-primitive intersection.

use lumen_math::{Aabb, Interval, Ray};
use serde::{Deserialize, Serialize};

/// Closest intersection reported by a primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Index of the struck element inside the primitive (triangle index
    /// for meshes, 0 for analytic shapes)
    pub index: usize,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Find the closest hit with `ray_t.min < t < ray_t.max`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}

/// How triangles inside a mesh are searched once its box has been hit.
///
/// Both strategies report identical hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acceleration {
    /// Test every triangle of each mesh whose bounding box the ray hits.
    BroadPhase,
    /// Walk the per-mesh bounding volume hierarchy.
    #[default]
    Bvh,
}
