// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod interval;
mod intersect;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use intersect::{barycentric_weights, intersect_triangle, reflect, TriangleHit, EPSILON};
pub use ray::Ray;
