//! Lumen Core - scene representation for the path tracer.
//!
//! This crate provides:
//!
//! - **Geometry**: `Vertex`, `Triangle`, `Mesh` (with a per-mesh `MeshBvh`),
//!   `Model` and the analytic `Sphere`
//! - **Shading inputs**: `Material` and `Texture` with planar and
//!   equirectangular sampling
//! - **Scene**: the full renderable world for one frame, including the
//!   environment maps
//!
//! Meshes are normally produced by an importer outside this crate; the
//! `shapes` module builds a few procedural ones for demos and tests.
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{shapes, Material, Model, Scene};
//! use lumen_math::Vec3;
//!
//! let light = Material::emissive("light", Vec3::ONE, 4.0);
//! let mut scene = Scene::new();
//! scene.add_model(Model::new("lamp", vec![shapes::icosphere("bulb", 1.0, 2, light)]));
//! ```

pub mod bvh;
pub mod hittable;
pub mod material;
pub mod mesh;
pub mod model;
pub mod scene;
pub mod shapes;
pub mod sphere;
pub mod texture;

// Re-export commonly used types
pub use bvh::MeshBvh;
pub use hittable::{Acceleration, Hit, Hittable};
pub use material::{Material, TextureSlot};
pub use mesh::{Mesh, Triangle, Vertex};
pub use model::Model;
pub use scene::{PrimitiveId, Scene};
pub use sphere::Sphere;
pub use texture::{Texture, TextureError, TextureResult};
