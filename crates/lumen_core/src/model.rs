//! Models: named groups of meshes.

use crate::mesh::Mesh;
use lumen_math::Aabb;

/// A named collection of meshes with an aggregate bounding box.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    meshes: Vec<Mesh>,
    bounds: Aabb,
}

impl Model {
    pub fn new(name: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        let bounds = meshes
            .iter()
            .fold(Aabb::EMPTY, |acc, mesh| Aabb::surrounding(&acc, &mesh.bounds()));
        Self {
            name: name.into(),
            meshes,
            bounds,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Meshes with editable materials. The slice cannot grow, so the
    /// bounding box stays valid.
    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangles().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{shapes, Material};
    use lumen_math::Vec3;

    #[test]
    fn test_model_bounds_union() {
        let a = shapes::cube("a", Vec3::new(-2.0, 0.0, 0.0), 1.0, Material::default());
        let b = shapes::cube("b", Vec3::new(3.0, 1.0, 0.0), 2.0, Material::default());
        let model = Model::new("pair", vec![a, b]);

        assert_eq!(model.bounds().min(), Vec3::new(-2.5, -0.5, -1.0));
        assert_eq!(model.bounds().max(), Vec3::new(4.0, 2.0, 1.0));
        assert_eq!(model.triangle_count(), 24);
    }

    #[test]
    fn test_empty_model() {
        let model = Model::new("nothing", Vec::new());
        assert!(model.bounds().is_empty());
        assert_eq!(model.triangle_count(), 0);
    }
}
