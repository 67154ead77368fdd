//! Scene container for rendering.
//!
//! A `Scene` is everything a frame needs: models, analytic spheres and the
//! environment used for rays that escape. Geometry is added between frames
//! and only read while rendering.

use crate::material::Material;
use crate::model::Model;
use crate::sphere::Sphere;
use crate::texture::Texture;
use lumen_math::{Aabb, Vec3};

/// Identifies the primitive a ray struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveId {
    Triangle {
        model: usize,
        mesh: usize,
        triangle: usize,
    },
    Sphere(usize),
}

/// The renderable world.
#[derive(Debug, Clone)]
pub struct Scene {
    models: Vec<Model>,
    spheres: Vec<Sphere>,
    environments: Vec<Texture>,
    selected_environment: usize,

    /// Multiplier applied to all environment light
    pub environment_strength: f32,
    /// Rotation of the environment map about +Y, in degrees
    pub environment_rotation: f32,
    /// Used when no environment texture is available
    pub background: Vec3,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            spheres: Vec::new(),
            environments: Vec::new(),
            selected_environment: 0,
            environment_strength: 1.0,
            environment_rotation: 0.0,
            background: Vec3::ZERO,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model and return its index.
    pub fn add_model(&mut self, model: Model) -> usize {
        log::info!(
            "Scene: added model '{}' ({} meshes, {} triangles)",
            model.name(),
            model.meshes().len(),
            model.triangle_count()
        );
        self.models.push(model);
        self.models.len() - 1
    }

    /// Add a sphere and return its index.
    pub fn add_sphere(&mut self, sphere: Sphere) -> usize {
        self.spheres.push(sphere);
        self.spheres.len() - 1
    }

    /// Add an environment map and return its index.
    ///
    /// The first map added becomes the selected one.
    pub fn add_environment(&mut self, texture: Texture) -> usize {
        self.environments.push(texture);
        self.environments.len() - 1
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn models_mut(&mut self) -> &mut [Model] {
        &mut self.models
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn environments(&self) -> &[Texture] {
        &self.environments
    }

    pub fn selected_environment(&self) -> usize {
        self.selected_environment
    }

    /// Select the environment map by index. Returns false (and keeps the
    /// current selection) if the index does not exist.
    pub fn select_environment(&mut self, index: usize) -> bool {
        if index < self.environments.len() {
            self.selected_environment = index;
            true
        } else {
            false
        }
    }

    /// The selected environment map, if any.
    pub fn environment(&self) -> Option<&Texture> {
        self.environments.get(self.selected_environment)
    }

    /// Light arriving from `direction` when nothing is hit.
    pub fn environment_radiance(&self, direction: Vec3) -> Vec3 {
        let color = match self.environment() {
            Some(texture) => {
                texture.sample_direction(direction, self.environment_rotation.to_radians())
            }
            None => self.background,
        };
        color * self.environment_strength
    }

    /// Material of a primitive.
    pub fn material(&self, id: PrimitiveId) -> Option<&Material> {
        match id {
            PrimitiveId::Triangle { model, mesh, .. } => self
                .models
                .get(model)
                .and_then(|m| m.meshes().get(mesh))
                .map(|m| m.material()),
            PrimitiveId::Sphere(index) => self.spheres.get(index).map(|s| &s.material),
        }
    }

    /// Editable material of a primitive. Shared by every triangle of a mesh.
    pub fn material_mut(&mut self, id: PrimitiveId) -> Option<&mut Material> {
        match id {
            PrimitiveId::Triangle { model, mesh, .. } => self
                .models
                .get_mut(model)
                .and_then(|m| m.meshes_mut().get_mut(mesh))
                .map(|m| m.material_mut()),
            PrimitiveId::Sphere(index) => self.spheres.get_mut(index).map(|s| &mut s.material),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.models.iter().map(|m| m.triangle_count()).sum()
    }

    /// Bounds of all models and spheres.
    pub fn bounds(&self) -> Aabb {
        let models = self
            .models
            .iter()
            .fold(Aabb::EMPTY, |acc, m| Aabb::surrounding(&acc, &m.bounds()));
        self.spheres.iter().fold(models, |acc, s| {
            let r = Vec3::splat(s.radius);
            Aabb::surrounding(&acc, &Aabb::from_points(s.center - r, s.center + r))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.spheres.is_empty()
    }
}
