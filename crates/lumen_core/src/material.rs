//! Surface material parameters.

use crate::texture::{luminance, Texture};
use lumen_math::{Vec2, Vec3};

/// Which material input a texture drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    Diffuse,
    Specular,
    Roughness,
    Normal,
}

/// Material description shared by all primitives.
///
/// Scalar parameters are editable at runtime. Texture maps, when bound,
/// replace the matching scalar: the diffuse map replaces `diffuse_color`,
/// the specular map's red channel replaces `specular_probability` and the
/// roughness map's luminance replaces `roughness`. The normal map index is
/// stored for importers but does not affect shading.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,

    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub emission_color: Vec3,
    pub emission_power: f32,

    /// 0 = mirror reflection, 1 = fully diffuse direction
    pub roughness: f32,
    /// Chance that a bounce is specular
    pub specular_probability: f32,
    /// Tints the specular color toward the diffuse color
    pub metallic: f32,

    pub textures: Vec<Texture>,
    pub diffuse_texture: Option<usize>,
    pub specular_texture: Option<usize>,
    pub roughness_texture: Option<usize>,
    pub normal_texture: Option<usize>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "NONAME".to_string(),
            diffuse_color: Vec3::ONE,
            specular_color: Vec3::ONE,
            emission_color: Vec3::ZERO,
            emission_power: 1.0,
            roughness: 1.0,
            specular_probability: 0.0,
            metallic: 0.0,
            textures: Vec::new(),
            diffuse_texture: None,
            specular_texture: None,
            roughness_texture: None,
            normal_texture: None,
        }
    }
}

impl Material {
    /// A diffuse material with the given color.
    pub fn new(name: impl Into<String>, diffuse_color: Vec3) -> Self {
        Self {
            name: name.into(),
            diffuse_color,
            ..Default::default()
        }
    }

    /// A light source.
    pub fn emissive(name: impl Into<String>, color: Vec3, power: f32) -> Self {
        Self {
            name: name.into(),
            emission_color: color,
            emission_power: power,
            ..Default::default()
        }
    }

    pub fn with_specular(mut self, color: Vec3, probability: f32) -> Self {
        self.specular_color = color;
        self.specular_probability = probability;
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic;
        self
    }

    pub fn with_emission(mut self, color: Vec3, power: f32) -> Self {
        self.emission_color = color;
        self.emission_power = power;
        self
    }

    /// Append a texture and bind it to `slot`, replacing any previous
    /// binding. Returns the texture's index in the list.
    pub fn add_texture(&mut self, slot: TextureSlot, texture: Texture) -> usize {
        let index = self.textures.len();
        self.textures.push(texture);
        *self.slot_mut(slot) = Some(index);
        index
    }

    /// Texture bound to `slot`. Indices that do not resolve count as unbound.
    pub fn texture(&self, slot: TextureSlot) -> Option<&Texture> {
        let index = match slot {
            TextureSlot::Diffuse => self.diffuse_texture,
            TextureSlot::Specular => self.specular_texture,
            TextureSlot::Roughness => self.roughness_texture,
            TextureSlot::Normal => self.normal_texture,
        };
        index.and_then(|i| self.textures.get(i))
    }

    fn slot_mut(&mut self, slot: TextureSlot) -> &mut Option<usize> {
        match slot {
            TextureSlot::Diffuse => &mut self.diffuse_texture,
            TextureSlot::Specular => &mut self.specular_texture,
            TextureSlot::Roughness => &mut self.roughness_texture,
            TextureSlot::Normal => &mut self.normal_texture,
        }
    }

    /// Emitted radiance (color scaled by power).
    pub fn emission(&self) -> Vec3 {
        self.emission_color * self.emission_power
    }

    pub fn is_emissive(&self) -> bool {
        self.emission().max_element() > 0.0
    }

    /// Diffuse color at `uv`.
    pub fn diffuse_at(&self, uv: Vec2) -> Vec3 {
        match self.texture(TextureSlot::Diffuse) {
            Some(texture) => texture.sample(uv),
            None => self.diffuse_color,
        }
    }

    /// Specular color for a surface whose diffuse color is `diffuse`.
    pub fn specular_color_at(&self, diffuse: Vec3) -> Vec3 {
        self.specular_color.lerp(diffuse, self.metallic)
    }

    /// Probability of a specular bounce at `uv`.
    pub fn specular_chance_at(&self, uv: Vec2) -> f32 {
        match self.texture(TextureSlot::Specular) {
            Some(texture) => texture.sample(uv).x,
            None => self.specular_probability,
        }
    }

    /// Roughness at `uv`.
    pub fn roughness_at(&self, uv: Vec2) -> f32 {
        match self.texture(TextureSlot::Roughness) {
            Some(texture) => luminance(texture.sample(uv)),
            None => self.roughness,
        }
    }
}
