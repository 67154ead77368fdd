//! Surface response at a hit point.

use lumen_core::Material;
use lumen_math::{reflect, Vec2, Vec3};
use rand::Rng;

use crate::sampling::{random_f32, random_unit_vector};

/// Material inputs resolved at one texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub emission: Vec3,
    pub roughness: f32,
    pub specular_chance: f32,
}

/// Outgoing direction of one bounce and the color it carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    pub direction: Vec3,
    pub attenuation: Vec3,
    pub is_specular: bool,
}

impl SurfaceSample {
    /// Evaluate texture maps and scalars of `material` at `uv`.
    pub fn resolve(material: &Material, uv: Vec2) -> Self {
        let diffuse = material.diffuse_at(uv);
        Self {
            diffuse,
            specular: material.specular_color_at(diffuse),
            emission: material.emission(),
            roughness: material.roughness_at(uv),
            specular_chance: material.specular_chance_at(uv),
        }
    }

    /// Pick the next direction.
    ///
    /// A uniform draw against the specular chance decides whether the bounce
    /// is specular. Specular bounces blend the mirror direction toward the
    /// diffuse one by roughness; diffuse bounces use the cosine-weighted
    /// `normal + random unit vector` direction.
    pub fn scatter<R: Rng + ?Sized>(&self, incoming: Vec3, normal: Vec3, rng: &mut R) -> Scatter {
        let is_specular = random_f32(rng) < self.specular_chance;

        let mut diffuse_dir = (normal + random_unit_vector(rng)).normalize_or_zero();
        if diffuse_dir == Vec3::ZERO {
            // Random vector cancelled the normal
            diffuse_dir = normal;
        }

        if is_specular {
            let specular_dir = reflect(incoming, normal);
            let direction = specular_dir
                .lerp(diffuse_dir, self.roughness)
                .try_normalize()
                .unwrap_or(normal);
            Scatter {
                direction,
                attenuation: self.specular,
                is_specular,
            }
        } else {
            Scatter {
                direction: diffuse_dir,
                attenuation: self.diffuse,
                is_specular,
            }
        }
    }
}
