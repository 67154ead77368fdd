//! Progressive path tracing renderer.
//!
//! Each call to [`Renderer::render`] traces one sample per pixel and folds
//! it into the accumulation buffer; the displayed image is the running
//! average. Rows are rendered in parallel with rayon.

use std::path::Path;

use lumen_core::{Acceleration, Scene};
use lumen_math::{Ray, Vec3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::RenderResult;
use crate::image::Image;
use crate::sampling::{pixel_rng, PixelRng};
use crate::shading::SurfaceSample;
use crate::trace::trace_ray;

/// Offset along the normal for the next bounce origin.
const SURFACE_OFFSET: f32 = 1e-4;

/// Render configuration.
///
/// Missing fields take their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Average successive frames instead of showing single samples
    pub accumulate: bool,
    /// Add environment light for rays that escape the scene
    pub show_environment: bool,
    /// Maximum number of bounces per path
    pub max_bounces: u32,
    /// Base seed for all per-pixel generators
    pub seed: u64,
    /// Triangle search inside each mesh
    pub acceleration: Acceleration,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            accumulate: true,
            show_environment: true,
            max_bounces: 10,
            seed: 0,
            acceleration: Acceleration::Bvh,
        }
    }
}

impl RenderSettings {
    /// Parse settings from JSON.
    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> RenderResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> RenderResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Progressive renderer state.
#[derive(Debug)]
pub struct Renderer {
    settings: RenderSettings,
    width: u32,
    height: u32,
    /// Averaging denominator, starts at 1
    frame_index: u32,
    /// Frames rendered since creation, used for seeding
    frame_counter: u64,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            width: 0,
            height: 0,
            frame_index: 1,
            frame_counter: 0,
        }
    }

    /// Record the viewport size. A change restarts accumulation.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }

        log::info!("Renderer: resized to {}x{}", width, height);
        self.width = width;
        self.height = height;
        self.reset_frame_index();
    }

    /// Restart accumulation with the next frame.
    pub fn reset_frame_index(&mut self) {
        self.frame_index = 1;
    }

    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Settings are read at the start of every frame. Callers changing
    /// anything that alters the image should also reset the frame index.
    pub fn settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    /// Render one frame.
    ///
    /// Traces one path per pixel, adds it into `accumulation` and writes the
    /// running average into `image`. Both images are resized to the camera
    /// viewport if they do not match it.
    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        image: &mut Image,
        accumulation: &mut Image,
    ) {
        let width = camera.width();
        let height = camera.height();
        self.on_resize(width, height);

        let image_resized = image.on_resize(width, height);
        let accumulation_resized = accumulation.on_resize(width, height);
        if image_resized || accumulation_resized {
            log::warn!(
                "Renderer: image buffers did not match the {}x{} viewport, resized",
                width,
                height
            );
            self.reset_frame_index();
        }

        if width == 0 || height == 0 {
            return;
        }

        if self.frame_index == 1 {
            accumulation.clear();
        }

        let row = width as usize;
        let frame_index = self.frame_index as f32;
        let frame_counter = self.frame_counter;
        let settings = &self.settings;
        let directions = camera.ray_directions();
        let origin = camera.position();

        image
            .pixels_mut()
            .par_chunks_mut(row)
            .zip(accumulation.pixels_mut().par_chunks_mut(row))
            .enumerate()
            .for_each(|(y, (image_row, accum_row))| {
                for (x, (pixel, accum)) in image_row
                    .iter_mut()
                    .zip(accum_row.iter_mut())
                    .enumerate()
                {
                    let index = y * row + x;
                    let mut rng = pixel_rng(settings.seed, frame_counter, index);
                    let ray = Ray::new(origin, directions[index]);

                    *accum += per_pixel(scene, settings, ray, &mut rng);
                    *pixel = *accum / frame_index;
                }
            });

        log::debug!(
            "Renderer: frame {} done (average of {})",
            self.frame_counter,
            self.frame_index
        );

        self.frame_counter += 1;
        if self.settings.accumulate {
            self.frame_index += 1;
        } else {
            self.frame_index = 1;
        }
    }
}

/// Trace one path and return the light it gathers.
///
/// A bounded loop replaces recursion: every bounce adds emission weighted
/// by the current throughput, then scales the throughput by the chosen
/// lobe's color. Escaping rays pick up the environment. Non-finite results
/// are returned as black.
pub fn per_pixel(
    scene: &Scene,
    settings: &RenderSettings,
    mut ray: Ray,
    rng: &mut PixelRng,
) -> Vec3 {
    let mut light = Vec3::ZERO;
    let mut throughput = Vec3::ONE;

    for _ in 0..settings.max_bounces {
        let Some(payload) = trace_ray(scene, &ray, settings.acceleration) else {
            if settings.show_environment {
                light += scene.environment_radiance(ray.direction) * throughput;
            }
            break;
        };

        let Some(material) = scene.material(payload.primitive) else {
            break;
        };

        let surface = SurfaceSample::resolve(material, payload.tex_coord);
        let scatter = surface.scatter(ray.direction, payload.world_normal, rng);

        light += surface.emission * throughput;
        throughput *= scatter.attenuation;

        ray = Ray::new(
            payload.world_position + payload.world_normal * SURFACE_OFFSET,
            scatter.direction,
        );
    }

    if light.is_finite() {
        light
    } else {
        Vec3::ZERO
    }
}
