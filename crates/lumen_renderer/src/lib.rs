//! Lumen Renderer - progressive CPU path tracing.
//!
//! A Monte Carlo path tracer for [`lumen_core::Scene`]s:
//!
//! - One sample per pixel per frame, averaged over successive frames
//! - Bounded bounce loop with stochastic diffuse/specular lobes
//! - Per-mesh BVH or box-culled linear triangle search
//! - Rows rendered in parallel with rayon
//!
//! # Example
//!
//! ```ignore
//! let mut camera = Camera::default();
//! camera.on_resize(640, 360);
//!
//! let mut renderer = Renderer::default();
//! let mut image = Image::new(640, 360);
//! let mut accumulation = Image::new(640, 360);
//! for _ in 0..64 {
//!     renderer.render(&scene, &camera, &mut image, &mut accumulation);
//! }
//! image.save_png("out.png")?;
//! ```

mod camera;
mod error;
mod image;
mod renderer;
mod sampling;
mod shading;
mod trace;

pub use crate::camera::Camera;
pub use crate::error::{RenderError, RenderResult};
pub use crate::image::{color_to_rgba, linear_to_gamma, Image};
pub use crate::renderer::{per_pixel, RenderSettings, Renderer};
pub use crate::sampling::{pixel_rng, random_f32, random_unit_vector, PixelRng};
pub use crate::shading::{Scatter, SurfaceSample};
pub use crate::trace::{closest_hit, closest_primitive, trace_ray, HitPayload};

/// Re-export math and scene types used in the public API
pub use lumen_core::{Acceleration, Scene};
pub use lumen_math::{Ray, Vec3};
