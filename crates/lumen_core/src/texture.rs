//! Texture storage and sampling.
//!
//! Textures keep the decoded 8-bit image exactly as loaded (width, height,
//! channel count and raw bytes). Material maps are sampled with planar UV
//! lookup, environment maps with an equirectangular mapping of a direction.

use std::f32::consts::{PI, TAU};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use lumen_math::{Vec2, Vec3};
use thiserror::Error;

/// Errors that can occur while creating a texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture data has {actual} bytes, expected {expected}")]
    InvalidData { expected: usize, actual: usize },

    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(u8),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded image.
///
/// An empty texture (no pixel data) stands in for an image that failed to
/// decode; it samples black.
#[derive(Debug)]
pub struct Texture {
    name: String,
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
    /// Set once the "sampling an empty texture" warning has been logged
    warned_empty: AtomicBool,
}

impl Texture {
    /// Create a texture from raw row-major pixel bytes.
    pub fn from_raw(
        name: impl Into<String>,
        width: u32,
        height: u32,
        channels: u8,
        data: Vec<u8>,
    ) -> TextureResult<Self> {
        if !(1..=4).contains(&channels) {
            return Err(TextureError::UnsupportedChannels(channels));
        }

        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(TextureError::InvalidData {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            name: name.into(),
            width,
            height,
            channels,
            data,
            warned_empty: AtomicBool::new(false),
        })
    }

    /// A texture without image data. Samples black.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: 0,
            height: 0,
            channels: 3,
            data: Vec::new(),
            warned_empty: AtomicBool::new(false),
        }
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Vec3) -> Self {
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            name: "<solid>".to_string(),
            width: 1,
            height: 1,
            channels: 3,
            data: vec![to_byte(color.x), to_byte(color.y), to_byte(color.z)],
            warned_empty: AtomicBool::new(false),
        }
    }

    /// Load and decode an image file.
    ///
    /// Images with alpha keep four channels, everything else (including
    /// HDR files, which are tone-clamped to 8 bits) is stored as RGB.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.display().to_string(),
            source,
        })?;

        let (width, height, channels, data) = if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            (rgba.width(), rgba.height(), 4, rgba.into_raw())
        } else {
            let rgb = img.to_rgb8();
            (rgb.width(), rgb.height(), 3, rgb.into_raw())
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        log::info!(
            "Texture {} loaded ({}x{}, {} channels)",
            path.display(),
            width,
            height,
            channels
        );

        Self::from_raw(name, width, height, channels, data)
    }

    /// Load an image file, falling back to an empty texture on failure.
    ///
    /// The failure is logged; rendering continues with black samples.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(texture) => texture,
            Err(e) => {
                log::error!("{}", e);
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Self::empty(name)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// True if the texture holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample the texture at UV coordinates (nearest pixel).
    ///
    /// `u` and `v` map [0, 1] onto the columns and rows; row 0 is the
    /// first row of the image. Coordinates outside [0, 1] clamp to the edge.
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        if self.is_empty() {
            self.warn_empty();
            return Vec3::ZERO;
        }

        // Float-to-int casts saturate and map NaN to 0
        let x = ((uv.x * self.width as f32).floor() as i64).clamp(0, self.width as i64 - 1);
        let y = ((uv.y * self.height as f32).floor() as i64).clamp(0, self.height as i64 - 1);

        self.pixel(x as u32, y as u32)
    }

    /// Sample with spherical angles: azimuth `phi` in [-π, π] and zenith
    /// `theta` in [0, π].
    ///
    /// Azimuths outside the range (e.g. after adding a rotation offset)
    /// wrap around.
    pub fn sample_spherical(&self, phi: f32, theta: f32) -> Vec3 {
        let u = ((phi + PI) / TAU).rem_euclid(1.0);
        let v = theta / PI;
        self.sample(Vec2::new(u, v))
    }

    /// Equirectangular lookup of a world direction, rotated about +Y by
    /// `rotation` radians.
    pub fn sample_direction(&self, direction: Vec3, rotation: f32) -> Vec3 {
        let dir = direction.normalize_or_zero();
        let theta = dir.y.clamp(-1.0, 1.0).acos();
        let phi = dir.x.atan2(dir.z) + rotation;
        self.sample_spherical(phi, theta)
    }

    /// Get pixel at integer coordinates as normalized RGB.
    fn pixel(&self, x: u32, y: u32) -> Vec3 {
        let channels = self.channels as usize;
        let idx = (y as usize * self.width as usize + x as usize) * channels;
        let to_unit = |byte: u8| byte as f32 / 255.0;

        if channels >= 3 {
            Vec3::new(
                to_unit(self.data[idx]),
                to_unit(self.data[idx + 1]),
                to_unit(self.data[idx + 2]),
            )
        } else {
            Vec3::splat(to_unit(self.data[idx]))
        }
    }

    fn warn_empty(&self) {
        if !self.warned_empty.swap(true, Ordering::Relaxed) {
            log::warn!("Sampling texture '{}' without image data, using black", self.name);
        }
    }
}

impl Clone for Texture {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: self.data.clone(),
            warned_empty: AtomicBool::new(self.warned_empty.load(Ordering::Relaxed)),
        }
    }
}

/// Rec. 709 luminance of a linear color.
#[inline]
pub fn luminance(color: Vec3) -> f32 {
    color.dot(Vec3::new(0.2126, 0.7152, 0.0722))
}
