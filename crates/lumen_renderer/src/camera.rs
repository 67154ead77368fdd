//! Pinhole camera producing one primary ray direction per pixel.

use lumen_math::{Mat4, Vec3, Vec4};

/// Perspective camera.
///
/// Matrices and the per-pixel ray directions are recomputed whenever the
/// pose or viewport changes. Every setter reports whether anything changed
/// so callers can restart accumulation.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    forward: Vec3,
    up: Vec3,
    /// Vertical field of view in degrees
    fov_y: f32,
    near: f32,
    far: f32,

    width: u32,
    height: u32,

    projection: Mat4,
    inverse_projection: Mat4,
    view: Mat4,
    inverse_view: Mat4,

    /// World-space unit directions, row 0 = top row
    ray_directions: Vec<Vec3>,
}

impl Camera {
    /// Create a camera at (0, 0, 3) looking down -Z.
    pub fn new(fov_y: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_y,
            near,
            far,
            width: 0,
            height: 0,
            projection: Mat4::IDENTITY,
            inverse_projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            inverse_view: Mat4::IDENTITY,
            ray_directions: Vec::new(),
        };
        camera.recalculate_view();
        camera
    }

    /// Set the viewport size. Returns true if the size changed.
    pub fn on_resize(&mut self, width: u32, height: u32) -> bool {
        if width == self.width && height == self.height {
            return false;
        }

        self.width = width;
        self.height = height;
        self.recalculate_projection();
        self.recalculate_ray_directions();
        true
    }

    /// Move to `position` and look at `target`. Returns true if the pose
    /// changed.
    pub fn look_at(&mut self, position: Vec3, target: Vec3) -> bool {
        let forward = (target - position).normalize_or_zero();
        if forward == Vec3::ZERO {
            return false;
        }
        self.set_pose(position, forward)
    }

    pub fn set_position(&mut self, position: Vec3) -> bool {
        self.set_pose(position, self.forward)
    }

    /// Set the viewing direction. Zero vectors are ignored.
    pub fn set_forward(&mut self, forward: Vec3) -> bool {
        let forward = forward.normalize_or_zero();
        if forward == Vec3::ZERO {
            return false;
        }
        self.set_pose(self.position, forward)
    }

    fn set_pose(&mut self, position: Vec3, forward: Vec3) -> bool {
        if position == self.position && forward == self.forward {
            return false;
        }

        self.position = position;
        self.forward = forward;
        self.recalculate_view();
        self.recalculate_ray_directions();
        true
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn inverse_projection(&self) -> Mat4 {
        self.inverse_projection
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn inverse_view(&self) -> Mat4 {
        self.inverse_view
    }

    /// Unit ray directions for every pixel, indexed by `y * width + x`.
    pub fn ray_directions(&self) -> &[Vec3] {
        &self.ray_directions
    }

    /// Primary ray direction for one pixel.
    pub fn ray_direction(&self, x: u32, y: u32) -> Option<Vec3> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.ray_directions
            .get((y as usize) * (self.width as usize) + x as usize)
            .copied()
    }

    fn recalculate_projection(&mut self) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let aspect = self.width as f32 / self.height as f32;
        self.projection =
            Mat4::perspective_rh(self.fov_y.to_radians(), aspect, self.near, self.far);
        self.inverse_projection = self.projection.inverse();
    }

    fn recalculate_view(&mut self) {
        // Looking straight along `up` would make look_at degenerate
        let up = if self.forward.cross(Vec3::Y).length_squared() < 1e-12 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        self.up = up;
        self.view = Mat4::look_at_rh(self.position, self.position + self.forward, self.up);
        self.inverse_view = self.view.inverse();
    }

    fn recalculate_ray_directions(&mut self) {
        let width = self.width as usize;
        let height = self.height as usize;
        self.ray_directions.clear();
        if width == 0 || height == 0 {
            return;
        }

        self.ray_directions.reserve(width * height);
        for y in 0..height {
            for x in 0..width {
                // Pixel centers, NDC y = +1 at the top row
                let ndc_x = (x as f32 + 0.5) / width as f32 * 2.0 - 1.0;
                let ndc_y = 1.0 - (y as f32 + 0.5) / height as f32 * 2.0;

                let target = self.inverse_projection * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
                let local = (target.truncate() / target.w).normalize();
                let direction = self.inverse_view.transform_vector3(local);
                self.ray_directions.push(direction.normalize());
            }
        }

        log::debug!("Camera: recomputed {} ray directions", self.ray_directions.len());
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(45.0, 0.1, 100.0)
    }
}
