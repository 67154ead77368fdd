use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box used for broad-phase culling and the mesh BVH.
///
/// An AABB is defined by three intervals (one per axis). Boxes with zero
/// extent along an axis are legal and represent flat geometry. Boxes are
/// stored tight; culling pads them explicitly with [`Aabb::padded`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Relative padding applied to boxes before culling and BVH traversal.
    pub const CULL_PADDING: f32 = 1e-4;

    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));
        Self { x, y, z }
    }

    /// Smallest box containing every point; `EMPTY` for no points.
    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        positions
            .into_iter()
            .fold(Aabb::EMPTY, |acc, p| acc.include_point(p))
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Grow the box so that it also contains `p`.
    pub fn include_point(&self, p: Vec3) -> Self {
        Self {
            x: self.x.include(p.x),
            y: self.y.include(p.y),
            z: self.z.include(p.z),
        }
    }

    /// Copy of the box grown on every side by `relative` times its largest
    /// absolute coordinate (plus `relative` itself, for boxes at the origin).
    ///
    /// Slab tests round differently from triangle tests, so a ray through a
    /// vertex can miss the tight box of a triangle it hits. Hierarchies test
    /// against padded boxes instead.
    pub fn padded(&self, relative: f32) -> Self {
        if self.is_empty() {
            return *self;
        }

        let scale = self.min().abs().max(self.max().abs()).max_element();
        let delta = 2.0 * relative * (1.0 + scale);
        Self {
            x: self.x.expand(delta),
            y: self.y.expand(delta),
            z: self.z.expand(delta),
        }
    }

    /// Minimum corner.
    #[inline]
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    #[inline]
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// True if the box bounds nothing (built from zero points).
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Slab test against the whole ray (any `t >= 0`).
    ///
    /// Zero direction components produce ±infinity through the reciprocal,
    /// so axis-aligned rays need no special casing.
    pub fn intersects(&self, ray: &Ray) -> bool {
        if self.is_empty() {
            return false;
        }

        let inv = ray.inv_direction();
        let (near_x, far_x) = slab(self.x, ray.origin.x, inv.x);
        let (near_y, far_y) = slab(self.y, ray.origin.y, inv.y);
        let (near_z, far_z) = slab(self.z, ray.origin.z, inv.z);

        let t_near = near_x.max(near_y).max(near_z);
        let t_far = far_x.min(far_y).min(far_z);

        t_near <= t_far && t_far >= 0.0
    }

    /// Slab test restricted to the parameter range `ray_t`.
    ///
    /// Used while traversing a hierarchy, where `ray_t.max` is the closest
    /// hit found so far.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        if self.is_empty() {
            return false;
        }

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / ray.direction[axis];
            let mut t0 = (slab.min - ray.origin[axis]) * adinv;
            let mut t1 = (slab.max - ray.origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return false;
            }
        }

        true
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size && x_size > z_size {
            0
        } else if y_size > z_size {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min() + self.max()) * 0.5
    }

    /// A box containing nothing.
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

/// Entry and exit parameters for one slab.
///
/// `0 * inf` is NaN when the origin sits on a slab plane and the ray runs
/// parallel to it; the axis is then unconstrained.
#[inline]
fn slab(interval: Interval, origin: f32, inv_dir: f32) -> (f32, f32) {
    let t1 = (interval.min - origin) * inv_dir;
    let t2 = (interval.max - origin) * inv_dir;
    if t1.is_nan() || t2.is_nan() {
        return (f32::NEG_INFINITY, f32::INFINITY);
    }
    (t1.min(t2), t1.max(t2))
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
