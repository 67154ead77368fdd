//! Triangle mesh geometry.
//!
//! A mesh owns its vertices, the index list they were loaded with, the
//! triangles resolved from that index list and exactly one material. The
//! bounding box and the BVH are computed once at construction.

use crate::bvh::MeshBvh;
use crate::hittable::{Acceleration, Hit, Hittable};
use crate::material::Material;
use lumen_math::{barycentric_weights, intersect_triangle, Aabb, Interval, Ray, Vec2, Vec3};

/// A mesh vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// A triangle with its three vertices copied out of the mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Vertex,
    pub b: Vertex,
    pub c: Vertex,
    /// Average of the three positions
    pub centroid: Vec3,
}

impl Triangle {
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        let centroid = (a.position + b.position + c.position) / 3.0;
        Self { a, b, c, centroid }
    }

    /// Möller-Trumbore test; returns the ray parameter of the hit.
    #[inline]
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        intersect_triangle(ray, self.a.position, self.b.position, self.c.position).map(|h| h.t)
    }

    /// Tight bounding box (flat triangles give flat boxes).
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_positions([self.a.position, self.b.position, self.c.position])
    }

    /// Geometric normal following the A -> B -> C winding.
    pub fn face_normal(&self) -> Vec3 {
        (self.b.position - self.a.position)
            .cross(self.c.position - self.a.position)
            .normalize_or_zero()
    }

    /// Barycentric weights of `p` for vertices A, B and C.
    ///
    /// Zero-area triangles fall back to vertex A.
    pub fn barycentric(&self, p: Vec3) -> Vec3 {
        barycentric_weights(p, self.a.position, self.b.position, self.c.position)
            .unwrap_or(Vec3::X)
    }

    /// Interpolated texture coordinate at `p`.
    pub fn texture_coordinates(&self, p: Vec3) -> Vec2 {
        let w = self.barycentric(p);
        self.a.tex_coord * w.x + self.b.tex_coord * w.y + self.c.tex_coord * w.z
    }

    /// Interpolated shading normal at `p`.
    ///
    /// Falls back to the face normal when the vertex normals cancel out.
    pub fn normal_at(&self, p: Vec3) -> Vec3 {
        let w = self.barycentric(p);
        let n = self.a.normal * w.x + self.b.normal * w.y + self.c.normal * w.z;
        let n = n.normalize_or_zero();
        if n == Vec3::ZERO {
            self.face_normal()
        } else {
            n
        }
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        self.intersect(ray)
            .filter(|t| ray_t.surrounds(*t))
            .map(|t| Hit { t, index: 0 })
    }

    fn bounding_box(&self) -> Aabb {
        Triangle::bounding_box(self)
    }
}

/// A triangle mesh with one material.
#[derive(Debug, Clone)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    triangles: Vec<Triangle>,
    bounds: Aabb,
    bvh: MeshBvh,
    material: Material,
}

impl Mesh {
    /// Build a mesh from vertices and triangle indices.
    ///
    /// Every consecutive index triple forms a triangle. Triples that
    /// reference missing vertices, and a trailing incomplete triple, are
    /// dropped with a warning.
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        material: Material,
    ) -> Self {
        let name = name.into();
        let vertex_count = vertices.len();

        let mut triangles = Vec::with_capacity(indices.len() / 3);
        let mut dropped = 0usize;
        for face in indices.chunks(3) {
            if face.len() < 3 {
                dropped += 1;
                continue;
            }

            let i0 = face[0] as usize;
            let i1 = face[1] as usize;
            let i2 = face[2] as usize;
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                dropped += 1;
                continue;
            }

            triangles.push(Triangle::new(vertices[i0], vertices[i1], vertices[i2]));
        }

        if dropped > 0 {
            log::warn!(
                "Mesh '{}': dropped {} triangle(s) with out-of-range indices",
                name,
                dropped
            );
        }

        let bounds = Aabb::from_positions(vertices.iter().map(|v| v.position));
        let bvh = MeshBvh::build(&triangles);

        log::debug!(
            "Mesh '{}': {} vertices, {} triangles, {} BVH nodes",
            name,
            vertex_count,
            triangles.len(),
            bvh.node_count()
        );

        Self {
            name,
            vertices,
            indices,
            triangles,
            bounds,
            bvh,
            material,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle(&self, index: usize) -> Option<&Triangle> {
        self.triangles.get(index)
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn bvh(&self) -> &MeshBvh {
        &self.bvh
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Material parameters stay editable at runtime; geometry does not.
    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    /// Closest hit by testing every triangle.
    ///
    /// Ties in `t` keep the lowest triangle index.
    pub fn hit_linear(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        let mut closest: Option<Hit> = None;
        let mut max_t = ray_t.max;

        for (index, triangle) in self.triangles.iter().enumerate() {
            if let Some(t) = triangle.intersect(ray) {
                if t > ray_t.min && t < max_t {
                    max_t = t;
                    closest = Some(Hit { t, index });
                }
            }
        }

        closest
    }

    /// Closest hit through the mesh BVH.
    pub fn hit_bvh(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        self.bvh.hit(&self.triangles, ray, ray_t)
    }

    /// Closest hit with the given strategy, after the (padded) mesh box test.
    pub fn hit_with(&self, ray: &Ray, ray_t: Interval, acceleration: Acceleration) -> Option<Hit> {
        if !self.bounds.padded(Aabb::CULL_PADDING).intersects(ray) {
            return None;
        }

        match acceleration {
            Acceleration::BroadPhase => self.hit_linear(ray, ray_t),
            Acceleration::Bvh => self.hit_bvh(ray, ray_t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, y: f32, z: f32, u: f32, v: f32) -> Vertex {
        Vertex::new(Vec3::new(x, y, z), Vec3::Z, Vec2::new(u, v))
    }

    fn unit_triangle() -> Triangle {
        Triangle::new(
            vertex(0.0, 0.0, 0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0, 1.0, 0.0),
            vertex(0.0, 1.0, 0.0, 0.0, 1.0),
        )
    }

    #[test]
    fn test_triangle_centroid() {
        let tri = unit_triangle();
        assert!((tri.centroid - Vec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_texture_coordinates_at_vertices() {
        let tri = Triangle::new(
            vertex(-1.0, 0.0, 2.0, 0.1, 0.9),
            vertex(3.0, 1.0, 0.0, 0.7, 0.2),
            vertex(0.0, 4.0, -1.0, 0.4, 0.5),
        );

        for v in [tri.a, tri.b, tri.c] {
            let uv = tri.texture_coordinates(v.position);
            assert!((uv - v.tex_coord).length() < 1e-5);
        }
    }

    #[test]
    fn test_texture_coordinates_interior() {
        let tri = unit_triangle();
        let uv = tri.texture_coordinates(Vec3::new(0.2, 0.3, 0.0));
        assert!((uv - Vec2::new(0.2, 0.3)).length() < 1e-5);
    }

    #[test]
    fn test_degenerate_triangle_falls_back_to_a() {
        let tri = Triangle::new(
            vertex(0.0, 0.0, 0.0, 0.25, 0.75),
            vertex(1.0, 0.0, 0.0, 1.0, 1.0),
            vertex(2.0, 0.0, 0.0, 0.0, 0.0),
        );
        assert_eq!(tri.barycentric(Vec3::new(0.5, 0.0, 0.0)), Vec3::X);
        assert_eq!(tri.texture_coordinates(Vec3::ZERO), Vec2::new(0.25, 0.75));
    }

    #[test]
    fn test_triangle_hittable_range() {
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::new(0.2, 0.2, 1.0), Vec3::NEG_Z);

        let hit = tri.hit(&ray, Interval::new(0.0, 10.0)).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-5);
        assert!(tri.hit(&ray, Interval::new(0.0, 0.5)).is_none());
    }

    #[test]
    fn test_normal_at_uses_vertex_normals() {
        let mut tri = unit_triangle();
        tri.a.normal = Vec3::Y;
        tri.b.normal = Vec3::Y;
        tri.c.normal = Vec3::Y;
        assert!((tri.normal_at(Vec3::new(0.2, 0.2, 0.0)) - Vec3::Y).length() < 1e-6);

        tri.a.normal = Vec3::ZERO;
        tri.b.normal = Vec3::ZERO;
        tri.c.normal = Vec3::ZERO;
        assert!((tri.normal_at(Vec3::new(0.2, 0.2, 0.0)) - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_mesh_drops_bad_indices() {
        let _ = env_logger::builder().is_test(true).try_init();

        let vertices = vec![
            vertex(0.0, 0.0, 0.0, 0.0, 0.0),
            vertex(1.0, 0.0, 0.0, 1.0, 0.0),
            vertex(0.0, 1.0, 0.0, 0.0, 1.0),
        ];
        let mesh = Mesh::new("tri", vertices, vec![0, 1, 2, 0, 1, 7, 2, 1], Material::default());

        assert_eq!(mesh.triangles().len(), 1);
        assert_eq!(mesh.indices().len(), 8);
        assert_eq!(mesh.bounds().min(), Vec3::ZERO);
        assert_eq!(mesh.bounds().max(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_empty_mesh_never_hits() {
        let mesh = Mesh::new("empty", Vec::new(), Vec::new(), Material::default());
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        assert!(mesh.bounds().is_empty());
        assert!(mesh.hit_with(&ray, Interval::UNIVERSE, Acceleration::BroadPhase).is_none());
        assert!(mesh.hit_with(&ray, Interval::UNIVERSE, Acceleration::Bvh).is_none());
    }

    #[test]
    fn test_mesh_closest_hit() {
        // Two parallel triangles at z = 0 and z = -1
        let vertices = vec![
            vertex(-1.0, -1.0, 0.0, 0.0, 0.0),
            vertex(1.0, -1.0, 0.0, 0.0, 0.0),
            vertex(0.0, 1.0, 0.0, 0.0, 0.0),
            vertex(-1.0, -1.0, -1.0, 0.0, 0.0),
            vertex(1.0, -1.0, -1.0, 0.0, 0.0),
            vertex(0.0, 1.0, -1.0, 0.0, 0.0),
        ];
        let mesh = Mesh::new("pair", vertices, vec![3, 4, 5, 0, 1, 2], Material::default());
        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z);

        for acceleration in [Acceleration::BroadPhase, Acceleration::Bvh] {
            let hit = mesh.hit_with(&ray, Interval::UNIVERSE, acceleration).unwrap();
            assert_eq!(hit.index, 1);
            assert!((hit.t - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_material_mut_edits_in_place() {
        let mut mesh = Mesh::new("m", Vec::new(), Vec::new(), Material::default());
        mesh.material_mut().roughness = 0.25;
        assert_eq!(mesh.material().roughness, 0.25);
    }
}
