//! Procedural meshes.
//!
//! Mesh import lives outside this crate; these generators cover demos and
//! tests. All shapes wind counter-clockwise when seen from outside and
//! carry per-vertex normals and texture coordinates.

use std::collections::HashMap;

use crate::material::Material;
use crate::mesh::{Mesh, Vertex};
use crate::sphere::Sphere;
use lumen_math::{Vec2, Vec3};

/// Icosahedron subdivided `subdivisions` times and projected onto a sphere.
///
/// Each subdivision splits every triangle into four, so the mesh has
/// `20 * 4^subdivisions` triangles.
pub fn icosphere(
    name: impl Into<String>,
    radius: f32,
    subdivisions: u32,
    material: Material,
) -> Mesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let mut directions: Vec<Vec3> = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .iter()
    .map(|v| v.normalize())
    .collect();

    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut midpoint = |a: u32, b: u32, directions: &mut Vec<Vec3>| -> u32 {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let mid = (directions[a as usize] + directions[b as usize]).normalize();
                directions.push(mid);
                (directions.len() - 1) as u32
            })
        };

        let mut next = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = midpoint(a, b, &mut directions);
            let bc = midpoint(b, c, &mut directions);
            let ca = midpoint(c, a, &mut directions);
            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }
        faces = next;
    }

    let vertices = directions
        .iter()
        .map(|&n| Vertex::new(n * radius, n, Sphere::uv(n)))
        .collect();
    let indices = faces.into_iter().flatten().collect();

    Mesh::new(name, vertices, indices, material)
}

/// Parallelogram spanned by edges `u` and `v` from `corner`.
///
/// The front face (normal `u x v`) sees the corners in counter-clockwise
/// order. Texture coordinates run 0..1 along each edge.
pub fn quad(name: impl Into<String>, corner: Vec3, u: Vec3, v: Vec3, material: Material) -> Mesh {
    let mut vertices = Vec::with_capacity(4);
    let mut indices = Vec::with_capacity(6);
    push_quad(&mut vertices, &mut indices, corner, u, v);
    Mesh::new(name, vertices, indices, material)
}

/// Axis-aligned cube with edge length `size`, 12 triangles with flat normals.
pub fn cube(name: impl Into<String>, center: Vec3, size: f32, material: Material) -> Mesh {
    let h = size * 0.5;

    // (normal, u, v) with u x v == normal
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (n, u, v) in faces {
        let corner = center + (n - u - v) * h;
        push_quad(&mut vertices, &mut indices, corner, u * size, v * size);
    }

    Mesh::new(name, vertices, indices, material)
}

fn push_quad(vertices: &mut Vec<Vertex>, indices: &mut Vec<u32>, corner: Vec3, u: Vec3, v: Vec3) {
    let normal = u.cross(v).normalize_or_zero();
    let base = vertices.len() as u32;

    vertices.push(Vertex::new(corner, normal, Vec2::new(0.0, 0.0)));
    vertices.push(Vertex::new(corner + u, normal, Vec2::new(1.0, 0.0)));
    vertices.push(Vertex::new(corner + u + v, normal, Vec2::new(1.0, 1.0)));
    vertices.push(Vertex::new(corner + v, normal, Vec2::new(0.0, 1.0)));

    indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::Acceleration;
    use lumen_math::{Interval, Ray};

    #[test]
    fn test_icosphere_counts() {
        let base = icosphere("ico", 1.0, 0, Material::default());
        assert_eq!(base.vertices().len(), 12);
        assert_eq!(base.triangles().len(), 20);

        let sub = icosphere("ico", 1.0, 2, Material::default());
        assert_eq!(sub.triangles().len(), 320);
        // Shared midpoints: V = 10 * 4^n + 2
        assert_eq!(sub.vertices().len(), 162);
    }

    #[test]
    fn test_icosphere_on_sphere() {
        let mesh = icosphere("ico", 2.5, 1, Material::default());
        for v in mesh.vertices() {
            assert!((v.position.length() - 2.5).abs() < 1e-5);
            assert!((v.normal.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_icosphere_winds_outward() {
        let mesh = icosphere("ico", 1.0, 1, Material::default());
        for tri in mesh.triangles() {
            assert!(tri.face_normal().dot(tri.centroid) > 0.0);
        }
    }

    #[test]
    fn test_icosphere_hit_near_radius() {
        let mesh = icosphere("ico", 1.0, 3, Material::default());
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);
        let hit = mesh
            .hit_with(&ray, Interval::new(0.0, f32::INFINITY), Acceleration::Bvh)
            .unwrap();

        // Flat facets sit just inside the sphere
        assert!(hit.t > 2.0 && hit.t < 2.05);
    }

    #[test]
    fn test_quad() {
        let mesh = quad(
            "floor",
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::X * 2.0,
            Vec3::NEG_Z * 2.0,
            Material::default(),
        );
        assert_eq!(mesh.triangles().len(), 2);
        assert!((mesh.triangles()[0].face_normal() - Vec3::Y).length() < 1e-6);

        let ray = Ray::new(Vec3::new(0.3, 2.0, -0.1), Vec3::NEG_Y);
        let hit = mesh
            .hit_with(&ray, Interval::new(0.0, f32::INFINITY), Acceleration::BroadPhase)
            .unwrap();
        assert!((hit.t - 2.0).abs() < 1e-5);

        let tri = mesh.triangle(hit.index).unwrap();
        let uv = tri.texture_coordinates(ray.at(hit.t));
        assert!((uv - Vec2::new(0.65, 0.55)).length() < 1e-5);
    }

    #[test]
    fn test_cube_faces_point_outward() {
        let mesh = cube("box", Vec3::new(1.0, 2.0, 3.0), 2.0, Material::default());
        assert_eq!(mesh.triangles().len(), 12);
        assert_eq!(mesh.bounds().min(), Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(mesh.bounds().max(), Vec3::new(2.0, 3.0, 4.0));

        let center = Vec3::new(1.0, 2.0, 3.0);
        for tri in mesh.triangles() {
            let n = tri.face_normal();
            assert!(n.dot(tri.centroid - center) > 0.0);
            assert!((tri.a.normal - n).length() < 1e-6);
        }
    }
}
