//! Ray-scene intersection.
//!
//! Models are culled by their bounding box, then each mesh by its own box,
//! before any triangle is tested. Inside a mesh the configured
//! [`Acceleration`] picks a linear scan or the mesh BVH.

use lumen_core::{Acceleration, Hittable, PrimitiveId, Scene, Sphere};
use lumen_math::{Aabb, Interval, Ray, Vec2, Vec3};

/// Everything shading needs to know about the closest hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitPayload {
    pub hit_distance: f32,
    pub world_position: Vec3,
    /// Unit normal facing against the incoming ray
    pub world_normal: Vec3,
    pub tex_coord: Vec2,
    /// True if the ray struck the side the surface normal points to
    pub front_face: bool,
    pub primitive: PrimitiveId,
}

/// Trace a ray and resolve the closest hit, or `None` on a miss.
pub fn trace_ray(scene: &Scene, ray: &Ray, acceleration: Acceleration) -> Option<HitPayload> {
    let (t, primitive) = closest_primitive(scene, ray, acceleration)?;
    closest_hit(scene, ray, t, primitive)
}

/// Closest primitive along the ray.
///
/// Ties keep the primitive found first: models in order, then spheres.
pub fn closest_primitive(
    scene: &Scene,
    ray: &Ray,
    acceleration: Acceleration,
) -> Option<(f32, PrimitiveId)> {
    let mut closest: Option<(f32, PrimitiveId)> = None;
    let mut max_t = f32::INFINITY;

    for (model_index, model) in scene.models().iter().enumerate() {
        if !model.bounds().padded(Aabb::CULL_PADDING).intersects(ray) {
            continue;
        }

        for (mesh_index, mesh) in model.meshes().iter().enumerate() {
            // Mesh box is tested inside hit_with
            if let Some(hit) = mesh.hit_with(ray, Interval::new(0.0, max_t), acceleration) {
                max_t = hit.t;
                closest = Some((
                    hit.t,
                    PrimitiveId::Triangle {
                        model: model_index,
                        mesh: mesh_index,
                        triangle: hit.index,
                    },
                ));
            }
        }
    }

    for (index, sphere) in scene.spheres().iter().enumerate() {
        if let Some(hit) = sphere.hit(ray, Interval::new(0.0, max_t)) {
            max_t = hit.t;
            closest = Some((hit.t, PrimitiveId::Sphere(index)));
        }
    }

    closest
}

/// Build the payload for a known hit.
///
/// Returns `None` if `primitive` does not exist in the scene.
pub fn closest_hit(
    scene: &Scene,
    ray: &Ray,
    hit_distance: f32,
    primitive: PrimitiveId,
) -> Option<HitPayload> {
    let world_position = ray.at(hit_distance);

    let (outward_normal, tex_coord) = match primitive {
        PrimitiveId::Triangle {
            model,
            mesh,
            triangle,
        } => {
            let triangle = scene
                .models()
                .get(model)?
                .meshes()
                .get(mesh)?
                .triangle(triangle)?;
            (
                triangle.normal_at(world_position),
                triangle.texture_coordinates(world_position),
            )
        }
        PrimitiveId::Sphere(index) => {
            let sphere = scene.spheres().get(index)?;
            let normal = sphere.normal_at(world_position);
            (normal, Sphere::uv(normal))
        }
    };

    // Normals always point against the incident ray
    let front_face = ray.direction.dot(outward_normal) < 0.0;
    let world_normal = if front_face {
        outward_normal
    } else {
        -outward_normal
    };

    Some(HitPayload {
        hit_distance,
        world_position,
        world_normal,
        tex_coord,
        front_face,
        primitive,
    })
}
