//! Per-mesh Bounding Volume Hierarchy.
//!
//! Nodes live in a flat arena and refer to each other by index; leaves
//! reference a contiguous run of the reordered triangle index list. The
//! tree is built once with a median split and traversed with a small
//! fixed stack.

use crate::hittable::Hit;
use crate::mesh::Triangle;
use lumen_math::{Aabb, Interval, Ray};

/// Maximum triangles per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 5;

/// Traversal stack depth. Median splits keep the tree balanced, so this
/// covers far more triangles than fit in memory.
const STACK_SIZE: usize = 64;

#[derive(Debug, Clone, Copy)]
enum NodeKind {
    /// Internal node with two children (arena indices).
    Branch { left: u32, right: u32 },
    /// Leaf covering `indices[start..start + count]`.
    Leaf { start: u32, count: u32 },
}

#[derive(Debug, Clone, Copy)]
struct BvhNode {
    bounds: Aabb,
    kind: NodeKind,
}

/// BVH over the triangles of a single mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshBvh {
    nodes: Vec<BvhNode>,
    /// Triangle indices, grouped so that every leaf is a contiguous run
    indices: Vec<u32>,
}

impl MeshBvh {
    /// Build the hierarchy for `triangles`. An empty slice gives an empty BVH.
    pub fn build(triangles: &[Triangle]) -> Self {
        let mut bvh = Self {
            nodes: Vec::new(),
            indices: (0..triangles.len() as u32).collect(),
        };

        if !triangles.is_empty() {
            let mut indices = std::mem::take(&mut bvh.indices);
            bvh.nodes.reserve(2 * triangles.len() / LEAF_MAX_SIZE + 1);
            bvh.build_node(triangles, &mut indices, 0);
            bvh.indices = indices;
        }

        bvh
    }

    /// Recursive construction over `indices`, which starts at `offset` in
    /// the final index list. Returns the arena index of the new node.
    ///
    /// Simple median-split approach: sort by centroid on the axis with the
    /// widest centroid spread, split in half, recurse.
    fn build_node(&mut self, triangles: &[Triangle], indices: &mut [u32], offset: usize) -> u32 {
        // Node boxes are padded so that rays through shared vertices still
        // reach every triangle the exact triangle test accepts
        let bounds = indices
            .iter()
            .fold(Aabb::EMPTY, |acc, &i| {
                Aabb::surrounding(&acc, &triangles[i as usize].bounding_box())
            })
            .padded(Aabb::CULL_PADDING);

        let node_index = self.nodes.len() as u32;

        if indices.len() <= LEAF_MAX_SIZE {
            self.nodes.push(BvhNode {
                bounds,
                kind: NodeKind::Leaf {
                    start: offset as u32,
                    count: indices.len() as u32,
                },
            });
            return node_index;
        }

        let centroid_bounds = Aabb::from_positions(
            indices.iter().map(|&i| triangles[i as usize].centroid),
        );
        let axis = centroid_bounds.longest_axis();

        indices.sort_unstable_by(|&a, &b| {
            let a_val = triangles[a as usize].centroid[axis];
            let b_val = triangles[b as usize].centroid[axis];
            a_val.total_cmp(&b_val)
        });

        // Reserve the slot, children are filled in after recursion
        self.nodes.push(BvhNode {
            bounds,
            kind: NodeKind::Leaf { start: 0, count: 0 },
        });

        let mid = indices.len() / 2;
        let (left_indices, right_indices) = indices.split_at_mut(mid);
        let left = self.build_node(triangles, left_indices, offset);
        let right = self.build_node(triangles, right_indices, offset + mid);

        self.nodes[node_index as usize].kind = NodeKind::Branch { left, right };
        node_index
    }

    /// Number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Padded bounds of the root node (`EMPTY` for an empty BVH).
    pub fn bounds(&self) -> Aabb {
        self.nodes.first().map_or(Aabb::EMPTY, |n| n.bounds)
    }

    /// Depth of the tree (0 when empty, 1 for a single leaf).
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        let mut max_depth = 0;
        let mut stack = vec![(0u32, 1usize)];
        while let Some((index, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let NodeKind::Branch { left, right } = self.nodes[index as usize].kind {
                stack.push((left, depth + 1));
                stack.push((right, depth + 1));
            }
        }
        max_depth
    }

    /// Closest hit among `triangles` (the slice the BVH was built from)
    /// with `ray_t.min < t < ray_t.max`.
    ///
    /// Equal distances resolve to the lowest triangle index, matching a
    /// front-to-back linear scan.
    pub fn hit(&self, triangles: &[Triangle], ray: &Ray, ray_t: Interval) -> Option<Hit> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut closest: Option<Hit> = None;
        let mut stack = [0u32; STACK_SIZE];
        let mut stack_len = 1;

        while stack_len > 0 {
            stack_len -= 1;
            let node = &self.nodes[stack[stack_len] as usize];

            // Boxes are tested slightly past the best hit so that a triangle
            // at exactly the same distance (shared edges) is still visited
            let limit = match closest {
                Some(hit) => hit.t + hit.t.abs() * 1e-5 + 1e-6,
                None => ray_t.max,
            };
            if !node.bounds.hit(ray, Interval::new(ray_t.min, limit)) {
                continue;
            }

            match node.kind {
                NodeKind::Leaf { start, count } => {
                    let start = start as usize;
                    for &tri_index in &self.indices[start..start + count as usize] {
                        let index = tri_index as usize;
                        let Some(t) = triangles[index].intersect(ray) else {
                            continue;
                        };
                        if !ray_t.surrounds(t) {
                            continue;
                        }

                        let better = match closest {
                            Some(best) => t < best.t || (t == best.t && index < best.index),
                            None => true,
                        };
                        if better {
                            closest = Some(Hit { t, index });
                        }
                    }
                }
                NodeKind::Branch { left, right } => {
                    if stack_len + 2 > STACK_SIZE {
                        log::warn!("BVH traversal stack exhausted, skipping subtree");
                        continue;
                    }
                    stack[stack_len] = right;
                    stack[stack_len + 1] = left;
                    stack_len += 2;
                }
            }
        }

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Mesh, Vertex};
    use crate::shapes;
    use crate::Material;
    use lumen_math::{Vec2, Vec3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_soup(rng: &mut StdRng, count: usize) -> Vec<Triangle> {
        let point = |rng: &mut StdRng| {
            Vertex::new(
                Vec3::new(
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-2.0..2.0),
                ),
                Vec3::Y,
                Vec2::ZERO,
            )
        };

        (0..count)
            .map(|_| {
                let a = point(rng);
                let offset = |rng: &mut StdRng| {
                    Vec3::new(
                        rng.gen_range(-0.4..0.4),
                        rng.gen_range(-0.4..0.4),
                        rng.gen_range(-0.4..0.4),
                    )
                };
                let mut b = a;
                b.position += offset(rng);
                let mut c = a;
                c.position += offset(rng);
                Triangle::new(a, b, c)
            })
            .collect()
    }

    fn linear_hit(triangles: &[Triangle], ray: &Ray, ray_t: Interval) -> Option<Hit> {
        let mut closest: Option<Hit> = None;
        for (index, tri) in triangles.iter().enumerate() {
            if let Some(t) = tri.intersect(ray) {
                if ray_t.surrounds(t) && closest.map_or(true, |c| t < c.t) {
                    closest = Some(Hit { t, index });
                }
            }
        }
        closest
    }

    #[test]
    fn test_empty_bvh() {
        let bvh = MeshBvh::build(&[]);
        assert!(bvh.is_empty());
        assert_eq!(bvh.depth(), 0);
        assert!(bvh.bounds().is_empty());

        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(bvh.hit(&[], &ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_small_mesh_is_single_leaf() {
        let mut rng = StdRng::seed_from_u64(1);
        let triangles = random_soup(&mut rng, LEAF_MAX_SIZE);
        let bvh = MeshBvh::build(&triangles);

        assert_eq!(bvh.node_count(), 1);
        assert_eq!(bvh.depth(), 1);
    }

    #[test]
    fn test_tree_is_balanced() {
        let mut rng = StdRng::seed_from_u64(2);
        let triangles = random_soup(&mut rng, 1000);
        let bvh = MeshBvh::build(&triangles);

        // 1000 -> 500 -> 250 -> 125 -> 63 -> 32 -> 16 -> 8 -> 4
        assert_eq!(bvh.depth(), 9);

        // Every triangle appears in exactly one leaf
        let mut seen = bvh.indices.clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..1000).collect::<Vec<u32>>());
    }

    #[test]
    fn test_root_bounds_cover_all_triangles() {
        let mut rng = StdRng::seed_from_u64(3);
        let triangles = random_soup(&mut rng, 64);
        let bvh = MeshBvh::build(&triangles);
        let bounds = bvh.bounds();

        for tri in &triangles {
            for v in [tri.a, tri.b, tri.c] {
                assert!(bounds.x.contains(v.position.x));
                assert!(bounds.y.contains(v.position.y));
                assert!(bounds.z.contains(v.position.z));
            }
        }
    }

    #[test]
    fn test_bvh_matches_linear_scan_on_random_soup() {
        let mut rng = StdRng::seed_from_u64(42);
        let triangles = random_soup(&mut rng, 300);
        let bvh = MeshBvh::build(&triangles);

        let mut hits = 0;
        for _ in 0..2000 {
            let origin = Vec3::new(
                rng.gen_range(-4.0..4.0),
                rng.gen_range(-4.0..4.0),
                rng.gen_range(-4.0..4.0),
            );
            let target = Vec3::new(
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
            );
            let ray = Ray::new(origin, target - origin);
            let ray_t = Interval::new(0.0, f32::INFINITY);

            let expected = linear_hit(&triangles, &ray, ray_t);
            let actual = bvh.hit(&triangles, &ray, ray_t);
            assert_eq!(expected, actual);
            hits += expected.is_some() as usize;
        }

        // Make sure the comparison was not vacuous
        assert!(hits > 100);
    }

    #[test]
    fn test_bvh_matches_linear_scan_on_closed_mesh() {
        let sphere = shapes::icosphere("ball", 1.0, 3, Material::default());
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let origin = Vec3::new(
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..3.0),
                3.0,
            );
            let ray = Ray::new(origin, Vec3::new(rng.gen_range(-0.2..0.2), 0.0, -1.0));

            let expected = sphere.hit_linear(&ray, Interval::new(0.0, f32::INFINITY));
            let actual = sphere.hit_bvh(&ray, Interval::new(0.0, f32::INFINITY));
            assert_eq!(expected, actual);
        }
    }

    #[test]
    fn test_ties_resolve_to_lowest_index() {
        // Same triangle stored twice, far apart in the index list
        let tri = Triangle::new(
            Vertex::new(Vec3::new(-1.0, -1.0, 0.0), Vec3::Z, Vec2::ZERO),
            Vertex::new(Vec3::new(1.0, -1.0, 0.0), Vec3::Z, Vec2::ZERO),
            Vertex::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, Vec2::ZERO),
        );
        let mut rng = StdRng::seed_from_u64(9);
        let mut triangles = vec![tri];
        triangles.extend(random_soup(&mut rng, 20).into_iter().map(|mut t| {
            // Push the filler out of the ray's way
            t.a.position.x += 10.0;
            t.b.position.x += 10.0;
            t.c.position.x += 10.0;
            t.centroid.x += 10.0;
            t
        }));
        triangles.push(tri);

        let bvh = MeshBvh::build(&triangles);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z);
        let hit = bvh.hit(&triangles, &ray, Interval::new(0.0, f32::INFINITY)).unwrap();

        assert_eq!(hit.index, 0);
        assert_eq!(Some(hit), linear_hit(&triangles, &ray, Interval::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_mesh_builds_bvh() {
        let mesh: Mesh = shapes::cube("box", Vec3::ZERO, 2.0, Material::default());
        assert!(!mesh.bvh().is_empty());
        assert_eq!(mesh.bvh().bounds(), mesh.bounds().padded(Aabb::CULL_PADDING));

        // Mesh bounds themselves stay tight
        assert_eq!(mesh.bounds().max(), Vec3::ONE);
    }

    #[test]
    fn test_bvh_matches_linear_scan_through_vertices() {
        let sphere = shapes::icosphere("ball", 1.0, 4, Material::default());
        let ray_t = Interval::new(0.0, f32::INFINITY);
        let origins = [
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::new(2.5, 1.5, -1.0),
            Vec3::new(-0.7, -3.1, 0.4),
        ];

        let mut hits = 0;
        for origin in origins {
            for vertex in sphere.vertices() {
                let ray = Ray::new(origin, vertex.position - origin);
                let expected = sphere.hit_linear(&ray, ray_t);
                let actual = sphere.hit_bvh(&ray, ray_t);
                assert_eq!(expected, actual, "origin {origin:?} vertex {:?}", vertex.position);
                hits += actual.is_some() as usize;
            }
        }
        assert!(hits > sphere.vertices().len());
    }
}
