//! Spatial query service.
//!
//! The default implementation tests rays and spheres against every
//! `Collider` in the world. Colliders sit on the entity they belong to, or on
//! a child entity carrying `ColliderOf` that points back at its root.

use glam::DVec3;
use hecs::{Entity, World};

use ironfront_core::components::{Collider, ColliderShape};
use ironfront_core::enums::Layer;
use ironfront_core::types::Position;

/// Attaches a collider entity to the root it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct ColliderOf {
    pub root: Entity,
    /// Offset from the root's position.
    pub offset: DVec3,
}

/// Child collider entities owned by a root.
#[derive(Debug, Clone, Default)]
pub struct Attachments(pub Vec<Entity>);

/// One collider touched by a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub collider: Entity,
    pub root: Entity,
    /// Distance along the ray; 0 for overlaps.
    pub distance: f64,
    pub is_trigger: bool,
    pub layer: Layer,
}

pub trait SpatialQuery {
    /// Every collider the ray enters within `max_distance`, in no particular
    /// order. Colliders containing the origin are not reported.
    fn raycast_all(&self, world: &World, origin: DVec3, direction: DVec3, max_distance: f64) -> Vec<Hit>;

    /// Colliders on any of `layers` touching the sphere.
    fn overlap_sphere(&self, world: &World, center: DVec3, radius: f64, layers: &[Layer]) -> Vec<Hit>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WorldColliders;

impl WorldColliders {
    fn colliders(world: &World) -> Vec<(Entity, DVec3, Collider)> {
        world
            .query::<(&Position, &Collider)>()
            .iter()
            .map(|(e, (pos, col))| (e, pos.0 + DVec3::Z * col.center_offset, *col))
            .collect()
    }

    fn root_of(world: &World, collider: Entity) -> Entity {
        world
            .get::<&ColliderOf>(collider)
            .map(|c| c.root)
            .unwrap_or(collider)
    }
}

impl SpatialQuery for WorldColliders {
    fn raycast_all(&self, world: &World, origin: DVec3, direction: DVec3, max_distance: f64) -> Vec<Hit> {
        let Some(dir) = direction.try_normalize() else {
            return Vec::new();
        };
        Self::colliders(world)
            .into_iter()
            .filter_map(|(entity, center, col)| {
                let distance = match col.shape {
                    ColliderShape::Sphere { radius } => ray_sphere(origin, dir, center, radius),
                    ColliderShape::Box { half_extents } => ray_aabb(origin, dir, center, half_extents),
                }?;
                (distance <= max_distance).then(|| Hit {
                    collider: entity,
                    root: Self::root_of(world, entity),
                    distance,
                    is_trigger: col.is_trigger,
                    layer: col.layer,
                })
            })
            .collect()
    }

    fn overlap_sphere(&self, world: &World, center: DVec3, radius: f64, layers: &[Layer]) -> Vec<Hit> {
        Self::colliders(world)
            .into_iter()
            .filter(|(_, _, col)| layers.contains(&col.layer))
            .filter(|(_, c, col)| match col.shape {
                ColliderShape::Sphere { radius: r } => c.distance(center) <= r + radius,
                ColliderShape::Box { half_extents } => {
                    let closest = center.clamp(*c - half_extents, *c + half_extents);
                    closest.distance(center) <= radius
                }
            })
            .map(|(entity, _, col)| Hit {
                collider: entity,
                root: Self::root_of(world, entity),
                distance: 0.0,
                is_trigger: col.is_trigger,
                layer: col.layer,
            })
            .collect()
    }
}

/// Entry distance of a unit ray into a sphere.
fn ray_sphere(origin: DVec3, dir: DVec3, center: DVec3, radius: f64) -> Option<f64> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    if c <= 0.0 {
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Entry distance of a unit ray into an axis-aligned box (slab test).
fn ray_aabb(origin: DVec3, dir: DVec3, center: DVec3, half: DVec3) -> Option<f64> {
    let min = center - half;
    let max = center + half;
    let mut t_near = f64::NEG_INFINITY;
    let mut t_far = f64::INFINITY;

    for axis in 0..3 {
        let (o, d, lo, hi) = (origin[axis], dir[axis], min[axis], max[axis]);
        if d.abs() < 1e-12 {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let (t0, t1) = ((lo - o) / d, (hi - o) / d);
        t_near = t_near.max(t0.min(t1));
        t_far = t_far.min(t0.max(t1));
        if t_near > t_far {
            return None;
        }
    }

    (t_near >= 0.0 && t_far >= 0.0).then_some(t_near)
}
