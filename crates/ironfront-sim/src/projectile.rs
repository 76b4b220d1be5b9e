//! Projectile pool.
//!
//! Fixed number of slots, handed out on fire and returned on impact or
//! expiry. Handles carry a generation so a shot that has been returned can
//! no longer be reached through a handle taken before the release.

use glam::DVec3;
use hecs::Entity;

use ironfront_core::enums::Team;

/// Handle to a borrowed projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectileHandle {
    index: u32,
    generation: u32,
}

/// Everything a shot needs at launch.
#[derive(Debug, Clone)]
pub struct Shot {
    pub position: DVec3,
    pub velocity: DVec3,
    pub team: Team,
    pub shooter: Entity,
    pub shooter_name: String,
    pub damage: f64,
    pub lifetime: f64,
    pub use_gravity: bool,
    /// Colliders the shell passes through (the shooter's own).
    pub ignore: Vec<Entity>,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub position: DVec3,
    pub velocity: DVec3,
    pub team: Team,
    pub shooter: Option<Entity>,
    pub shooter_name: String,
    pub damage: f64,
    pub remaining_lifetime: f64,
    pub use_gravity: bool,
    pub ignore: Vec<Entity>,
}

impl Projectile {
    fn inert() -> Self {
        Self {
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            team: Team::Neutral,
            shooter: None,
            shooter_name: String::new(),
            damage: 0.0,
            remaining_lifetime: 0.0,
            use_gravity: false,
            ignore: Vec::new(),
        }
    }

    fn launch(&mut self, shot: Shot) {
        self.position = shot.position;
        self.velocity = shot.velocity;
        self.team = shot.team;
        self.shooter = Some(shot.shooter);
        self.shooter_name = shot.shooter_name;
        self.damage = shot.damage;
        self.remaining_lifetime = shot.lifetime;
        self.use_gravity = shot.use_gravity;
        self.ignore.clear();
        self.ignore.extend(shot.ignore);
    }

    fn reset(&mut self) {
        self.ignore.clear();
        self.shooter = None;
        self.velocity = DVec3::ZERO;
        self.damage = 0.0;
        self.remaining_lifetime = 0.0;
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    active: bool,
    projectile: Projectile,
}

#[derive(Debug)]
pub struct ProjectilePool {
    slots: Vec<Slot>,
    free: Vec<u32>,
    capacity: usize,
}

impl ProjectilePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of projectiles currently borrowed.
    pub fn outstanding(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.outstanding() >= self.capacity
    }

    /// Borrow a slot and launch `shot` from it. None when every slot is out.
    pub fn acquire(&mut self, shot: Shot) -> Option<ProjectileHandle> {
        let index = match self.free.pop() {
            Some(index) => index,
            None if self.slots.len() < self.capacity => {
                self.slots.push(Slot {
                    generation: 0,
                    active: false,
                    projectile: Projectile::inert(),
                });
                (self.slots.len() - 1) as u32
            }
            None => return None,
        };
        let slot = &mut self.slots[index as usize];
        slot.active = true;
        slot.projectile.launch(shot);
        Some(ProjectileHandle {
            index,
            generation: slot.generation,
        })
    }

    /// Return a projectile to the pool. Stale or unknown handles are ignored.
    pub fn release(&mut self, handle: ProjectileHandle) -> bool {
        let Some(slot) = self.slot_mut(handle) else {
            return false;
        };
        slot.active = false;
        slot.generation = slot.generation.wrapping_add(1);
        slot.projectile.reset();
        self.free.push(handle.index);
        true
    }

    pub fn get(&self, handle: ProjectileHandle) -> Option<&Projectile> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.active && s.generation == handle.generation)
            .map(|s| &s.projectile)
    }

    pub fn get_mut(&mut self, handle: ProjectileHandle) -> Option<&mut Projectile> {
        self.slot_mut(handle).map(|s| &mut s.projectile)
    }

    /// Handles of every borrowed projectile, in slot order.
    pub fn active_handles(&self) -> Vec<ProjectileHandle> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| ProjectileHandle {
                index: i as u32,
                generation: s.generation,
            })
            .collect()
    }

    /// Return every projectile.
    pub fn clear(&mut self) {
        for handle in self.active_handles() {
            self.release(handle);
        }
    }

    fn slot_mut(&mut self, handle: ProjectileHandle) -> Option<&mut Slot> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.active && s.generation == handle.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecs::World;

    fn shot(world: &mut World) -> Shot {
        let shooter = world.spawn(());
        let turret = world.spawn(());
        Shot {
            position: DVec3::ZERO,
            velocity: DVec3::Y * 100.0,
            team: Team::Friendly,
            shooter,
            shooter_name: "PlayerTank".into(),
            damage: 70.0,
            lifetime: 4.0,
            use_gravity: true,
            ignore: vec![shooter, turret],
        }
    }

    #[test]
    fn test_acquire_until_exhausted() {
        let mut world = World::new();
        let mut pool = ProjectilePool::new(2);
        assert!(pool.acquire(shot(&mut world)).is_some());
        assert!(pool.acquire(shot(&mut world)).is_some());
        assert!(pool.is_exhausted());
        assert!(pool.acquire(shot(&mut world)).is_none());
        assert_eq!(pool.outstanding(), 2);
    }

    #[test]
    fn test_release_makes_handle_stale() {
        let mut world = World::new();
        let mut pool = ProjectilePool::new(1);
        let first = pool.acquire(shot(&mut world)).unwrap();
        assert_eq!(pool.get(first).map(|p| p.ignore.len()), Some(2));
        assert!(pool.release(first));
        assert!(pool.get(first).is_none());
        assert!(!pool.release(first));

        let second = pool.acquire(shot(&mut world)).unwrap();
        assert_ne!(first, second);
        assert!(pool.get(first).is_none());
        assert!(pool.get(second).is_some());
    }

    #[test]
    fn test_release_clears_ignore_list() {
        let mut world = World::new();
        let mut pool = ProjectilePool::new(1);
        let handle = pool.acquire(shot(&mut world)).unwrap();
        pool.release(handle);
        assert!(pool.slots[0].projectile.ignore.is_empty());

        // A reused slot only ignores its new shooter
        let mut next = shot(&mut world);
        next.ignore.truncate(1);
        let handle = pool.acquire(next).unwrap();
        assert_eq!(pool.get(handle).map(|p| p.ignore.len()), Some(1));
    }

    #[test]
    fn test_clear_returns_everything() {
        let mut world = World::new();
        let mut pool = ProjectilePool::new(4);
        for _ in 0..3 {
            pool.acquire(shot(&mut world));
        }
        pool.clear();
        assert_eq!(pool.outstanding(), 0);
        assert!(pool.active_handles().is_empty());
    }
}
