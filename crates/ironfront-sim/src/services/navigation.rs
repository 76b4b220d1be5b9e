//! Navigation service.
//!
//! The default implementation steers in a straight line toward the
//! destination at the agent's hull speed. No path planning.

use std::collections::HashMap;

use glam::DVec3;
use hecs::{Entity, World};

use ironfront_core::components::Hull;
use ironfront_core::types::{flatten, heading_of, Position, Velocity};

/// Moves agents toward destinations and reports their motion.
pub trait Navigation {
    /// Start navigating `agent`. Agents that were never registered are unavailable.
    fn register(&mut self, agent: Entity, stopping_distance: f64);
    /// Drop all state for `agent`.
    fn forget(&mut self, agent: Entity);
    fn is_available(&self, agent: Entity) -> bool;
    fn set_destination(&mut self, agent: Entity, destination: DVec3);
    /// Clear the destination; the agent stops.
    fn stop(&mut self, agent: Entity);
    fn set_stopping_distance(&mut self, agent: Entity, distance: f64);
    fn has_path(&self, agent: Entity) -> bool;
    fn velocity(&self, agent: Entity) -> Option<DVec3>;
    /// Advance every navigated agent by `dt`.
    fn step(&mut self, world: &mut World, dt: f64);
}

/// Slack on the stopping distance so an agent parked at it counts as arrived (m).
const ARRIVAL_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy)]
struct NavAgent {
    destination: Option<DVec3>,
    stopping_distance: f64,
    velocity: DVec3,
}

#[derive(Debug, Default)]
pub struct DirectNavigation {
    agents: HashMap<Entity, NavAgent>,
}

impl DirectNavigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(&self, agent: Entity) -> Option<DVec3> {
        self.agents.get(&agent).and_then(|a| a.destination)
    }
}

impl Navigation for DirectNavigation {
    fn register(&mut self, agent: Entity, stopping_distance: f64) {
        self.agents.insert(
            agent,
            NavAgent {
                destination: None,
                stopping_distance,
                velocity: DVec3::ZERO,
            },
        );
    }

    fn forget(&mut self, agent: Entity) {
        self.agents.remove(&agent);
    }

    fn is_available(&self, agent: Entity) -> bool {
        self.agents.contains_key(&agent)
    }

    fn set_destination(&mut self, agent: Entity, destination: DVec3) {
        if let Some(a) = self.agents.get_mut(&agent) {
            a.destination = Some(destination);
        }
    }

    fn stop(&mut self, agent: Entity) {
        if let Some(a) = self.agents.get_mut(&agent) {
            a.destination = None;
        }
    }

    fn set_stopping_distance(&mut self, agent: Entity, distance: f64) {
        if let Some(a) = self.agents.get_mut(&agent) {
            a.stopping_distance = distance.max(0.0);
        }
    }

    fn has_path(&self, agent: Entity) -> bool {
        self.destination(agent).is_some()
    }

    fn velocity(&self, agent: Entity) -> Option<DVec3> {
        self.agents.get(&agent).map(|a| a.velocity)
    }

    fn step(&mut self, world: &mut World, dt: f64) {
        // Collect, then apply. Agents are stepped in entity order.
        let mut order: Vec<Entity> = self.agents.keys().copied().collect();
        order.sort_by_key(|e| e.to_bits());

        for entity in order {
            let Some(agent) = self.agents.get_mut(&entity) else {
                continue;
            };
            let Ok((pos, vel, hull)) = world.query_one_mut::<(&mut Position, &mut Velocity, &mut Hull)>(entity) else {
                agent.velocity = DVec3::ZERO;
                continue;
            };

            let Some(destination) = agent.destination else {
                agent.velocity = DVec3::ZERO;
                vel.0 = DVec3::ZERO;
                continue;
            };

            let offset = flatten(destination - pos.0);
            let distance = offset.length();
            let stopping = agent.stopping_distance;
            if distance <= stopping + ARRIVAL_TOLERANCE {
                agent.destination = None;
                agent.velocity = DVec3::ZERO;
                vel.0 = DVec3::ZERO;
                continue;
            }

            let direction = offset / distance;
            let travel = (hull.move_speed * dt).min(distance - stopping);
            pos.0 += direction * travel;
            hull.heading = heading_of(direction);
            agent.velocity = direction * (travel / dt);
            vel.0 = agent.velocity;
        }
    }
}
