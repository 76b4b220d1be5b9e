//! Match engine for IRONFRONT.
//!
//! Owns the hecs ECS world, runs the combat AI, capture points and ticket
//! economy at a fixed tick rate, and produces `MatchSnapshot`s.

pub mod agent;
pub mod capture;
pub mod engine;
pub mod error;
pub mod projectile;
pub mod scenario;
pub mod services;
pub mod systems;
pub mod tickets;
pub mod world_setup;

pub use engine::{MatchEngine, SimConfig};
pub use error::SimError;
pub use ironfront_core as core;
