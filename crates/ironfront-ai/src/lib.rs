//! Combat AI for IRONFRONT.
//!
//! Pure decision math for AI-controlled tanks: target selection,
//! line-of-sight policy, ballistic lead and launch solutions, turret
//! servo motion, weapon spread and the combat state machine.
//! No ECS dependency; everything operates on plain data.

pub mod aiming;
pub mod ballistics;
pub mod fsm;
pub mod perception;
pub mod profiles;
pub mod weapon;

pub use ironfront_core as core;
