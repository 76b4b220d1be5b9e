//! ECS systems that operate on the match world each tick.
//!
//! Systems are functions over `&mut World` plus the engine resources they
//! need. Per-entity state lives in components; per-match state (points,
//! ledger, pool) is passed in.

pub mod capture;
pub mod cleanup;
pub mod combat;
pub mod damage;
pub mod perception;
pub mod projectiles;
pub mod snapshot;
