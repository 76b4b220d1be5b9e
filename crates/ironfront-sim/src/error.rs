//! Error types for the match engine's fallible API.

use hecs::Entity;
use thiserror::Error;

use crate::capture::PointId;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("entity {0:?} does not exist")]
    UnknownEntity(Entity),

    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("capture point {0} does not exist")]
    UnknownPoint(PointId),

    #[error("invalid spawn: {0}")]
    InvalidSpawn(String),
}
