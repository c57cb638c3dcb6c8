//! Error types for the simulation core.
//!
//! None of these reach a player: geometry failures abort a single collision
//! pair, registry failures are reported to the host that asked.

use crate::components::ComponentKind;

/// Failures of the vector and mesh math.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,

    #[error("mesh has no usable edges")]
    EmptyMesh,
}

/// Failures while loading or validating a [`crate::Config`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failures of registry lookups.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    #[error("entity does not exist")]
    NoSuchEntity,

    #[error("entity has no {0:?} component")]
    MissingComponent(ComponentKind),
}

impl From<hecs::NoSuchEntity> for WorldError {
    fn from(_: hecs::NoSuchEntity) -> Self {
        WorldError::NoSuchEntity
    }
}
