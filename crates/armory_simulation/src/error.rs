//! Ошибки weapon core
//!
//! - `TemplateError` — malformed particle template (programming error, fatal на старте)
//! - `PhysicsError` — отказ физического сервиса хоста (per-tick: log + skip)
//! - `WeaponError` — всё что может сорвать startup оружия

use thiserror::Error;

use crate::host::BodyId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("particle template needs at least one smoke group")]
    NoSmokes,

    #[error("particle template needs at least one depth layer")]
    NoLayers,

    #[error("particle template {smokes}x{layers} does not fit a u32 index buffer")]
    TooLarge { smokes: usize, layers: usize },

    #[error("explosion duration must be a positive number of seconds")]
    InvalidDuration,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("unknown physics body {0:?}")]
    UnknownBody(BodyId),

    #[error("unknown cooked geometry #{0}")]
    UnknownGeometry(u32),

    #[error("cannot cook convex geometry from {vertices} vertices")]
    DegenerateMesh { vertices: usize },

    #[error("transform rejected for body {body:?}: {reason}")]
    TransformRejected { body: BodyId, reason: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeaponError {
    #[error("invalid explosion template: {0}")]
    Template(#[from] TemplateError),

    #[error("physics startup failed: {0}")]
    Physics(#[from] PhysicsError),

    #[error("invalid weapon config: {0}")]
    Config(String),
}
