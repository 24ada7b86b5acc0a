//! Explosion domain — визуальный aftermath пули
//!
//! Содержит:
//! - ParticleClusterTemplate (bake один раз на startup, shared через Arc)
//! - ExplosionEffect / ExplosionEffectFactory (per-instance progress + active list)
//! - animation (vertex/color как функция от progress)

pub mod animation;
pub mod effect;
pub mod template;

#[cfg(test)]
mod template_tests;

pub use animation::{vertex_color, vertex_position, FLAME_COLOR, SMOKE_COLOR};
pub use effect::{ExplosionEffect, ExplosionEffectFactory};
pub use template::{ParticleClusterTemplate, ParticleVertex, PARTICLE_CUBE_SIZE};
