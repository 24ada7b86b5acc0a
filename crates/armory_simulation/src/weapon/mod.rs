//! Weapon domain — pickup оружие, которое стреляет взрывающимися пулями
//!
//! Содержит:
//! - GrabStateController (held state → kinematic/simulated body)
//! - ProjectileManager (полёт, raycast, expiry → explosion requests)
//! - SimulationLoop (per-frame порядок: clock → grab → shots → explosions)
//! - ArmoryPlugin (Bevy: TriggerPulled → WeaponRig → HostServices)

pub mod held;
pub mod projectile;
pub mod simulation;
pub mod systems;

#[cfg(test)]
mod projectile_tests;

pub use held::{BodyMode, GrabStateController, GrabTransition, HeldObject};
pub use projectile::{ExplosionRequest, Projectile, ProjectileManager, TerminationCause};
pub use simulation::{FrameClock, SimulationLoop, TickReport};
pub use systems::{
    drive_weapon_rigs, spawn_weapon_rig, ArmoryPlugin, HostServices, ShotFired, TriggerPulled,
    WeaponRig,
};
