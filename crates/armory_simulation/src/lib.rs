//! ARMORY Simulation Core
//!
//! Pickup-оружие для VR-сцены: держишь в руке — стреляет пулями, пули
//! взрываются о геометрию (или по таймеру) частицами дыма.
//!
//! Архитектура:
//! - Core = grab state, полёт пуль, progress взрывов (этот crate)
//! - Host = физика, grab slots, рендер (traits в `host`)
//! - Bevy ECS = транспорт (ArmoryPlugin: TriggerPulled → WeaponRig)

use bevy::prelude::*;

// Публичные модули
pub mod config;
pub mod error;
pub mod explosion;
pub mod host;
pub mod logger;
pub mod shared;
pub mod weapon;

// Re-export основных типов
pub use config::WeaponConfig;
pub use error::{PhysicsError, TemplateError, WeaponError};
pub use explosion::{ExplosionEffect, ExplosionEffectFactory, ParticleClusterTemplate};
pub use host::{
    BodyId, GrabService, Hand, HeadlessHost, ObjectHandle, PhysicsService, RenderNode,
    RenderNodeId, SceneService, WeaponHost,
};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};
pub use shared::Lifecycle;
pub use weapon::{
    spawn_weapon_rig, ArmoryPlugin, GrabStateController, HostServices, ProjectileManager,
    ShotFired, SimulationLoop, TickReport, TriggerPulled, WeaponRig,
};

/// Создаёт minimal Bevy App для headless симуляции
///
/// `seed` уходит в `WeaponConfig::template_seed` (одинаковый seed →
/// одинаковый particle template).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, ArmoryPlugin))
        .insert_resource(WeaponConfig {
            template_seed: seed,
            ..default()
        });

    app
}
