//! ArmoryPlugin — weapon core внутри Bevy App
//!
//! ECS здесь только транспорт: каждый `WeaponRig` владеет своим
//! `SimulationLoop`, host services лежат в одном resource. Раз в `Update`:
//! 1. TriggerPulled → `SimulationLoop::trigger` (gate по held state внутри)
//! 2. tick всех rigs с timestamp = elapsed time (мс)
//!
//! Рендер и физику делает хост через `HostServices`.

use bevy::prelude::*;

use super::simulation::{SimulationLoop, TickReport};
use crate::config::WeaponConfig;
use crate::error::WeaponError;
use crate::host::{ObjectHandle, WeaponHost};
use crate::logger;

/// Event: "Fire" сигнал для конкретного оружия (input → ECS)
#[derive(Event, Debug, Clone, Copy)]
pub struct TriggerPulled {
    pub weapon: Entity,
}

/// Event: пуля реально вылетела (trigger прошёл held gate)
#[derive(Event, Debug, Clone, Copy)]
pub struct ShotFired {
    pub weapon: Entity,
    pub shot: u64,
}

/// Оружие в мире (один SimulationLoop на entity)
#[derive(Component)]
pub struct WeaponRig {
    pub simulation: SimulationLoop,
    /// Результат последнего tick (диагностика / тесты)
    pub last_report: TickReport,
}

impl WeaponRig {
    pub fn new(simulation: SimulationLoop) -> Self {
        Self {
            simulation,
            last_report: TickReport::default(),
        }
    }
}

/// Host runtime (physics + grab + scene), общий для всех rigs
#[derive(Resource)]
pub struct HostServices(pub Box<dyn WeaponHost + Send + Sync>);

impl HostServices {
    pub fn new(host: impl WeaponHost + Send + Sync + 'static) -> Self {
        Self(Box::new(host))
    }

    /// Конкретный хост (например `HeadlessHost` в harness)
    pub fn downcast_ref<T: WeaponHost + 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: WeaponHost + 'static>(&mut self) -> Option<&mut T> {
        self.0.as_any_mut().downcast_mut::<T>()
    }
}

pub struct ArmoryPlugin;

impl Plugin for ArmoryPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TriggerPulled>()
            .add_event::<ShotFired>()
            .init_resource::<WeaponConfig>();

        // Update, не FixedUpdate: core сам clamp'ит dt по frame timestamp
        app.add_systems(
            Update,
            drive_weapon_rigs.run_if(resource_exists::<HostServices>),
        );
    }
}

/// System: triggers, затем один tick каждого WeaponRig
pub fn drive_weapon_rigs(
    time: Res<Time>,
    mut host: ResMut<HostServices>,
    mut triggers: EventReader<TriggerPulled>,
    mut fired: EventWriter<ShotFired>,
    mut rigs: Query<(Entity, &mut WeaponRig)>,
) {
    let now = time.elapsed_secs_f64() * 1000.0;
    let host = host.0.as_mut();

    for trigger in triggers.read() {
        let Ok((_, mut rig)) = rigs.get_mut(trigger.weapon) else {
            logger::log_warning(&format!(
                "⚠️ TriggerPulled for {:?}: no WeaponRig on entity",
                trigger.weapon
            ));
            continue;
        };

        if let Some(shot) = rig.simulation.trigger(now, host) {
            fired.write(ShotFired {
                weapon: trigger.weapon,
                shot,
            });
        }
    }

    for (_, mut rig) in rigs.iter_mut() {
        let report = rig.simulation.tick(now, host);
        rig.last_report = report;
    }
}

/// Startup оружия в мире: bake template + cook body через `HostServices`
///
/// Config берётся из `WeaponConfig` resource (или default).
pub fn spawn_weapon_rig(
    world: &mut World,
    object: ObjectHandle,
    weapon_mesh: &[Vec3],
) -> Result<Entity, WeaponError> {
    if !world.contains_resource::<HostServices>() {
        return Err(WeaponError::Config(
            "HostServices resource is not installed".to_string(),
        ));
    }

    let config = world
        .get_resource::<WeaponConfig>()
        .cloned()
        .unwrap_or_default();

    let simulation = world.resource_scope(|_, mut host: Mut<HostServices>| {
        SimulationLoop::new(config, object, weapon_mesh, host.0.as_mut())
    })?;

    let entity = world.spawn(WeaponRig::new(simulation)).id();
    logger::log_info(&format!("🔫 WeaponRig {:?} spawned for {:?}", entity, object));

    Ok(entity)
}
