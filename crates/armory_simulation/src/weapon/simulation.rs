//! SimulationLoop — per-frame driver weapon core
//!
//! Хост вызывает `tick(timestamp)` раз в rendered frame. Порядок фиксирован:
//! 1. FrameClock: dt = min(Δtimestamp / 1000, max_dt)
//! 2. GrabStateController — held state должен устаканиться первым
//! 3. ProjectileManager — move / collide / expire → explosion requests
//! 4. ExplosionEffectFactory — spawn requested, advance progress, prune
//!
//! Один и тот же `now`/`dt` для всех шагов. Reentrancy нет: `&mut self`.

use bevy::prelude::*;

use super::held::{BodyMode, GrabStateController, GrabTransition};
use super::projectile::ProjectileManager;
use crate::config::WeaponConfig;
use crate::error::WeaponError;
use crate::explosion::ExplosionEffectFactory;
use crate::host::{ObjectHandle, WeaponHost};
use crate::logger;

/// Clamp-часы: timestamp (мс) → dt (секунды)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    last_timestamp: Option<f64>,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_timestamp: None,
            max_dt,
        }
    }

    /// Первый tick → 0; часы назад → 0; stall → max_dt
    ///
    /// Не-finite timestamp даёт 0 и не запоминается: следующий валидный
    /// tick считает dt от последнего валидного.
    pub fn advance(&mut self, timestamp: f64) -> f32 {
        if !timestamp.is_finite() {
            return 0.0;
        }

        let dt = match self.last_timestamp {
            Some(last) => (((timestamp - last) / 1000.0) as f32).max(0.0).min(self.max_dt),
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp);
        dt
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }
}

/// Диагностика одного tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    pub dt: f32,
    pub grab: GrabTransition,
    /// Пуль завершилось (каждая → взрыв)
    pub exploded: usize,
    /// Взрывов догорело и удалено
    pub expired_effects: usize,
    pub active_shots: usize,
    pub active_effects: usize,
}

pub struct SimulationLoop {
    config: WeaponConfig,
    clock: FrameClock,
    grab: GrabStateController,
    projectiles: ProjectileManager,
    explosions: ExplosionEffectFactory,
}

impl SimulationLoop {
    /// Startup оружия (blocking): template bake, затем cooking + body
    ///
    /// Template проверяется первым — при malformed config хост не получает
    /// ни одного physics вызова.
    pub fn new<H>(
        config: WeaponConfig,
        object: ObjectHandle,
        weapon_mesh: &[Vec3],
        host: &mut H,
    ) -> Result<Self, WeaponError>
    where
        H: WeaponHost + ?Sized,
    {
        config.validate()?;

        let explosions = ExplosionEffectFactory::build(
            object,
            config.num_smokes,
            config.num_zs,
            config.template_seed,
            config.explosion_duration,
        )?;

        let grab = GrabStateController::startup(
            host,
            object,
            config.hand,
            weapon_mesh,
            config.start_simulated,
        )?;

        Ok(Self {
            clock: FrameClock::new(config.max_tick_dt),
            projectiles: ProjectileManager::new(
                object,
                config.shot_velocity(),
                config.shot_lifetime_ms,
            ),
            grab,
            explosions,
            config,
        })
    }

    pub fn config(&self) -> &WeaponConfig {
        &self.config
    }

    pub fn grab(&self) -> &GrabStateController {
        &self.grab
    }

    pub fn projectiles(&self) -> &ProjectileManager {
        &self.projectiles
    }

    pub fn explosions(&self) -> &ExplosionEffectFactory {
        &self.explosions
    }

    pub fn body_mode(&self) -> BodyMode {
        self.grab.mode()
    }

    /// "Fire" сигнал. Не в руке → молча игнорируем (`None`).
    pub fn trigger<H>(&mut self, now: f64, host: &mut H) -> Option<u64>
    where
        H: WeaponHost + ?Sized,
    {
        if !self.grab.holds(host) {
            logger::log(&format!(
                "Trigger ignored: weapon {:?} not held in {:?}",
                self.grab.object(),
                self.grab.hand()
            ));
            return None;
        }

        let muzzle = host.object_transform(self.grab.object());
        Some(
            self.projectiles
                .spawn(muzzle.translation, muzzle.rotation, now, host),
        )
    }

    /// Один frame. `timestamp` — монотонные миллисекунды (он же `now`).
    pub fn tick<H>(&mut self, timestamp: f64, host: &mut H) -> TickReport
    where
        H: WeaponHost + ?Sized,
    {
        let dt = self.clock.advance(timestamp);
        let now = timestamp;

        let grab = self.grab.tick(host);

        let requests = self.projectiles.tick(now, dt, host);
        for request in &requests {
            self.explosions
                .spawn(request.position, request.orientation, host);
        }

        let expired_effects = self.explosions.tick(dt, host);

        TickReport {
            dt,
            grab,
            exploded: requests.len(),
            expired_effects,
            active_shots: self.projectiles.active().len(),
            active_effects: self.explosions.active().len(),
        }
    }
}
