//! WeaponConfig — tunables оружия
//!
//! Default воспроизводит константы pickup-оружия:
//! - пуля 10 м/с вдоль local -Z, живёт 5 секунд
//! - dt clamp 50ms (stall вкладки не должен телепортировать пули сквозь стены)
//! - взрыв 1 секунда, template 10 групп × 10 слоёв

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::WeaponError;
use crate::host::Hand;

/// Максимальный шаг симуляции (секунды)
pub const MAX_TICK_DT: f32 = 0.05;

/// Скорость пули (м/с)
pub const SHOT_SPEED: f32 = 10.0;

/// Время жизни пули (миллисекунды)
pub const SHOT_LIFETIME_MS: f64 = 5000.0;

/// Длительность анимации взрыва (секунды на единицу progress)
pub const EXPLOSION_DURATION: f32 = 1.0;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    /// Grab slot, в котором должен лежать weapon чтобы стрелять
    pub hand: Hand,

    /// Скорость пули (м/с)
    pub shot_speed: f32,

    /// Время жизни пули (мс)
    pub shot_lifetime_ms: f64,

    /// Clamp для dt (секунды)
    pub max_tick_dt: f32,

    /// Секунды на полный цикл explosion progress 0 → 1
    pub explosion_duration: f32,

    /// Particle groups в template
    pub num_smokes: usize,

    /// Depth layers на группу
    pub num_zs: usize,

    /// Seed для bake template (детерминизм)
    pub template_seed: u64,

    /// true = body сразу в world simulation, false = припаркован до первого release
    pub start_simulated: bool,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            hand: Hand::Right,
            shot_speed: SHOT_SPEED,
            shot_lifetime_ms: SHOT_LIFETIME_MS,
            max_tick_dt: MAX_TICK_DT,
            explosion_duration: EXPLOSION_DURATION,
            num_smokes: 10,
            num_zs: 10,
            template_seed: 42,
            start_simulated: false,
        }
    }
}

impl WeaponConfig {
    /// Local-space velocity пули (forward = -Z)
    pub fn shot_velocity(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, -self.shot_speed)
    }

    /// Проверка числовых параметров (template dimensions проверяет сам builder)
    pub fn validate(&self) -> Result<(), WeaponError> {
        if !(self.shot_speed > 0.0) {
            return Err(WeaponError::Config(format!(
                "shot_speed must be positive, got {}",
                self.shot_speed
            )));
        }
        if !(self.shot_lifetime_ms > 0.0) {
            return Err(WeaponError::Config(format!(
                "shot_lifetime_ms must be positive, got {}",
                self.shot_lifetime_ms
            )));
        }
        if !(self.max_tick_dt > 0.0) {
            return Err(WeaponError::Config(format!(
                "max_tick_dt must be positive, got {}",
                self.max_tick_dt
            )));
        }
        if !(self.explosion_duration > 0.0) {
            return Err(WeaponError::Config(format!(
                "explosion_duration must be positive, got {}",
                self.explosion_duration
            )));
        }
        Ok(())
    }
}
