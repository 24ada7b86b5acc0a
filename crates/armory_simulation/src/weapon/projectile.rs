//! Projectile + ProjectileManager
//!
//! Пуля летит прямо вдоль forward оружия (local -Z) с постоянной скоростью.
//! Каждый tick:
//! 1. displacement = orientation · velocity · dt
//! 2. now >= expiry → Terminal (взрыв в текущей позиции). Проверяется ДО движения.
//! 3. raycast вдоль displacement; hit ближе |displacement| → Terminal (взрыв в hit point)
//! 4. иначе position += displacement
//!
//! Manager владеет active set и фильтрует его за один проход.

use bevy::prelude::*;

use crate::host::{ObjectHandle, PhysicsService, RenderNode, RenderNodeId, SceneService};
use crate::logger;
use crate::shared::Lifecycle;

/// Почему пуля завершилась
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum TerminationCause {
    Expired,
    Hit,
}

/// Запрос на взрыв (ProjectileManager → ExplosionEffectFactory)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionRequest {
    pub position: Vec3,
    pub orientation: Quat,
    pub cause: TerminationCause,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u64,
    pub position: Vec3,
    pub orientation: Quat,
    /// Local-space скорость (м/с)
    pub velocity: Vec3,
    /// Время spawn (мс)
    pub spawn_time: f64,
    /// Время самоуничтожения (мс)
    pub expiry_time: f64,
}

impl Projectile {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.orientation)
    }

    /// Один шаг полёта
    pub fn advance<P>(&mut self, now: f64, dt: f32, physics: &P) -> Lifecycle<ExplosionRequest>
    where
        P: PhysicsService + ?Sized,
    {
        let world_velocity = self.orientation * self.velocity;
        let displacement = world_velocity * dt;

        // Expiry раньше collision: истёкшая пуля взрывается там, где стоит
        if now >= self.expiry_time {
            return Lifecycle::Terminal(ExplosionRequest {
                position: self.position,
                orientation: self.orientation,
                cause: TerminationCause::Expired,
            });
        }

        let step = displacement.length();
        // Направление из velocity (не из displacement) — при dt = 0 оно тоже валидно
        if let Some(direction) = world_velocity.try_normalize() {
            if let Some(hit) = physics.raycast(self.position, direction) {
                if hit.point.distance(self.position) < step {
                    return Lifecycle::Terminal(ExplosionRequest {
                        position: hit.point,
                        orientation: self.orientation,
                        cause: TerminationCause::Hit,
                    });
                }
            }
        }

        self.position += displacement;
        Lifecycle::Active
    }
}

pub struct ProjectileManager {
    /// Оружие-владелец (namespace render node ids)
    weapon: ObjectHandle,
    /// Local-space velocity новых пуль
    velocity: Vec3,
    /// Время жизни новых пуль (мс)
    lifetime_ms: f64,
    active: Vec<Projectile>,
    next_id: u64,
}

impl ProjectileManager {
    pub fn new(weapon: ObjectHandle, velocity: Vec3, lifetime_ms: f64) -> Self {
        Self {
            weapon,
            velocity,
            lifetime_ms,
            active: Vec::new(),
            next_id: 0,
        }
    }

    pub fn active(&self) -> &[Projectile] {
        &self.active
    }

    /// Новая пуля из transform оружия (gate по held state — на стороне вызывающего)
    pub fn spawn<S>(&mut self, origin: Vec3, orientation: Quat, now: f64, scene: &mut S) -> u64
    where
        S: SceneService + ?Sized,
    {
        let id = self.next_id;
        self.next_id += 1;

        let projectile = Projectile {
            id,
            position: origin,
            orientation,
            velocity: self.velocity,
            spawn_time: now,
            expiry_time: now + self.lifetime_ms,
        };

        scene.add(RenderNode::Shot {
            weapon: self.weapon,
            id,
            transform: projectile.transform(),
        });
        self.active.push(projectile);

        logger::log(&format!("🔫 Shot #{} fired from {:?}", id, origin));

        id
    }

    /// Advance всех пуль; возвращает explosion requests завершившихся
    pub fn tick<H>(&mut self, now: f64, dt: f32, host: &mut H) -> Vec<ExplosionRequest>
    where
        H: PhysicsService + SceneService + ?Sized,
    {
        let weapon = self.weapon;
        let mut explosions = Vec::new();

        self.active.retain_mut(|shot| match shot.advance(now, dt, &*host) {
            Lifecycle::Active => {
                host.update(RenderNode::Shot {
                    weapon,
                    id: shot.id,
                    transform: shot.transform(),
                });
                true
            }
            Lifecycle::Terminal(request) => {
                host.remove(RenderNodeId::Shot(weapon, shot.id));
                logger::log(&format!(
                    "💥 Shot #{} terminated ({:?}) at {:?}",
                    shot.id, request.cause, request.position
                ));
                explosions.push(request);
                false
            }
        });

        explosions
    }
}
