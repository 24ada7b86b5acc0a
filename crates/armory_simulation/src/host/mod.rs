//! Host runtime boundary
//!
//! Weapon core ничего не рендерит и не симулирует физику сам — всё это делает
//! внешний runtime. Здесь контракты этих сервисов:
//! - `PhysicsService` — cooked convex body + raycast
//! - `GrabService` — кто держит grab slot
//! - `SceneService` — transform оружия + render list (attach/update/detach)
//!
//! `WeaponHost` = все три сразу (blanket impl), так core получает один `&mut`.

pub mod headless;
pub mod mesh;

#[cfg(test)]
pub(crate) mod recording;

use std::any::Any;
use std::sync::Arc;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;
use crate::explosion::ParticleClusterTemplate;

pub use headless::HeadlessHost;

/// Handle физического тела (выдаётся хостом один раз на startup)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct BodyId(pub u32);

/// Identity scene-объекта (сравнивается с результатом `get_grab`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct ObjectHandle(pub u64);

/// Логический grab slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

/// Opaque результат cooking (хост сам знает что за ним стоит)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CookedGeometry(pub u32);

/// Попадание raycast (world space)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub point: Vec3,
}

/// Ключ render node в render list хоста
///
/// Render list один на хост, а оружий может быть много: id пули/взрыва
/// уникален только внутри своего оружия, поэтому ключ = (weapon, id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderNodeId {
    Shot(ObjectHandle, u64),
    Explosion(ObjectHandle, u64),
}

impl RenderNodeId {
    /// Оружие-владелец node
    pub fn weapon(&self) -> ObjectHandle {
        match self {
            RenderNodeId::Shot(weapon, _) | RenderNodeId::Explosion(weapon, _) => *weapon,
        }
    }
}

/// Render node, который core отдаёт хосту
///
/// Explosion несёт shared template (read-only) + единственный per-instance
/// scalar `progress`; весь остальной визуал — функция от них.
#[derive(Debug, Clone)]
pub enum RenderNode {
    Shot {
        weapon: ObjectHandle,
        id: u64,
        transform: Transform,
    },
    Explosion {
        weapon: ObjectHandle,
        id: u64,
        transform: Transform,
        progress: f32,
        template: Arc<ParticleClusterTemplate>,
    },
}

impl RenderNode {
    pub fn id(&self) -> RenderNodeId {
        match self {
            RenderNode::Shot { weapon, id, .. } => RenderNodeId::Shot(*weapon, *id),
            RenderNode::Explosion { weapon, id, .. } => RenderNodeId::Explosion(*weapon, *id),
        }
    }

    pub fn transform(&self) -> Transform {
        match self {
            RenderNode::Shot { transform, .. } | RenderNode::Explosion { transform, .. } => {
                *transform
            }
        }
    }
}

/// Физический сервис хоста (синхронный, bounded latency)
pub trait PhysicsService {
    /// Луч из `origin` вдоль `direction` (normalized). `None` = промах, не ошибка.
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RaycastHit>;

    /// One-shot cooking render mesh → collision shape (blocking, только на startup)
    fn cook_convex_geometry(&mut self, vertices: &[Vec3]) -> Result<CookedGeometry, PhysicsError>;

    fn add_cooked_convex_geometry(
        &mut self,
        geometry: &CookedGeometry,
        position: Vec3,
        orientation: Quat,
    ) -> Result<BodyId, PhysicsError>;

    fn enable_geometry(&mut self, body: BodyId);

    fn disable_geometry(&mut self, body: BodyId);

    fn enable_geometry_queries(&mut self, body: BodyId);

    fn disable_geometry_queries(&mut self, body: BodyId);

    fn set_physics_transform(
        &mut self,
        body: BodyId,
        position: Vec3,
        orientation: Quat,
    ) -> Result<(), PhysicsError>;

    fn get_physics_transform(&self, body: BodyId) -> Result<Transform, PhysicsError>;
}

pub trait GrabService {
    /// Текущий владелец grab slot (`None` = рука пустая)
    fn get_grab(&self, hand: Hand) -> Option<ObjectHandle>;
}

pub trait SceneService {
    /// Externally-driven transform объекта (двигает держащий актёр)
    fn object_transform(&self, object: ObjectHandle) -> Transform;

    fn set_object_transform(&mut self, object: ObjectHandle, transform: Transform);

    /// Attach в render list
    fn add(&mut self, node: RenderNode);

    /// Per-frame overrides (transform пули, progress взрыва)
    fn update(&mut self, node: RenderNode);

    /// Detach из render list
    fn remove(&mut self, id: RenderNodeId);
}

/// Всё, что нужно weapon core от хоста
pub trait WeaponHost: PhysicsService + GrabService + SceneService {
    /// Конкретный хост за `dyn` (harness управляет grab slots напрямую)
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: PhysicsService + GrabService + SceneService + Any> WeaponHost for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
