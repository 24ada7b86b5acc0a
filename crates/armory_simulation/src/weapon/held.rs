//! HeldObject + GrabStateController
//!
//! Оружие — scene-объект с одним cooked convex body. Тело всегда в одном из
//! двух режимов:
//! - **Driven** (kinematic): transform двигает держащий актёр, копируем
//!   external → physics; geometry + queries выключены
//! - **Simulated**: transform двигает физика, копируем physics → external
//!
//! Toggle только на переходах held/not-held (повторный одинаковый state
//! не дёргает enable/disable).

use bevy::prelude::*;

use crate::host::{BodyId, Hand, ObjectHandle, PhysicsService, SceneService, WeaponHost};
use crate::logger;

/// Кто сейчас ведёт transform тела
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum BodyMode {
    /// Физика хоста (после release)
    Simulated,
    /// Внешний transform (в руке, либо припаркован до первого release)
    ///
    /// До первого release строка (not held, not held) тоже синкает
    /// external → physics: тело выключено на startup и ждёт в месте спавна.
    Driven,
}

/// Что произошло с grab state на этом tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum GrabTransition {
    #[default]
    None,
    Grabbed,
    Released,
}

/// Weapon scene-объект + его physics body (создаётся один раз)
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct HeldObject {
    pub object: ObjectHandle,
    pub body: BodyId,
    pub is_held: bool,
    pub was_held_last_tick: bool,
    pub mode: BodyMode,
}

pub struct GrabStateController {
    held: HeldObject,
    hand: Hand,
}

impl GrabStateController {
    /// Startup: cook + add body в текущем transform объекта, затем выключить его
    ///
    /// Blocking (cooking), вызывается до первого tick. `start_simulated` сразу
    /// отдаёт тело физике вместо парковки.
    pub fn startup<H>(
        host: &mut H,
        object: ObjectHandle,
        hand: Hand,
        mesh: &[Vec3],
        start_simulated: bool,
    ) -> Result<Self, crate::error::PhysicsError>
    where
        H: PhysicsService + SceneService + ?Sized,
    {
        let placed = host.object_transform(object);
        let cooked = host.cook_convex_geometry(mesh)?;
        let body = host.add_cooked_convex_geometry(&cooked, placed.translation, placed.rotation)?;

        host.disable_geometry(body);
        host.disable_geometry_queries(body);

        let mut mode = BodyMode::Driven;
        if start_simulated {
            host.enable_geometry(body);
            host.enable_geometry_queries(body);
            mode = BodyMode::Simulated;
        }

        logger::log_info(&format!(
            "🔫 Weapon {:?} body {:?} ready ({:?}, hand {:?})",
            object, body, mode, hand
        ));

        Ok(Self {
            held: HeldObject {
                object,
                body,
                is_held: false,
                was_held_last_tick: false,
                mode,
            },
            hand,
        })
    }

    pub fn held_object(&self) -> &HeldObject {
        &self.held
    }

    pub fn body(&self) -> BodyId {
        self.held.body
    }

    pub fn object(&self) -> ObjectHandle {
        self.held.object
    }

    pub fn hand(&self) -> Hand {
        self.hand
    }

    /// Held state, увиденный последним tick
    pub fn is_held(&self) -> bool {
        self.held.is_held
    }

    pub fn mode(&self) -> BodyMode {
        self.held.mode
    }

    /// Live-проверка: держит ли grab slot именно это оружие (identity compare)
    pub fn holds<H>(&self, host: &H) -> bool
    where
        H: WeaponHost + ?Sized,
    {
        host.get_grab(self.hand) == Some(self.held.object)
    }

    /// Один tick: transition (если есть) + sync transform в направлении режима
    pub fn tick<H>(&mut self, host: &mut H) -> GrabTransition
    where
        H: WeaponHost + ?Sized,
    {
        let held_now = self.holds(host);
        let body = self.held.body;

        self.held.was_held_last_tick = self.held.is_held;
        self.held.is_held = held_now;

        let transition = match (self.held.was_held_last_tick, held_now) {
            (false, true) => {
                host.disable_geometry(body);
                host.disable_geometry_queries(body);
                self.held.mode = BodyMode::Driven;
                GrabTransition::Grabbed
            }
            (true, false) => {
                host.enable_geometry(body);
                host.enable_geometry_queries(body);
                self.held.mode = BodyMode::Simulated;
                GrabTransition::Released
            }
            _ => GrabTransition::None,
        };

        if transition != GrabTransition::None {
            logger::log(&format!(
                "✋ Weapon {:?}: {:?} → body {:?}",
                self.held.object, transition, self.held.mode
            ));
        }

        self.sync_transform(host);
        transition
    }

    // Ошибки хоста не копятся: следующий tick заново выводит всё из mode
    fn sync_transform<H>(&self, host: &mut H)
    where
        H: WeaponHost + ?Sized,
    {
        let HeldObject { object, body, .. } = self.held;

        match self.held.mode {
            BodyMode::Driven => {
                let external = host.object_transform(object);
                if let Err(err) =
                    host.set_physics_transform(body, external.translation, external.rotation)
                {
                    logger::log_warning(&format!(
                        "⚠️ Weapon {:?}: physics sync skipped this tick: {}",
                        object, err
                    ));
                }
            }
            BodyMode::Simulated => match host.get_physics_transform(body) {
                Ok(simulated) => {
                    let mut external = host.object_transform(object);
                    external.translation = simulated.translation;
                    external.rotation = simulated.rotation;
                    host.set_object_transform(object, external);
                }
                Err(err) => {
                    logger::log_warning(&format!(
                        "⚠️ Weapon {:?}: cannot read simulated transform: {}",
                        object, err
                    ));
                }
            },
        }
    }
}
