//! ExplosionEffect + ExplosionEffectFactory
//!
//! Factory владеет shared template (Arc, read-only) и active list эффектов.
//! Эффект хранит только position/orientation (неизменны после spawn) и
//! progress — единственное, что меняется каждый tick.

use std::sync::Arc;

use bevy::prelude::*;

use super::template::ParticleClusterTemplate;
use crate::error::TemplateError;
use crate::host::{ObjectHandle, RenderNode, RenderNodeId, SceneService};
use crate::logger;
use crate::shared::Lifecycle;

/// Один взрыв (per-instance overrides поверх template)
#[derive(Debug, Clone, PartialEq)]
pub struct ExplosionEffect {
    id: u64,
    position: Vec3,
    orientation: Quat,
    progress: f32,
}

impl ExplosionEffect {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.orientation)
    }

    /// Шаг анимации. Terminal на первом tick, где progress >= 1.
    pub fn advance(&mut self, dt: f32, duration: f32) -> Lifecycle {
        // Без положительной duration анимации нет: сразу Terminal
        if !(duration > 0.0) {
            self.progress = 1.0;
            return Lifecycle::Terminal(());
        }

        // dt >= 0 (clamp в FrameClock) → progress монотонно не убывает
        self.progress += dt.max(0.0) / duration;

        if self.progress >= 1.0 {
            Lifecycle::Terminal(())
        } else {
            Lifecycle::Active
        }
    }
}

pub struct ExplosionEffectFactory {
    /// Оружие-владелец (namespace render node ids)
    weapon: ObjectHandle,
    template: Arc<ParticleClusterTemplate>,
    /// Секунды на progress 0 → 1
    duration: f32,
    active: Vec<ExplosionEffect>,
    next_id: u64,
}

impl ExplosionEffectFactory {
    /// `duration` — секунды, конечное и > 0 (иначе progress уйдёт в NaN/inf)
    pub fn new(
        weapon: ObjectHandle,
        template: Arc<ParticleClusterTemplate>,
        duration: f32,
    ) -> Result<Self, TemplateError> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(TemplateError::InvalidDuration);
        }

        Ok(Self {
            weapon,
            template,
            duration,
            active: Vec::new(),
            next_id: 0,
        })
    }

    /// Bake template из seed и собрать factory (вызывается один раз на startup)
    pub fn build(
        weapon: ObjectHandle,
        num_smokes: usize,
        num_zs: usize,
        seed: u64,
        duration: f32,
    ) -> Result<Self, TemplateError> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(TemplateError::InvalidDuration);
        }
        let template = ParticleClusterTemplate::from_seed(num_smokes, num_zs, seed)?;

        logger::log_info(&format!(
            "💥 Explosion template baked: {} smokes × {} layers = {} vertices (seed {})",
            num_smokes,
            num_zs,
            template.vertex_count(),
            seed
        ));

        Self::new(weapon, Arc::new(template), duration)
    }

    pub fn template(&self) -> &Arc<ParticleClusterTemplate> {
        &self.template
    }

    pub fn active(&self) -> &[ExplosionEffect] {
        &self.active
    }

    fn render_node(&self, effect: &ExplosionEffect) -> RenderNode {
        RenderNode::Explosion {
            weapon: self.weapon,
            id: effect.id,
            transform: effect.transform(),
            progress: effect.progress,
            template: Arc::clone(&self.template),
        }
    }

    /// Новый эффект с progress = 0, сразу attach в render list
    pub fn spawn<S>(&mut self, position: Vec3, orientation: Quat, scene: &mut S) -> u64
    where
        S: SceneService + ?Sized,
    {
        let id = self.next_id;
        self.next_id += 1;

        let effect = ExplosionEffect {
            id,
            position,
            orientation,
            progress: 0.0,
        };

        scene.add(self.render_node(&effect));
        self.active.push(effect);

        logger::log(&format!("💥 Explosion #{} spawned at {:?}", id, position));

        id
    }

    /// Advance всех эффектов; завершённые detach + remove. Возвращает число удалённых.
    pub fn tick<S>(&mut self, dt: f32, scene: &mut S) -> usize
    where
        S: SceneService + ?Sized,
    {
        let duration = self.duration;
        let mut active = std::mem::take(&mut self.active);
        let before = active.len();

        active.retain_mut(|effect| match effect.advance(dt, duration) {
            Lifecycle::Active => {
                scene.update(self.render_node(effect));
                true
            }
            Lifecycle::Terminal(()) => {
                scene.remove(RenderNodeId::Explosion(self.weapon, effect.id));
                logger::log(&format!("🌫️ Explosion #{} finished", effect.id));
                false
            }
        });

        let removed = before - active.len();
        self.active = active;
        removed
    }
}
