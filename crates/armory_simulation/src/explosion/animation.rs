//! Explosion animation — CPU-версия vertex/fragment stage
//!
//! Визуал взрыва = чистая функция от baked attributes и одного scalar `progress`:
//! - куб сжимается к нулю (`1 - p`)
//! - слой уходит вперёд по -Z на `z · maxZ · sqrt(p)`
//! - всё облако всплывает вверх (`0.1 · p`) и покачивается боком по phase
//! - цвет: flame → smoke по `min(z + sqrt(p), 1)`, яркость `2 - p^0.2`
//!
//! Хост с programmable vertex stage делает то же самое на GPU; здесь — для
//! хостов без шейдеров и для тестов.

use std::f32::consts::TAU;

use bevy::prelude::*;

use super::template::{ParticleClusterTemplate, ParticleVertex};

/// #ff7043 — ядро взрыва
pub const FLAME_COLOR: Vec3 = Vec3::new(1.0, 112.0 / 255.0, 67.0 / 255.0);

/// #263238 — остывший дым
pub const SMOKE_COLOR: Vec3 = Vec3::new(38.0 / 255.0, 50.0 / 255.0, 56.0 / 255.0);

/// Позиция вершины (local space эффекта) при данном progress
pub fn vertex_position(vertex: &ParticleVertex, progress: f32) -> Vec3 {
    let forward = progress.max(0.0).sqrt();
    let up = progress * 0.1;
    let phase = vertex.phase;
    let side = Vec2::new(
        (phase.x + progress * TAU * phase.z).sin(),
        (phase.y + progress * TAU * phase.w).sin(),
    );

    let shrunk = vertex.position * vertex.scale * (1.0 - progress);
    let pushed = shrunk + Vec3::new(0.0, 0.0, -vertex.depth * vertex.max_depth * forward);

    let sway = Vec3::new(progress * side.x, progress * side.y, 0.0) * 0.1;

    vertex.rotation * pushed + Vec3::Y * up + sway
}

/// Цвет фрагмента слоя `depth` при данном progress (linear RGB, может быть > 1)
pub fn vertex_color(depth: f32, progress: f32) -> Vec3 {
    let p = progress.max(0.0);
    let factor = (depth + p.sqrt()).min(1.0);
    FLAME_COLOR.lerp(SMOKE_COLOR, factor) * (2.0 - p.powf(0.2))
}

impl ParticleClusterTemplate {
    /// Все вершины template при данном progress (local space эффекта)
    pub fn sample_positions(&self, progress: f32) -> Vec<Vec3> {
        self.vertices()
            .map(|vertex| vertex_position(&vertex, progress))
            .collect()
    }

    /// Все вершины в world space для конкретного эффекта
    pub fn sample_world_positions(&self, transform: &Transform, progress: f32) -> Vec<Vec3> {
        self.vertices()
            .map(|vertex| transform.transform_point(vertex_position(&vertex, progress)))
            .collect()
    }
}
