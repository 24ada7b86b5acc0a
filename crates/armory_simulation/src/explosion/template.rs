//! ParticleClusterTemplate — pre-baked geometry всех взрывов
//!
//! Layout:
//! - `num_smokes` групп (дымовых "струй")
//! - в каждой `num_zs` depth layers
//! - каждый layer = копия маленького cube (24 вершины, 36 индексов)
//!
//! Per-vertex attributes (named, length-checked, immutable после build):
//! - `positions` — вершина cube primitive (local space)
//! - `depths` (z) — j / num_zs, равномерно по слоям
//! - `max_depths` (maxZ) — random per group, [0, 1)
//! - `rotations` (q) — random small-angle offset per group (±0.05·2π по осям, YXZ)
//! - `phases` — (offset_x, offset_y, freq_x, freq_y) per group
//! - `scales` — random uniform scale per group, [0.9, 1.1)
//! - `indices` — u32, со сдвигом на layer offset
//!
//! Вся анимация взрыва = функция (attributes, progress), см. `animation.rs`.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::TemplateError;
use crate::host::mesh::{cube, CUBE_INDICES, CUBE_VERTICES};

/// Ребро cube primitive (метры)
pub const PARTICLE_CUBE_SIZE: f32 = 0.04;

/// Максимальный угол orientation offset (доля полного оборота)
const MAX_TILT_TURNS: f32 = 0.05;

/// Все baked attributes одной вершины
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleVertex {
    pub position: Vec3,
    pub depth: f32,
    pub max_depth: f32,
    pub rotation: Quat,
    pub phase: Vec4,
    pub scale: f32,
}

/// Random параметры одной группы (одинаковы на всех её слоях)
#[derive(Debug, Clone, Copy)]
struct GroupParams {
    rotation: Quat,
    max_depth: f32,
    phase: Vec4,
    scale: f32,
}

impl GroupParams {
    fn roll(rng: &mut impl Rng) -> Self {
        let mut tilt = || rng.gen_range(-1.0f32..1.0) * TAU * MAX_TILT_TURNS;
        let (x, y, z) = (tilt(), tilt(), tilt());
        let rotation = Quat::from_euler(EulerRot::YXZ, y, x, z);

        let max_depth = rng.gen::<f32>();
        let phase = Vec4::new(
            rng.gen::<f32>() * TAU,
            rng.gen::<f32>() * TAU,
            0.1 + rng.gen::<f32>() * 0.2,
            0.1 + rng.gen::<f32>() * 0.2,
        );
        let scale = 0.9 + rng.gen::<f32>() * 0.2;

        Self {
            rotation,
            max_depth,
            phase,
            scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleClusterTemplate {
    num_smokes: usize,
    num_zs: usize,
    positions: Vec<Vec3>,
    depths: Vec<f32>,
    max_depths: Vec<f32>,
    rotations: Vec<Quat>,
    phases: Vec<Vec4>,
    scales: Vec<f32>,
    indices: Vec<u32>,
}

impl ParticleClusterTemplate {
    /// Bake template (fail fast до аллокации — partial template не существует)
    pub fn build(
        num_smokes: usize,
        num_zs: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, TemplateError> {
        if num_smokes == 0 {
            return Err(TemplateError::NoSmokes);
        }
        if num_zs == 0 {
            return Err(TemplateError::NoLayers);
        }

        let too_large = TemplateError::TooLarge {
            smokes: num_smokes,
            layers: num_zs,
        };
        let num_vertices = num_smokes
            .checked_mul(num_zs)
            .and_then(|layers| layers.checked_mul(CUBE_VERTICES))
            .filter(|&n| u32::try_from(n).is_ok())
            .ok_or(too_large)?;
        let num_indices = num_vertices / CUBE_VERTICES * CUBE_INDICES;

        let primitive = cube(PARTICLE_CUBE_SIZE);

        let mut positions = Vec::with_capacity(num_vertices);
        let mut depths = Vec::with_capacity(num_vertices);
        let mut max_depths = Vec::with_capacity(num_vertices);
        let mut rotations = Vec::with_capacity(num_vertices);
        let mut phases = Vec::with_capacity(num_vertices);
        let mut scales = Vec::with_capacity(num_vertices);
        let mut indices = Vec::with_capacity(num_indices);

        for _ in 0..num_smokes {
            let group = GroupParams::roll(rng);

            for layer in 0..num_zs {
                let depth = layer as f32 / num_zs as f32;
                // Проверено выше: num_vertices влезает в u32
                let index_offset = positions.len() as u32;

                positions.extend_from_slice(&primitive.positions);
                indices.extend(primitive.indices.iter().map(|&i| i + index_offset));

                depths.extend(std::iter::repeat(depth).take(CUBE_VERTICES));
                max_depths.extend(std::iter::repeat(group.max_depth).take(CUBE_VERTICES));
                rotations.extend(std::iter::repeat(group.rotation).take(CUBE_VERTICES));
                phases.extend(std::iter::repeat(group.phase).take(CUBE_VERTICES));
                scales.extend(std::iter::repeat(group.scale).take(CUBE_VERTICES));
            }
        }

        debug_assert_eq!(positions.len(), num_vertices);
        debug_assert_eq!(indices.len(), num_indices);

        Ok(Self {
            num_smokes,
            num_zs,
            positions,
            depths,
            max_depths,
            rotations,
            phases,
            scales,
            indices,
        })
    }

    /// Bake из seed (ChaCha8 — одинаковый template на всех платформах)
    pub fn from_seed(num_smokes: usize, num_zs: usize, seed: u64) -> Result<Self, TemplateError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::build(num_smokes, num_zs, &mut rng)
    }

    pub fn num_smokes(&self) -> usize {
        self.num_smokes
    }

    pub fn num_zs(&self) -> usize {
        self.num_zs
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn depths(&self) -> &[f32] {
        &self.depths
    }

    pub fn max_depths(&self) -> &[f32] {
        &self.max_depths
    }

    pub fn rotations(&self) -> &[Quat] {
        &self.rotations
    }

    pub fn phases(&self) -> &[Vec4] {
        &self.phases
    }

    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Группа (smoke index), которой принадлежит вершина
    pub fn group_of(&self, vertex: usize) -> usize {
        vertex / (self.num_zs * CUBE_VERTICES)
    }

    pub fn vertex(&self, index: usize) -> Option<ParticleVertex> {
        Some(ParticleVertex {
            position: *self.positions.get(index)?,
            depth: self.depths[index],
            max_depth: self.max_depths[index],
            rotation: self.rotations[index],
            phase: self.phases[index],
            scale: self.scales[index],
        })
    }

    pub fn vertices(&self) -> impl Iterator<Item = ParticleVertex> + '_ {
        (0..self.vertex_count()).filter_map(|i| self.vertex(i))
    }
}
