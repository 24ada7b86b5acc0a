//! Mesh helpers на границе asset loading
//!
//! - `cube` — indexed box primitive (4 вершины на грань, 6 граней)
//! - `deinterleave` — indexed + strided mesh → плоский non-indexed список
//!   вершин в world space (вход для `cook_convex_geometry`)

use bevy::prelude::*;

use crate::logger;

/// Вершин в cube primitive
pub const CUBE_VERTICES: usize = 24;

/// Индексов в cube primitive (2 треугольника на грань)
pub const CUBE_INDICES: usize = 36;

/// Indexed mesh (positions плотно упакованы по 3 float)
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

// (normal, u, v) для каждой грани
const CUBE_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

/// Box с ребром `size`, центр в origin
pub fn cube(size: f32) -> IndexedMesh {
    let half = size * 0.5;
    let mut positions = Vec::with_capacity(CUBE_VERTICES);
    let mut indices = Vec::with_capacity(CUBE_INDICES);

    for (face, (normal, u, v)) in CUBE_FACES.iter().enumerate() {
        let base = (face * 4) as u32;
        for (su, sv) in [(-1.0f32, 1.0f32), (1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)] {
            positions.push((*normal + *u * su + *v * sv) * half);
        }
        indices.extend_from_slice(&[base, base + 2, base + 1, base + 2, base + 3, base + 1]);
    }

    IndexedMesh { positions, indices }
}

/// Разворачивает indexed strided буфер в non-indexed вершины, применяя `world`
///
/// `stride` — шаг вершины в float'ах (>= 3, первые три — xyz).
/// Индексы за пределами буфера пропускаются с warning.
pub fn deinterleave(raw: &[f32], stride: usize, indices: &[u32], world: &Mat4) -> Vec<Vec3> {
    if stride < 3 {
        logger::log_warning(&format!("deinterleave: stride {} < 3, mesh skipped", stride));
        return Vec::new();
    }

    let mut out = Vec::with_capacity(indices.len());
    let mut skipped = 0usize;

    for &index in indices {
        let start = index as usize * stride;
        let Some(xyz) = raw.get(start..start + 3) else {
            skipped += 1;
            continue;
        };
        out.push(world.transform_point3(Vec3::from_slice(xyz)));
    }

    if skipped > 0 {
        logger::log_warning(&format!(
            "deinterleave: {} indices out of range (buffer {} floats, stride {})",
            skipped,
            raw.len(),
            stride
        ));
    }

    out
}

impl IndexedMesh {
    /// Interleaved буфер (xyz + `padding` нулей на вершину) — формат render mesh'ей хоста
    pub fn interleaved(&self, padding: usize) -> Vec<f32> {
        let mut raw = Vec::with_capacity(self.positions.len() * (3 + padding));
        for p in &self.positions {
            raw.extend_from_slice(&[p.x, p.y, p.z]);
            raw.extend(std::iter::repeat(0.0).take(padding));
        }
        raw
    }
}
