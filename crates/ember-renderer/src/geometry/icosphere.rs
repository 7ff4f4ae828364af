//! Icosphere generation by repeated midpoint subdivision.

use glam::{Vec3, Vec4};
use std::collections::HashMap;

use super::types::Mesh;

/// Builder namespace for subdivided icosahedra.
pub struct Icosphere;

/// Golden ratio.
const PHI: f32 = 1.618_034;

/// Faces of the base icosahedron, counter-clockwise seen from outside.
const BASE_FACES: [[u32; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

impl Icosphere {
    /// Deepest level whose vertex indices still fit in `u32`.
    pub const MAX_SUBDIVISIONS: u32 = 14;

    /// Triangles produced at `subdivisions`: 20 * 4^n, saturating at `usize::MAX`.
    pub const fn triangle_count(subdivisions: u32) -> usize {
        20usize.saturating_mul(4usize.saturating_pow(subdivisions))
    }

    /// Vertices produced at `subdivisions` with every midpoint shared:
    /// 10 * 4^n + 2, saturating at `usize::MAX`.
    pub const fn vertex_count(subdivisions: u32) -> usize {
        10usize
            .saturating_mul(4usize.saturating_pow(subdivisions))
            .saturating_add(2)
    }

    /// Build a sphere of `radius` around `center`.
    ///
    /// Level 0 is the bare icosahedron. Levels above [`Self::MAX_SUBDIVISIONS`]
    /// are clamped to it. Normals point from `center` to each vertex. A
    /// non-positive radius is not rejected; it yields a degenerate or
    /// inverted sphere.
    pub fn build(center: Vec3, radius: f32, subdivisions: u32) -> Mesh {
        let subdivisions = if subdivisions > Self::MAX_SUBDIVISIONS {
            tracing::warn!(
                requested = subdivisions,
                max = Self::MAX_SUBDIVISIONS,
                "icosphere level clamped"
            );
            Self::MAX_SUBDIVISIONS
        } else {
            subdivisions
        };

        let mut unit = base_vertices();
        unit.reserve(Self::vertex_count(subdivisions).saturating_sub(unit.len()));
        let mut faces: Vec<[u32; 3]> = BASE_FACES.to_vec();

        for _ in 0..subdivisions {
            let mut midpoints = MidpointCache::with_capacity(faces.len() * 3 / 2);
            let mut next = Vec::with_capacity(faces.len() * 4);
            for &[v0, v1, v2] in &faces {
                let a = midpoints.get(&mut unit, v0, v1);
                let b = midpoints.get(&mut unit, v1, v2);
                let c = midpoints.get(&mut unit, v2, v0);
                next.extend_from_slice(&[[v0, a, c], [v1, b, a], [v2, c, b], [a, b, c]]);
            }
            faces = next;
        }

        Mesh {
            positions: unit
                .iter()
                .map(|&n| (center + n * radius).extend(1.0))
                .collect(),
            normals: unit.iter().map(|&n| n.extend(0.0)).collect(),
            colors: None,
            indices: faces.into_iter().flatten().collect(),
        }
    }
}

/// The 12 icosahedron corners on the unit sphere.
fn base_vertices() -> Vec<Vec3> {
    let s = 1.0 / (1.0 + PHI * PHI).sqrt();
    let (a, b) = (s, PHI * s);
    vec![
        Vec3::new(-a, b, 0.0),
        Vec3::new(a, b, 0.0),
        Vec3::new(-a, -b, 0.0),
        Vec3::new(a, -b, 0.0),
        Vec3::new(0.0, -a, b),
        Vec3::new(0.0, a, b),
        Vec3::new(0.0, -a, -b),
        Vec3::new(0.0, a, -b),
        Vec3::new(b, 0.0, -a),
        Vec3::new(b, 0.0, a),
        Vec3::new(-b, 0.0, -a),
        Vec3::new(-b, 0.0, a),
    ]
}

/// Edge midpoints keyed by the unordered vertex pair, so neighbouring faces
/// share the vertex they split.
struct MidpointCache {
    by_edge: HashMap<(u32, u32), u32>,
}

impl MidpointCache {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            by_edge: HashMap::with_capacity(capacity),
        }
    }

    fn get(&mut self, vertices: &mut Vec<Vec3>, a: u32, b: u32) -> u32 {
        let key = (a.min(b), a.max(b));
        *self.by_edge.entry(key).or_insert_with(|| {
            let mid = (vertices[a as usize] + vertices[b as usize]).normalize();
            vertices.push(mid);
            (vertices.len() - 1) as u32
        })
    }
}
