//! CPU-side geometry shared by every body: icosphere, annulus and orbit circle.

use std::collections::{HashMap, HashSet};

use glam::Vec3;

/// Indexed triangle mesh with per-vertex normals.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Triangle list.
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Line-list indices covering every unique triangle edge once.
    pub fn wire_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::with_capacity(self.indices.len());
        let mut lines = Vec::with_capacity(self.indices.len());
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = if a < b { (a, b) } else { (b, a) };
                if seen.insert(key) {
                    lines.extend_from_slice(&[key.0, key.1]);
                }
            }
        }
        lines
    }
}

/// Unit icosphere. Subdivision 3 gives 1280 triangles.
pub fn icosphere(subdivisions: u32) -> MeshData {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let mut positions: Vec<Vec3> = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .into_iter()
    .map(Vec3::normalize)
    .collect();

    let mut indices: Vec<u32> = vec![
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7,
        1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9,
        8, 1,
    ];

    for _ in 0..subdivisions {
        subdivide(&mut positions, &mut indices);
    }

    MeshData {
        normals: positions.clone(),
        positions,
        indices,
    }
}

/// Split each triangle into four at the edge midpoints, pushed back onto the sphere.
fn subdivide(positions: &mut Vec<Vec3>, indices: &mut Vec<u32>) {
    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
    let mut next = Vec::with_capacity(indices.len() * 4);

    let mut midpoint = |a: u32, b: u32, positions: &mut Vec<Vec3>| -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };
        *midpoints.entry(key).or_insert_with(|| {
            let mid = (positions[a as usize] + positions[b as usize]).normalize();
            positions.push(mid);
            (positions.len() - 1) as u32
        })
    };

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let ab = midpoint(a, b, positions);
        let bc = midpoint(b, c, positions);
        let ca = midpoint(c, a, positions);

        next.extend_from_slice(&[a, ab, ca, b, bc, ab, c, ca, bc, ab, bc, ca]);
    }

    *indices = next;
}

/// Flat annulus in the local XY plane facing +Z, radii in local units.
pub fn annulus(inner: f32, outer: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let mut positions = Vec::with_capacity((segments as usize + 1) * 2);
    for i in 0..=segments {
        let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
        let (sin, cos) = angle.sin_cos();
        positions.push(Vec3::new(cos * inner, sin * inner, 0.0));
        positions.push(Vec3::new(cos * outer, sin * outer, 0.0));
    }

    let mut indices = Vec::with_capacity(segments as usize * 6);
    for i in 0..segments {
        let inner_a = i * 2;
        let outer_a = inner_a + 1;
        let inner_b = inner_a + 2;
        let outer_b = inner_a + 3;
        indices.extend_from_slice(&[inner_a, outer_a, outer_b, inner_a, outer_b, inner_b]);
    }

    MeshData {
        normals: vec![Vec3::Z; positions.len()],
        positions,
        indices,
    }
}

/// Closed unit circle in the XZ plane: `segments + 1` points, first equals last.
pub fn unit_circle(segments: u32) -> Vec<Vec3> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            // The closing point reuses angle 0 exactly.
            let step = i % segments;
            let angle = step as f32 / segments as f32 * std::f32::consts::TAU;
            Vec3::new(angle.cos(), 0.0, angle.sin())
        })
        .collect()
}
