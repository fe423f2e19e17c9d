//! Renderable face mesh built from one landmark set.

use crate::landmarks::{Landmark, LandmarkSet};
use crate::regions::{FACE_OUTLINE, LEFT_EYE, MOUTH_OUTER, RIGHT_EYE};
use crate::triangulate::triangulate_region;
use glam::{Vec2, Vec3, Vec4};

/// Which regions are ear-clipped: the outline gives the base surface, each
/// feature is triangulated on its own and appended to the same index buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshLayout<'a> {
    pub outline: &'a [usize],
    pub features: &'a [&'a [usize]],
}

pub const FACE_FEATURES: &[&[usize]] = &[LEFT_EYE, RIGHT_EYE, MOUTH_OUTER];

impl MeshLayout<'static> {
    pub const fn face() -> Self {
        Self {
            outline: FACE_OUTLINE,
            features: FACE_FEATURES,
        }
    }
}

impl Default for MeshLayout<'static> {
    fn default() -> Self {
        Self::face()
    }
}

/// Host-facing geometry. All per-vertex buffers have one entry per landmark;
/// `indices` holds three entries per triangle, each below `vertex_count()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshDescriptor {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    /// xyz tangent, w handedness (+1 or -1).
    pub tangents: Vec<Vec4>,
    pub indices: Vec<u32>,
}

impl MeshDescriptor {
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn uvs_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.uvs)
    }

    pub fn normals_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn tangents_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.tangents)
    }
}

/// Builds the face mesh, or the empty descriptor when no face is tracked.
pub fn build_face_mesh(landmarks: Option<&LandmarkSet>) -> MeshDescriptor {
    match landmarks {
        Some(set) => build_mesh(set.points(), MeshLayout::face()),
        None => MeshDescriptor::empty(),
    }
}

pub fn build_mesh(landmarks: &[Landmark], layout: MeshLayout<'_>) -> MeshDescriptor {
    if landmarks.is_empty() {
        return MeshDescriptor::empty();
    }
    let positions: Vec<Vec3> = landmarks.iter().map(Landmark::project).collect();
    let uvs: Vec<Vec2> = landmarks.iter().map(Landmark::uv).collect();

    let mut indices = triangulate_region(landmarks, layout.outline);
    for feature in layout.features {
        indices.extend(triangulate_region(landmarks, feature));
    }

    let normals = compute_normals(&positions, &indices);
    let tangents = compute_tangents(&positions, &uvs, &normals, &indices);
    log::debug!(
        "built face mesh: {} vertices, {} triangles",
        positions.len(),
        indices.len() / 3
    );
    MeshDescriptor {
        positions,
        uvs,
        normals,
        tangents,
        indices,
    }
}

#[inline]
fn triangle(indices: &[u32]) -> [usize; 3] {
    [indices[0] as usize, indices[1] as usize, indices[2] as usize]
}

/// Smooth normals: the normalized sum of the (area-weighted) face normals of
/// every incident triangle. Vertices outside any triangle face +z.
pub fn compute_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = triangle(tri);
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Z))
        .collect()
}

/// Per-vertex tangents from UV-space derivatives, orthogonalized against the
/// normal. `w` carries the bitangent handedness.
pub fn compute_tangents(
    positions: &[Vec3],
    uvs: &[Vec2],
    normals: &[Vec3],
    indices: &[u32],
) -> Vec<Vec4> {
    let mut tan = vec![Vec3::ZERO; positions.len()];
    let mut bitan = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = triangle(tri);
        let e1 = positions[b] - positions[a];
        let e2 = positions[c] - positions[a];
        let d1 = uvs[b] - uvs[a];
        let d2 = uvs[c] - uvs[a];
        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() <= f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let sdir = (e1 * d2.y - e2 * d1.y) * r;
        let tdir = (e2 * d1.x - e1 * d2.x) * r;
        for v in [a, b, c] {
            tan[v] += sdir;
            bitan[v] += tdir;
        }
    }
    normals
        .iter()
        .zip(tan.iter().zip(bitan.iter()))
        .map(|(&n, (&t, &b))| {
            let ortho = (t - n * n.dot(t))
                .try_normalize()
                .unwrap_or_else(|| n.any_orthonormal_vector());
            let w = if n.cross(ortho).dot(b) < 0.0 { -1.0 } else { 1.0 };
            ortho.extend(w)
        })
        .collect()
}
