//! Tracked facial landmarks as delivered by the face tracker.
//!
//! A [`LandmarkSet`] is always complete (exactly [`LANDMARK_COUNT`] finite
//! points). Every constructed set receives a fresh [`LandmarkSetId`]; clones
//! share it. The orchestrator uses the id, never the coordinates, to decide
//! whether the mesh must be rebuilt.

use crate::constants::{DEPTH_SCALE, LANDMARK_COUNT, POSITION_SCALE};
use crate::error::LandmarkError;
use glam::{Vec2, Vec3};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_SET_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Image-plane position used for triangulation; depth is ignored.
    #[inline]
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Mesh-space position: x/y centred and scaled to [-1, 1] with y up.
    #[inline]
    pub fn project(&self) -> Vec3 {
        Vec3::new(
            (self.x - 0.5) * POSITION_SCALE,
            -(self.y - 0.5) * POSITION_SCALE,
            self.z * DEPTH_SCALE,
        )
    }

    /// Texture coordinate; v is flipped so the chin sits near v = 0.
    #[inline]
    pub fn uv(&self) -> Vec2 {
        Vec2::new(self.x, 1.0 - self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LandmarkSetId(u64);

impl LandmarkSetId {
    fn next() -> Self {
        Self(NEXT_SET_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct LandmarkSet {
    id: LandmarkSetId,
    points: Arc<[Landmark]>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Result<Self, LandmarkError> {
        if points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }
        Ok(Self {
            id: LandmarkSetId::next(),
            points: points.into(),
        })
    }

    /// For generators that produce complete finite frames by construction.
    pub(crate) fn from_valid(points: Vec<Landmark>) -> Self {
        debug_assert_eq!(points.len(), LANDMARK_COUNT);
        debug_assert!(points.iter().all(Landmark::is_finite));
        Self {
            id: LandmarkSetId::next(),
            points: points.into(),
        }
    }

    /// Build from `[x0, y0, z0, x1, y1, z1, ...]`, the layout JS hosts send.
    pub fn from_flat(coords: &[f32]) -> Result<Self, LandmarkError> {
        if coords.len() % 3 != 0 {
            return Err(LandmarkError::RaggedBuffer(coords.len()));
        }
        let points = coords
            .chunks_exact(3)
            .map(|c| Landmark::new(c[0], c[1], c[2]))
            .collect();
        Self::new(points)
    }

    #[inline]
    pub fn id(&self) -> LandmarkSetId {
        self.id
    }

    #[inline]
    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Same anatomical frame: true only for clones of one constructed set.
    #[inline]
    pub fn same_identity(&self, other: &LandmarkSet) -> bool {
        self.id == other.id
    }

    /// Projected mesh-space positions, one per landmark.
    pub fn projected_positions(&self) -> Vec<Vec3> {
        self.points.iter().map(Landmark::project).collect()
    }
}
