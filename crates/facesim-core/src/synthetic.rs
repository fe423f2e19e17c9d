//! Deterministic stand-in for a face tracker.
//!
//! Produces complete landmark sets with every contour region laid out on an
//! ellipse at a plausible place on the face, so triangulation, morphing and
//! zone targeting see realistic input without a camera. Frames add small
//! seeded jitter and a slow head sway.

use crate::constants::LANDMARK_COUNT;
use crate::landmarks::{Landmark, LandmarkSet};
use crate::regions::{
    FACE_OUTLINE, LEFT_EYE, LEFT_EYEBROW, MOUTH_INNER, MOUTH_OUTER, NOSE, RIGHT_EYE,
    RIGHT_EYEBROW,
};
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::{PI, TAU};
use std::time::Duration;

const FACE_CENTER: Vec2 = Vec2::new(0.5, 0.5);
const FACE_RADII: Vec2 = Vec2::new(0.28, 0.38);
const FACE_BULGE: f32 = 0.06; // max depth toward the camera

const GOLDEN_ANGLE: f32 = 2.399_963;

const DEFAULT_JITTER: f32 = 0.0015;
const DEFAULT_SWAY: f32 = 0.01;

/// Ellipse placement for one contour, walked from `start` by `sweep` radians.
struct Contour {
    indices: &'static [usize],
    center: Vec2,
    radii: Vec2,
    start: f32,
    sweep: f32,
}

const CONTOURS: &[Contour] = &[
    Contour {
        indices: FACE_OUTLINE,
        center: FACE_CENTER,
        radii: FACE_RADII,
        start: -PI / 2.0,
        sweep: TAU,
    },
    Contour {
        indices: LEFT_EYEBROW,
        center: Vec2::new(0.37, 0.35),
        radii: Vec2::new(0.065, 0.012),
        start: PI,
        sweep: TAU,
    },
    Contour {
        indices: RIGHT_EYEBROW,
        center: Vec2::new(0.63, 0.35),
        radii: Vec2::new(0.065, 0.012),
        start: 0.0,
        sweep: -TAU,
    },
    Contour {
        indices: LEFT_EYE,
        center: Vec2::new(0.38, 0.42),
        radii: Vec2::new(0.05, 0.02),
        start: PI,
        sweep: -TAU,
    },
    Contour {
        indices: RIGHT_EYE,
        center: Vec2::new(0.62, 0.42),
        radii: Vec2::new(0.05, 0.02),
        start: PI,
        sweep: TAU,
    },
    Contour {
        indices: MOUTH_OUTER,
        center: Vec2::new(0.5, 0.68),
        radii: Vec2::new(0.09, 0.035),
        start: PI,
        sweep: -TAU,
    },
    Contour {
        indices: MOUTH_INNER,
        center: Vec2::new(0.5, 0.68),
        radii: Vec2::new(0.07, 0.015),
        start: PI,
        sweep: -TAU,
    },
];

fn depth_at(p: Vec2) -> f32 {
    let d = (p - FACE_CENTER) / FACE_RADII;
    -FACE_BULGE * (1.0 - d.length_squared()).max(0.0)
}

fn amplitude(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

fn point(p: Vec2) -> Landmark {
    Landmark::new(p.x, p.y, depth_at(p))
}

/// Neutral frontal face: contours on their ellipses, the nose on the midline
/// and every other landmark spread over the face on a sunflower spiral.
pub fn neutral_face() -> Vec<Landmark> {
    let mut points: Vec<Landmark> = (0..LANDMARK_COUNT)
        .map(|i| {
            let r = ((i as f32 + 0.5) / LANDMARK_COUNT as f32).sqrt() * 0.9;
            let theta = i as f32 * GOLDEN_ANGLE;
            point(FACE_CENTER + FACE_RADII * r * Vec2::new(theta.cos(), theta.sin()))
        })
        .collect();

    for (k, &index) in NOSE.iter().enumerate() {
        let t = k as f32 / (NOSE.len() - 1) as f32;
        // bridge down to the tip, alternating sides for the alae
        let side = if k % 2 == 0 { -1.0 } else { 1.0 };
        let p = Vec2::new(0.5 + side * 0.03 * t, 0.45 + 0.15 * t);
        points[index] = point(p);
    }

    for contour in CONTOURS {
        let n = contour.indices.len() as f32;
        for (k, &index) in contour.indices.iter().enumerate() {
            let a = contour.start + contour.sweep * k as f32 / n;
            let p = contour.center + contour.radii * Vec2::new(a.cos(), a.sin());
            points[index] = point(p);
        }
    }
    points
}

/// Endless stream of tracked frames around [`neutral_face`].
pub struct SyntheticFace {
    base: Vec<Landmark>,
    rng: StdRng,
    time: f32,
    jitter: f32,
    sway: f32,
}

impl SyntheticFace {
    pub fn new(seed: u64) -> Self {
        Self {
            base: neutral_face(),
            rng: StdRng::seed_from_u64(seed),
            time: 0.0,
            jitter: DEFAULT_JITTER,
            sway: DEFAULT_SWAY,
        }
    }

    /// Per-point noise amplitude and head sway amplitude, both in normalized
    /// image units. Zero for both yields the neutral face every frame.
    /// Negative or non-finite amplitudes count as zero.
    pub fn with_motion(mut self, jitter: f32, sway: f32) -> Self {
        self.jitter = amplitude(jitter);
        self.sway = amplitude(sway);
        self
    }

    pub fn neutral(&self) -> &[Landmark] {
        &self.base
    }

    /// Advances the stream by `dt` and returns a freshly identified set.
    pub fn next_frame(&mut self, dt: Duration) -> LandmarkSet {
        self.time += dt.as_secs_f32();
        let offset = Vec2::new(
            (self.time * 0.8).sin() * self.sway,
            (self.time * 1.3).sin() * self.sway * 0.5,
        );
        let jitter = self.jitter;
        let rng = &mut self.rng;
        let points = self
            .base
            .iter()
            .map(|p| {
                let (jx, jy) = if jitter > 0.0 {
                    (
                        rng.gen_range(-jitter..=jitter),
                        rng.gen_range(-jitter..=jitter),
                    )
                } else {
                    (0.0, 0.0)
                };
                Landmark::new(
                    (p.x + offset.x + jx).clamp(0.0, 1.0),
                    (p.y + offset.y + jy).clamp(0.0, 1.0),
                    p.z,
                )
            })
            .collect();
        LandmarkSet::from_valid(points)
    }
}
