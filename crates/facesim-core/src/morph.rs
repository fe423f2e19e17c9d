//! Expression morph targets.
//!
//! Each target is the base projected position buffer with fixed offsets
//! applied to a handful of landmarks. How strongly a target shows is the
//! renderer's business (a per-target weight), so offsets never depend on
//! treatment intensity.

use crate::constants::{
    EYES_CLOSED_LID_SHIFT, FROWN_BROW_SHIFT, FROWN_DROP, MOUTH_CORNERS, SMILE_LIFT, SMILE_SPREAD,
};
use crate::landmarks::LandmarkSet;
use crate::regions::{LEFT_EYE, LEFT_EYEBROW, RIGHT_EYE, RIGHT_EYEBROW};
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Expression {
    Smile,
    Frown,
    EyesClosed,
}

impl Expression {
    pub const ALL: [Expression; 3] = [Expression::Smile, Expression::Frown, Expression::EyesClosed];

    pub const fn name(self) -> &'static str {
        match self {
            Expression::Smile => "smile",
            Expression::Frown => "frown",
            Expression::EyesClosed => "eyes-closed",
        }
    }

    pub fn from_name(name: &str) -> Option<Expression> {
        Expression::ALL.into_iter().find(|e| e.name() == name)
    }

    /// Mesh-space offset for landmark `index`, zero when untouched.
    pub fn offset(self, index: usize) -> Vec3 {
        let [left_corner, right_corner] = MOUTH_CORNERS;
        match self {
            Expression::Smile if index == left_corner => Vec3::new(-SMILE_SPREAD, SMILE_LIFT, 0.0),
            Expression::Smile if index == right_corner => Vec3::new(SMILE_SPREAD, SMILE_LIFT, 0.0),
            Expression::Frown if MOUTH_CORNERS.contains(&index) => Vec3::new(0.0, -FROWN_DROP, 0.0),
            Expression::Frown
                if LEFT_EYEBROW.contains(&index) || RIGHT_EYEBROW.contains(&index) =>
            {
                Vec3::new(0.0, FROWN_BROW_SHIFT, 0.0)
            }
            // Even-numbered contour points stand in for the upper lid.
            Expression::EyesClosed
                if index % 2 == 0 && (LEFT_EYE.contains(&index) || RIGHT_EYE.contains(&index)) =>
            {
                Vec3::new(0.0, EYES_CLOSED_LID_SHIFT, 0.0)
            }
            _ => Vec3::ZERO,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MorphTarget {
    pub expression: Expression,
    pub positions: Vec<Vec3>,
}

impl MorphTarget {
    pub fn name(&self) -> &'static str {
        self.expression.name()
    }

    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }
}

/// One expression applied to already projected base positions.
pub fn morph_positions(base: &[Vec3], expression: Expression) -> Vec<Vec3> {
    base.iter()
        .enumerate()
        .map(|(i, &p)| p + expression.offset(i))
        .collect()
}

pub fn synthesize_expression(landmarks: &LandmarkSet, expression: Expression) -> MorphTarget {
    MorphTarget {
        expression,
        positions: morph_positions(&landmarks.projected_positions(), expression),
    }
}

/// Every supported expression, in [`Expression::ALL`] order.
pub fn synthesize_morph_targets(landmarks: &LandmarkSet) -> Vec<MorphTarget> {
    let base = landmarks.projected_positions();
    Expression::ALL
        .into_iter()
        .map(|expression| MorphTarget {
            expression,
            positions: morph_positions(&base, expression),
        })
        .collect()
}

/// `base + Σ wᵢ (targetᵢ - base)` for hosts that blend on the CPU. Targets
/// whose length differs from `base` are ignored; missing weights count as 0.
pub fn blend_positions(base: &[Vec3], targets: &[MorphTarget], weights: &[f32]) -> Vec<Vec3> {
    let mut out = base.to_vec();
    for (target, &w) in targets.iter().zip(weights) {
        if w == 0.0 || target.positions.len() != base.len() {
            continue;
        }
        for ((o, &b), &t) in out.iter_mut().zip(base).zip(&target.positions) {
            *o += (t - b) * w;
        }
    }
    out
}
