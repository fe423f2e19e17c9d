//! User-facing treatment selection.
//!
//! Everything here is clamped on construction so downstream shader
//! parameters can never be NaN or out of range.

use crate::constants::{
    FILLER_PRESET_CENTER, FILLER_PRESET_RADIUS, LASER_PRESET_CENTER, LASER_PRESET_RADIUS,
    MAX_TARGET_RADIUS, MIN_TARGET_RADIUS,
};
use crate::error::ParseTreatmentError;
use glam::Vec2;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreatmentKind {
    None,
    Filler,
    Laser,
    SkinImprovement,
}

impl TreatmentKind {
    pub const ALL: [TreatmentKind; 4] = [
        TreatmentKind::None,
        TreatmentKind::Filler,
        TreatmentKind::Laser,
        TreatmentKind::SkinImprovement,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            TreatmentKind::None => "none",
            TreatmentKind::Filler => "filler",
            TreatmentKind::Laser => "laser",
            TreatmentKind::SkinImprovement => "skin-improvement",
        }
    }
}

impl fmt::Display for TreatmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TreatmentKind {
    type Err = ParseTreatmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(TreatmentKind::None),
            "filler" => Ok(TreatmentKind::Filler),
            "laser" => Ok(TreatmentKind::Laser),
            "skin-improvement" | "skin_improvement" | "skin" => Ok(TreatmentKind::SkinImprovement),
            _ => Err(ParseTreatmentError(s.to_string())),
        }
    }
}

/// Circular area of effect in UV space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetSpot {
    pub center: Vec2,
    pub radius: f32,
}

impl TargetSpot {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Center clamped to the unit square, radius to
    /// `[MIN_TARGET_RADIUS, MAX_TARGET_RADIUS]` (NaN becomes the minimum).
    /// A non-finite center falls back to `fallback.center`.
    pub fn sanitized(self, fallback: TargetSpot) -> Self {
        let center = if self.center.is_finite() {
            self.center.clamp(Vec2::ZERO, Vec2::ONE)
        } else {
            fallback.center
        };
        let radius = if self.radius.is_nan() {
            MIN_TARGET_RADIUS
        } else {
            self.radius.clamp(MIN_TARGET_RADIUS, MAX_TARGET_RADIUS)
        };
        Self { center, radius }
    }

    pub fn filler_preset() -> Self {
        Self::new(FILLER_PRESET_CENTER, FILLER_PRESET_RADIUS)
    }

    pub fn laser_preset() -> Self {
        Self::new(LASER_PRESET_CENTER, LASER_PRESET_RADIUS)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Treatment {
    None,
    Filler(TargetSpot),
    Laser(TargetSpot),
    SkinImprovement,
}

impl Treatment {
    pub fn kind(&self) -> TreatmentKind {
        match self {
            Treatment::None => TreatmentKind::None,
            Treatment::Filler(_) => TreatmentKind::Filler,
            Treatment::Laser(_) => TreatmentKind::Laser,
            Treatment::SkinImprovement => TreatmentKind::SkinImprovement,
        }
    }

    /// Treatment with the default placement for `kind`.
    pub fn preset(kind: TreatmentKind) -> Self {
        match kind {
            TreatmentKind::None => Treatment::None,
            TreatmentKind::Filler => Treatment::Filler(TargetSpot::filler_preset()),
            TreatmentKind::Laser => Treatment::Laser(TargetSpot::laser_preset()),
            TreatmentKind::SkinImprovement => Treatment::SkinImprovement,
        }
    }

    pub fn spot(&self) -> Option<TargetSpot> {
        match self {
            Treatment::Filler(s) | Treatment::Laser(s) => Some(*s),
            Treatment::None | Treatment::SkinImprovement => None,
        }
    }

    pub fn sanitized(self) -> Self {
        match self {
            Treatment::Filler(s) => Treatment::Filler(s.sanitized(TargetSpot::filler_preset())),
            Treatment::Laser(s) => Treatment::Laser(s.sanitized(TargetSpot::laser_preset())),
            other => other,
        }
    }
}

#[inline]
pub fn clamp_intensity(intensity: f32) -> f32 {
    if intensity.is_nan() {
        0.0
    } else {
        intensity.clamp(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreatmentSelection {
    pub treatment: Treatment,
    pub intensity: f32,
}

impl TreatmentSelection {
    pub fn new(treatment: Treatment, intensity: f32) -> Self {
        Self {
            treatment: treatment.sanitized(),
            intensity: clamp_intensity(intensity),
        }
    }

    pub fn none() -> Self {
        Self::new(Treatment::None, 0.0)
    }

    pub fn kind(&self) -> TreatmentKind {
        self.treatment.kind()
    }

    /// Re-applies clamping; fields are public, so callers may have bypassed `new`.
    pub fn sanitized(self) -> Self {
        Self::new(self.treatment, self.intensity)
    }
}

impl Default for TreatmentSelection {
    fn default() -> Self {
        Self::none()
    }
}
