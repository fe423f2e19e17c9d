//! Screen-facing effect quads layered over the face mesh.

use crate::constants::{
    LASER_OVERLAY_COLOR, LASER_OVERLAY_OPACITY, LASER_OVERLAY_SIZE, LASER_OVERLAY_SWAY,
};
use crate::treatment::{clamp_intensity, TreatmentKind};
use glam::{Mat4, Vec2, Vec3};

/// Unlit quad centred at the mesh origin, facing the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayDescriptor {
    pub size: Vec2,
    pub color: Vec3,
    pub opacity: f32,
    /// Rotation about the view axis, radians.
    pub rotation: f32,
    pub additive: bool,
}

impl OverlayDescriptor {
    /// Quad corners in mesh space, counter-clockwise from bottom-left.
    pub fn corners(&self) -> [Vec3; 4] {
        let half = self.size * 0.5;
        let rot = Mat4::from_rotation_z(self.rotation);
        [
            Vec3::new(-half.x, -half.y, 0.0),
            Vec3::new(half.x, -half.y, 0.0),
            Vec3::new(half.x, half.y, 0.0),
            Vec3::new(-half.x, half.y, 0.0),
        ]
        .map(|c| rot.transform_point3(c))
    }
}

/// Red additive pulse shown while laser is selected. Opacity follows the
/// intensity; the quad sways about z with `sin(t)`.
pub fn laser_overlay(intensity: f32, elapsed_time: f64) -> OverlayDescriptor {
    OverlayDescriptor {
        size: Vec2::splat(LASER_OVERLAY_SIZE),
        color: LASER_OVERLAY_COLOR,
        opacity: clamp_intensity(intensity) * LASER_OVERLAY_OPACITY,
        rotation: (elapsed_time.sin() as f32) * LASER_OVERLAY_SWAY,
        additive: true,
    }
}

/// Overlay for the selected treatment, if it has one.
pub fn treatment_overlay(
    kind: TreatmentKind,
    intensity: f32,
    elapsed_time: f64,
) -> Option<OverlayDescriptor> {
    match kind {
        TreatmentKind::Laser => Some(laser_overlay(intensity, elapsed_time)),
        TreatmentKind::None | TreatmentKind::Filler | TreatmentKind::SkinImprovement => None,
    }
}
