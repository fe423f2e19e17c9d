// Tuning constants and their relationships.

use facesim_core::constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn blend_weights_stay_within_unit_range() {
    assert!(FILLER_TINT_WEIGHT > 0.0 && FILLER_TINT_WEIGHT <= 1.0);
    assert!(LASER_GLOW_WEIGHT > 0.0 && LASER_GLOW_WEIGHT <= 1.0);
    assert!(SKIN_SMOOTHING_WEIGHT > 0.0 && SKIN_SMOOTHING_WEIGHT <= 1.0);
    assert!(SKIN_NOISE_LOW_WEIGHT >= 0.0 && SKIN_NOISE_LOW_WEIGHT <= 1.0);
    // full lighting never exceeds the base colour
    assert!(AMBIENT_LIGHT + DIFFUSE_LIGHT <= 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn presets_lie_inside_the_clamps() {
    for r in [FILLER_PRESET_RADIUS, LASER_PRESET_RADIUS] {
        assert!((MIN_TARGET_RADIUS..=MAX_TARGET_RADIUS).contains(&r));
    }
    for c in [FILLER_PRESET_CENTER, LASER_PRESET_CENTER] {
        assert!(c.x >= 0.0 && c.x <= 1.0 && c.y >= 0.0 && c.y <= 1.0);
    }
    assert!(PRESET_INTENSITY > 0.0 && PRESET_INTENSITY <= 1.0);
    assert!(MIN_TARGET_RADIUS > 0.0, "radius is a smoothstep edge");
}

#[test]
fn morph_offsets_are_small_relative_to_the_face() {
    for offset in [
        SMILE_LIFT,
        SMILE_SPREAD,
        FROWN_DROP,
        FROWN_BROW_SHIFT,
        EYES_CLOSED_LID_SHIFT,
    ] {
        assert!(offset > 0.0 && offset < 0.1 * POSITION_SCALE);
    }
    assert!(MOUTH_CORNERS.iter().all(|&i| i < LANDMARK_COUNT));
}

#[test]
fn skin_tone_is_a_valid_colour() {
    assert!(SKIN_TONE.cmpge(glam::Vec3::ZERO).all() && SKIN_TONE.cmple(glam::Vec3::ONE).all());
    assert!(SKIN_OPACITY > 0.0 && SKIN_OPACITY < 1.0);
}
