// Expression morph targets.

use facesim_core::constants::{
    EYES_CLOSED_LID_SHIFT, FROWN_BROW_SHIFT, FROWN_DROP, SMILE_LIFT, SMILE_SPREAD,
};
use facesim_core::{
    blend_positions, neutral_face, synthesize_expression, synthesize_morph_targets, Expression,
    LandmarkSet, LEFT_EYE, LEFT_EYEBROW, RIGHT_EYE, RIGHT_EYEBROW,
};
use glam::Vec3;

fn set() -> LandmarkSet {
    LandmarkSet::new(neutral_face()).expect("neutral face is complete")
}

fn close(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-6
}

#[test]
fn every_target_matches_base_length() {
    let set = set();
    let base = set.projected_positions();
    let targets = synthesize_morph_targets(&set);
    let names: Vec<_> = targets.iter().map(|t| t.name()).collect();
    assert_eq!(names, ["smile", "frown", "eyes-closed"]);
    for t in &targets {
        assert_eq!(t.positions.len(), base.len());
        assert_eq!(t.positions_flat().len(), base.len() * 3);
    }
}

#[test]
fn smile_lifts_and_spreads_mouth_corners() {
    let set = set();
    let base = set.projected_positions();
    let smile = synthesize_expression(&set, Expression::Smile);
    assert!(close(
        smile.positions[61],
        base[61] + Vec3::new(-SMILE_SPREAD, SMILE_LIFT, 0.0)
    ));
    assert!(close(
        smile.positions[291],
        base[291] + Vec3::new(SMILE_SPREAD, SMILE_LIFT, 0.0)
    ));
    let moved = (0..base.len())
        .filter(|&i| smile.positions[i] != base[i])
        .count();
    assert_eq!(moved, 2, "only the mouth corners move");
}

#[test]
fn frown_drops_corners_and_shifts_brows() {
    let set = set();
    let base = set.projected_positions();
    let frown = synthesize_expression(&set, Expression::Frown);
    for i in [61, 291] {
        assert!(close(frown.positions[i], base[i] - Vec3::Y * FROWN_DROP));
    }
    for &i in LEFT_EYEBROW.iter().chain(RIGHT_EYEBROW) {
        assert!(close(frown.positions[i], base[i] + Vec3::Y * FROWN_BROW_SHIFT));
    }
    assert_eq!(frown.positions[1], base[1]);
}

#[test]
fn eyes_closed_moves_even_eye_indices_only() {
    let set = set();
    let base = set.projected_positions();
    let closed = synthesize_expression(&set, Expression::EyesClosed);
    for &i in LEFT_EYE.iter().chain(RIGHT_EYE) {
        let expected = if i % 2 == 0 {
            base[i] + Vec3::Y * EYES_CLOSED_LID_SHIFT
        } else {
            base[i]
        };
        assert!(close(closed.positions[i], expected), "eye landmark {i}");
    }
}

#[test]
fn expression_names_round_trip() {
    for e in Expression::ALL {
        assert_eq!(Expression::from_name(e.name()), Some(e));
    }
    assert_eq!(Expression::from_name("wink"), None);
}

#[test]
fn blend_interpolates_between_base_and_target() {
    let set = set();
    let base = set.projected_positions();
    let targets = synthesize_morph_targets(&set);

    assert_eq!(blend_positions(&base, &targets, &[0.0, 0.0, 0.0]), base);
    let full = blend_positions(&base, &targets, &[1.0]);
    assert!(full.iter().zip(&targets[0].positions).all(|(a, b)| close(*a, *b)));

    let half = blend_positions(&base, &targets, &[0.5]);
    assert!(close(half[61], base[61] + Vec3::new(-SMILE_SPREAD, SMILE_LIFT, 0.0) * 0.5));
}
