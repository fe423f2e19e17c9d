// Region registry and treatment zone targeting.

use facesim_core::constants::{LANDMARK_COUNT, MAX_TARGET_RADIUS, MIN_TARGET_RADIUS};
use facesim_core::*;

#[test]
fn all_indices_are_valid_landmarks() {
    for region in Region::ALL {
        assert!(!region.indices().is_empty(), "{} is empty", region.name());
        for &i in region.indices() {
            assert!(i < LANDMARK_COUNT, "{} holds {i}", region.name());
        }
    }
}

#[test]
fn contours_do_not_repeat_points() {
    for region in Region::ALL.into_iter().filter(|r| r.is_contour()) {
        let idx = region.indices();
        for (k, i) in idx.iter().enumerate() {
            assert!(!idx[k + 1..].contains(i), "{} repeats {i}", region.name());
        }
    }
}

#[test]
fn names_resolve_to_the_same_lists() {
    for region in Region::ALL {
        assert_eq!(Region::from_name(region.name()), Some(region));
        assert_eq!(region_indices(region.name()), Some(region.indices()));
    }
    assert_eq!(region_indices("face-outline"), Some(FACE_OUTLINE));
    assert_eq!(region_indices("ears"), None);
}

#[test]
fn overlapping_regions_share_vertices() {
    assert!(FOREHEAD.iter().all(|i| FACE_OUTLINE.contains(i)));
    assert!(JAWLINE.iter().all(|i| FACE_OUTLINE.contains(i)));
}

#[test]
fn zone_targets_cover_their_landmarks() {
    let set = LandmarkSet::new(neutral_face()).expect("neutral face is complete");
    for region in [Region::Forehead, Region::LeftCheek, Region::NasolabialFolds] {
        let spot = zone_target(&set, region).expect("zone has landmarks");
        assert!(spot.center.cmpge(glam::Vec2::ZERO).all() && spot.center.cmple(glam::Vec2::ONE).all());
        assert!((MIN_TARGET_RADIUS..=MAX_TARGET_RADIUS).contains(&spot.radius));
        for &i in region.indices() {
            let uv = set.points()[i].uv();
            assert!(uv.distance(spot.center) <= spot.radius + 1e-5);
        }
    }
}

#[test]
fn landmark_sets_reject_bad_frames() {
    assert_eq!(
        LandmarkSet::new(vec![Landmark::default(); 10]).unwrap_err(),
        LandmarkError::WrongCount {
            expected: LANDMARK_COUNT,
            actual: 10
        }
    );
    let mut points = neutral_face();
    points[5].y = f32::NAN;
    assert_eq!(
        LandmarkSet::new(points).unwrap_err(),
        LandmarkError::NonFinite { index: 5 }
    );
    assert_eq!(
        LandmarkSet::from_flat(&[0.0; 7]).unwrap_err(),
        LandmarkError::RaggedBuffer(7)
    );
    let flat: Vec<f32> = neutral_face().iter().flat_map(|l| [l.x, l.y, l.z]).collect();
    assert_eq!(LandmarkSet::from_flat(&flat).map(|s| s.len()), Ok(LANDMARK_COUNT));
}
