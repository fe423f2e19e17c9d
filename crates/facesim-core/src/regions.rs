//! Anatomical regions of the 468-point face landmark topology.
//!
//! Contours are listed in boundary order so they can be ear-clipped directly.
//! Lists overlap on purpose: the forehead and jawline zones reuse outline
//! points and the cheek zones reuse brow points, which keeps sub-meshes and
//! zone targets stitched to the same vertices.

use crate::constants::{MAX_TARGET_RADIUS, MIN_TARGET_RADIUS};
use crate::landmarks::LandmarkSet;
use crate::treatment::TargetSpot;
use glam::Vec2;

pub const FACE_OUTLINE: &[usize] = &[
    10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377, 152,
    148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109,
];

pub const LEFT_EYE: &[usize] = &[
    33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
];
pub const RIGHT_EYE: &[usize] = &[
    362, 398, 384, 385, 386, 387, 388, 466, 263, 249, 390, 373, 374, 380, 381, 382,
];

pub const LEFT_EYEBROW: &[usize] = &[70, 63, 105, 66, 107, 55, 65, 52, 53, 46];
pub const RIGHT_EYEBROW: &[usize] = &[300, 293, 334, 296, 336, 285, 295, 282, 283, 276];

// Membership list (bridge, tip, alae), not a contour.
pub const NOSE: &[usize] = &[
    1, 2, 5, 4, 6, 19, 20, 94, 125, 141, 235, 236, 237, 238, 239, 240, 241, 242,
];

pub const MOUTH_OUTER: &[usize] = &[
    61, 146, 91, 181, 84, 17, 314, 405, 321, 375, 291, 409, 270, 269, 267, 0, 37, 39, 40, 185,
];
pub const MOUTH_INNER: &[usize] = &[
    78, 191, 80, 81, 82, 13, 312, 311, 310, 415, 308, 324, 318, 402, 317, 14, 87, 178, 88, 95,
];

// Treatment zones
pub const FOREHEAD: &[usize] = &[10, 338, 297, 332, 284, 251, 21, 54, 103, 67, 109];
pub const LEFT_CHEEK: &[usize] = &[116, 117, 118, 119, 120, 121, 128, 245, 193, 55];
pub const RIGHT_CHEEK: &[usize] = &[345, 346, 347, 348, 349, 350, 357, 465, 417, 285];
pub const JAWLINE: &[usize] = &[
    152, 148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109, 10,
];
pub const NASOLABIAL_FOLDS: &[usize] = &[205, 50, 101, 36, 206, 425, 280, 330, 266, 426];
pub const CROWS_FEET: &[usize] = &[
    33, 246, 161, 160, 159, 158, 157, 173, 133, 362, 398, 384, 385, 386, 387, 388, 466, 263,
];
pub const GLABELLAR_LINES: &[usize] = &[9, 8, 168, 6, 197, 195, 5, 4];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    FaceOutline,
    LeftEye,
    RightEye,
    LeftEyebrow,
    RightEyebrow,
    Nose,
    MouthOuter,
    MouthInner,
    Forehead,
    LeftCheek,
    RightCheek,
    Jawline,
    NasolabialFolds,
    CrowsFeet,
    GlabellarLines,
}

impl Region {
    /// Areas a filler or laser spot can be placed on.
    pub const ZONES: [Region; 7] = [
        Region::Forehead,
        Region::LeftCheek,
        Region::RightCheek,
        Region::Jawline,
        Region::NasolabialFolds,
        Region::CrowsFeet,
        Region::GlabellarLines,
    ];

    pub const ALL: [Region; 15] = [
        Region::FaceOutline,
        Region::LeftEye,
        Region::RightEye,
        Region::LeftEyebrow,
        Region::RightEyebrow,
        Region::Nose,
        Region::MouthOuter,
        Region::MouthInner,
        Region::Forehead,
        Region::LeftCheek,
        Region::RightCheek,
        Region::Jawline,
        Region::NasolabialFolds,
        Region::CrowsFeet,
        Region::GlabellarLines,
    ];

    pub const fn indices(self) -> &'static [usize] {
        match self {
            Region::FaceOutline => FACE_OUTLINE,
            Region::LeftEye => LEFT_EYE,
            Region::RightEye => RIGHT_EYE,
            Region::LeftEyebrow => LEFT_EYEBROW,
            Region::RightEyebrow => RIGHT_EYEBROW,
            Region::Nose => NOSE,
            Region::MouthOuter => MOUTH_OUTER,
            Region::MouthInner => MOUTH_INNER,
            Region::Forehead => FOREHEAD,
            Region::LeftCheek => LEFT_CHEEK,
            Region::RightCheek => RIGHT_CHEEK,
            Region::Jawline => JAWLINE,
            Region::NasolabialFolds => NASOLABIAL_FOLDS,
            Region::CrowsFeet => CROWS_FEET,
            Region::GlabellarLines => GLABELLAR_LINES,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Region::FaceOutline => "face-outline",
            Region::LeftEye => "left-eye",
            Region::RightEye => "right-eye",
            Region::LeftEyebrow => "left-eyebrow",
            Region::RightEyebrow => "right-eyebrow",
            Region::Nose => "nose",
            Region::MouthOuter => "mouth-outer",
            Region::MouthInner => "mouth-inner",
            Region::Forehead => "forehead",
            Region::LeftCheek => "left-cheek",
            Region::RightCheek => "right-cheek",
            Region::Jawline => "jawline",
            Region::NasolabialFolds => "nasolabial-folds",
            Region::CrowsFeet => "crows-feet",
            Region::GlabellarLines => "glabellar-lines",
        }
    }

    pub fn from_name(name: &str) -> Option<Region> {
        Region::ALL.into_iter().find(|r| r.name() == name)
    }

    /// Regions whose index list is an ordered boundary that can be ear-clipped.
    pub const fn is_contour(self) -> bool {
        matches!(
            self,
            Region::FaceOutline
                | Region::LeftEye
                | Region::RightEye
                | Region::LeftEyebrow
                | Region::RightEyebrow
                | Region::MouthOuter
                | Region::MouthInner
        )
    }
}

/// Index list for an anatomical feature name such as `"left-eye"`.
pub fn region_indices(name: &str) -> Option<&'static [usize]> {
    Region::from_name(name).map(Region::indices)
}

/// Treatment spot covering a zone: UV centroid plus the farthest member's
/// distance from it, clamped to the valid radius range.
pub fn zone_target(landmarks: &LandmarkSet, region: Region) -> Option<TargetSpot> {
    let uvs: Vec<Vec2> = region
        .indices()
        .iter()
        .filter_map(|&i| landmarks.get(i))
        .map(|l| l.uv())
        .collect();
    if uvs.is_empty() {
        return None;
    }
    let centroid = uvs.iter().copied().sum::<Vec2>() / uvs.len() as f32;
    let radius = uvs
        .iter()
        .map(|uv| uv.distance(centroid))
        .fold(0.0_f32, f32::max)
        .clamp(MIN_TARGET_RADIUS, MAX_TARGET_RADIUS);
    Some(TargetSpot::new(centroid, radius))
}
