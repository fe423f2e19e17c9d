// DOM control ids and parsing of their values. Kept free of web-sys so the
// mapping can be tested on the host.

use facesim_core::regions::Region;
use facesim_core::treatment::{clamp_intensity, TreatmentKind};
use std::time::Duration;

pub const TREATMENT_BUTTONS: [(&str, TreatmentKind); 4] = [
    ("treatment-none", TreatmentKind::None),
    ("treatment-filler", TreatmentKind::Filler),
    ("treatment-laser", TreatmentKind::Laser),
    ("treatment-skin", TreatmentKind::SkinImprovement),
];

pub const INTENSITY_INPUT: &str = "treatment-intensity";

pub const ACTIVE_CLASS: &str = "active";

pub fn button_for_treatment(kind: TreatmentKind) -> &'static str {
    TREATMENT_BUTTONS
        .iter()
        .find(|(_, k)| *k == kind)
        .map(|(button, _)| *button)
        .unwrap_or("treatment-none")
}

/// Range input value (`min=0 max=1`) to an intensity. Unparseable or
/// non-finite text is ignored rather than treated as zero.
pub fn parse_intensity(value: &str) -> Option<f32> {
    let v: f32 = value.trim().parse().ok()?;
    if v.is_finite() {
        Some(clamp_intensity(v))
    } else {
        None
    }
}

/// Text written back into the range input after a preset is applied.
pub fn format_intensity(intensity: f32) -> String {
    format!("{:.2}", clamp_intensity(intensity))
}

/// Zone name from the host (`"forehead"`, `"left-cheek"`, ...).
pub fn parse_zone(name: &str) -> Option<Region> {
    Region::from_name(name.trim())
}

/// Host frame delta in milliseconds. Negative or non-finite values, which
/// a paused or throttled tab can report, count as zero.
pub fn frame_duration(dt_ms: f64) -> Duration {
    Duration::try_from_secs_f64(dt_ms / 1000.0).unwrap_or_default()
}
