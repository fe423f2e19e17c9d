// Frame orchestration: identity cache, live uniforms, state machine.

use facesim_core::constants::{LANDMARK_COUNT, PRESET_INTENSITY};
use facesim_core::*;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

fn frame(landmarks: Option<&LandmarkSet>) -> FrameInput<'_> {
    FrameInput {
        landmarks,
        dt: FRAME,
        viewport: Viewport::new(1280, 720),
    }
}

fn face() -> LandmarkSet {
    LandmarkSet::new(neutral_face()).expect("neutral face is complete")
}

#[test]
fn absent_landmarks_mean_no_geometry() {
    let mut orch = Orchestrator::default();
    let f = orch.tick(frame(None));
    assert_eq!(f.mesh.vertex_count(), 0);
    assert!(f.morph_targets.is_empty());
    assert!(!f.tracking_present);
    assert_eq!(f.state, TrackingState::Idle);
}

#[test]
fn mesh_is_rebuilt_only_when_identity_changes() {
    let mut orch = Orchestrator::default();
    let a = face();

    let f = orch.tick(frame(Some(&a)));
    assert!(f.mesh_rebuilt);
    assert_eq!(f.mesh.vertex_count(), LANDMARK_COUNT);
    assert_eq!(f.morph_targets.len(), 3);

    assert!(!orch.tick(frame(Some(&a))).mesh_rebuilt);
    let clone = a.clone();
    assert!(!orch.tick(frame(Some(&clone))).mesh_rebuilt, "clones share identity");

    // identical coordinates, new identity
    let b = face();
    assert!(orch.tick(frame(Some(&b))).mesh_rebuilt);
}

#[test]
fn losing_the_face_clears_the_cache() {
    let mut orch = Orchestrator::default();
    let a = face();
    orch.tick(frame(Some(&a)));

    let f = orch.tick(frame(None));
    assert!(f.mesh_rebuilt);
    assert!(f.mesh.is_empty());
    assert!(!f.tracking_present);
    assert!(!orch.tick(frame(None)).mesh_rebuilt);

    let f = orch.tick(frame(Some(&a)));
    assert!(f.mesh_rebuilt, "same set is rebuilt after the key was cleared");
    assert_eq!(f.mesh.vertex_count(), LANDMARK_COUNT);
}

#[test]
fn elapsed_time_accumulates_into_the_live_uniform() {
    let mut orch = Orchestrator::default();
    orch.handle(ControlEvent::SelectTreatment(TreatmentKind::Laser));
    for _ in 0..10 {
        orch.tick(frame(None));
    }
    let f = orch.tick(frame(None));
    assert!((f.elapsed_time - 0.176).abs() < 1e-9);
    let t = f.uniforms.get_f32(U_ELAPSED_TIME).expect("laser uses time");
    assert!((t - 0.176).abs() < 1e-5);
    // descriptor keeps its default
    assert_eq!(f.material.uniforms.get_f32(U_ELAPSED_TIME), Some(0.0));
}

#[test]
fn intensity_changes_do_not_rebuild_the_material() {
    let mut orch = Orchestrator::default();
    orch.handle(ControlEvent::SelectTreatment(TreatmentKind::Filler));
    assert!(orch.tick(frame(None)).material_rebuilt);
    assert!(!orch.tick(frame(None)).material_rebuilt);

    orch.handle(ControlEvent::SetIntensity(0.8));
    assert_eq!(orch.uniforms().get_f32(U_INTENSITY), Some(0.8));
    let f = orch.tick(frame(None));
    assert!(!f.material_rebuilt);
    assert_eq!(f.uniforms.get_f32(U_INTENSITY), Some(0.8));

    let same_kind = TreatmentSelection::new(Treatment::preset(TreatmentKind::Filler), 0.3);
    orch.handle(ControlEvent::SetSelection(same_kind));
    let f = orch.tick(frame(None));
    assert!(!f.material_rebuilt);
    assert_eq!(f.uniforms.get_f32(U_INTENSITY), Some(0.3));
}

#[test]
fn out_of_range_intensity_is_clamped() {
    let mut orch = Orchestrator::default();
    orch.handle(ControlEvent::SelectTreatment(TreatmentKind::SkinImprovement));
    orch.handle(ControlEvent::SetIntensity(-0.4));
    assert_eq!(orch.tick(frame(None)).uniforms.get_f32(U_INTENSITY), Some(0.0));
    orch.handle(ControlEvent::SetIntensity(1.7));
    assert_eq!(orch.tick(frame(None)).uniforms.get_f32(U_INTENSITY), Some(1.0));
}

#[test]
fn switching_treatments_replaces_the_uniform_set() {
    let mut orch = Orchestrator::default();
    orch.handle(ControlEvent::SelectTreatment(TreatmentKind::Filler));
    let f = orch.tick(frame(None));
    assert_eq!(f.uniforms.get_f32(U_INTENSITY), Some(PRESET_INTENSITY));
    assert!(f.uniforms.contains(U_TARGET_POINT));

    orch.handle(ControlEvent::SelectTreatment(TreatmentKind::Laser));
    let f = orch.tick(frame(None));
    assert!(f.material_rebuilt);
    assert_eq!(f.material.kind, TreatmentKind::Laser);
    assert!(!f.uniforms.contains(U_TARGET_POINT));
    assert!(!f.uniforms.contains(U_TARGET_RADIUS));
    assert!(f.uniforms.contains(U_LASER_POSITION));

    orch.handle(ControlEvent::SelectTreatment(TreatmentKind::None));
    let f = orch.tick(frame(None));
    assert_eq!(f.material.kind, TreatmentKind::None);
    assert_eq!(orch.selection().intensity, 0.0);
}

#[test]
fn state_machine_follows_tracking_and_treatment() {
    let mut orch = Orchestrator::default();
    let a = face();
    assert_eq!(orch.tick(frame(None)).state, TrackingState::Idle);
    assert_eq!(
        orch.tick(frame(Some(&a))).state,
        TrackingState::TrackingNoTreatment
    );
    orch.handle(ControlEvent::SelectTreatment(TreatmentKind::Filler));
    assert_eq!(
        orch.tick(frame(Some(&a))).state,
        TrackingState::TrackingTreatmentActive
    );
    assert!(orch.tracking_present());
    assert_eq!(orch.tick(frame(None)).state, TrackingState::Idle);
    assert!(!orch.tracking_present());
    assert_eq!(TrackingState::TrackingTreatmentActive.as_str(), "tracking-treatment-active");
}

#[test]
fn viewport_drives_the_transform_scale() {
    let mut orch = Orchestrator::default();
    let f = orch.tick(FrameInput {
        landmarks: None,
        dt: FRAME,
        viewport: Viewport::new(1920, 1080),
    });
    assert!((f.viewport_aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    assert_eq!(f.transform_scale.y, 1.0);
    assert_eq!(f.transform_scale.x, f.viewport_aspect_ratio);

    let f = orch.tick(FrameInput {
        landmarks: None,
        dt: FRAME,
        viewport: Viewport::new(800, 0),
    });
    assert_eq!(f.viewport_aspect_ratio, 1.0);
}

#[test]
fn flat_only_support_falls_back_to_the_flat_material() {
    let mut orch = Orchestrator::new(SimulatorConfig {
        shader_support: ShaderSupport::FlatOnly,
        ..SimulatorConfig::default()
    });
    let a = face();
    orch.handle(ControlEvent::SelectTreatment(TreatmentKind::Laser));
    let f = orch.tick(frame(Some(&a)));
    assert_eq!(f.material.kind, TreatmentKind::None);
    assert!(!f.material.procedural);
    assert_eq!(f.state, TrackingState::TrackingNoTreatment);

    orch.handle(ControlEvent::SetShaderSupport(ShaderSupport::Procedural));
    let f = orch.tick(frame(Some(&a)));
    assert!(f.material_rebuilt);
    assert_eq!(f.material.kind, TreatmentKind::Laser);
    assert_eq!(f.state, TrackingState::TrackingTreatmentActive);
}

#[test]
fn custom_presets_come_from_the_config() {
    let spot = TargetSpot::new(glam::Vec2::new(0.3, 0.6), 0.1);
    let mut orch = Orchestrator::new(SimulatorConfig {
        filler_preset: spot,
        preset_intensity: 0.9,
        ..SimulatorConfig::default()
    });
    orch.handle(ControlEvent::SelectTreatment(TreatmentKind::Filler));
    let f = orch.tick(frame(None));
    assert_eq!(f.uniforms.get_vec2(U_TARGET_POINT), Some(spot.center));
    assert_eq!(f.uniforms.get_f32(U_TARGET_RADIUS), Some(0.1));
    assert_eq!(f.uniforms.get_f32(U_INTENSITY), Some(0.9));
}

#[test]
fn zone_targeting_moves_the_spot_to_the_zone() {
    let mut orch = Orchestrator::default();
    let a = face();
    orch.handle(ControlEvent::SelectTreatment(TreatmentKind::Filler));
    orch.tick(frame(Some(&a)));

    let expected = zone_target(&a, Region::LeftCheek).expect("cheek has landmarks");
    orch.handle(ControlEvent::TargetZone(Region::LeftCheek));
    let f = orch.tick(frame(Some(&a)));
    assert!(f.material_rebuilt);
    assert_eq!(f.uniforms.get_vec2(U_TARGET_POINT), Some(expected.center));
    assert_eq!(f.uniforms.get_f32(U_TARGET_RADIUS), Some(expected.radius));
    assert_eq!(f.uniforms.get_f32(U_INTENSITY), Some(PRESET_INTENSITY));

    orch.handle(ControlEvent::SelectTreatment(TreatmentKind::Laser));
    orch.tick(frame(Some(&a)));
    let forehead = zone_target(&a, Region::Forehead).expect("forehead has landmarks");
    orch.handle(ControlEvent::TargetZone(Region::Forehead));
    let f = orch.tick(frame(Some(&a)));
    assert_eq!(f.uniforms.get_vec2(U_LASER_POSITION), Some(forehead.center));
}

#[test]
fn zone_targeting_needs_a_face_and_a_placed_treatment() {
    let mut orch = Orchestrator::default();
    orch.handle(ControlEvent::SelectTreatment(TreatmentKind::Filler));
    orch.tick(frame(None));
    orch.handle(ControlEvent::TargetZone(Region::Forehead));
    let f = orch.tick(frame(None));
    assert!(!f.material_rebuilt);
    assert_eq!(
        f.uniforms.get_vec2(U_TARGET_POINT),
        Some(TargetSpot::filler_preset().center)
    );

    let a = face();
    orch.handle(ControlEvent::SelectTreatment(TreatmentKind::SkinImprovement));
    orch.tick(frame(Some(&a)));
    orch.handle(ControlEvent::TargetZone(Region::Forehead));
    assert!(!orch.tick(frame(Some(&a))).material_rebuilt);
    assert_eq!(orch.selection().treatment, Treatment::SkinImprovement);
}

#[test]
fn laser_alone_carries_an_overlay() {
    let mut orch = Orchestrator::default();
    assert!(orch.tick(frame(None)).overlay.is_none());
    orch.handle(ControlEvent::SelectTreatment(TreatmentKind::Filler));
    assert!(orch.tick(frame(None)).overlay.is_none());

    orch.handle(ControlEvent::SelectTreatment(TreatmentKind::Laser));
    orch.handle(ControlEvent::SetIntensity(1.0));
    let f = orch.tick(frame(None));
    let overlay = f.overlay.expect("laser draws an overlay");
    assert!((overlay.opacity - 0.3).abs() < 1e-6);
    let expected = (f.elapsed_time.sin() as f32) * 0.1;
    assert!((overlay.rotation - expected).abs() < 1e-6);
    assert!(overlay.additive);
}
