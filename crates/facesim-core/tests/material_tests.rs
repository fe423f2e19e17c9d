// Treatment material descriptors and the CPU mirrors of the shader math.

use facesim_core::constants::*;
use facesim_core::*;
use glam::Vec2;

fn filler(intensity: f32) -> TreatmentSelection {
    TreatmentSelection::new(Treatment::preset(TreatmentKind::Filler), intensity)
}

fn laser(intensity: f32) -> TreatmentSelection {
    TreatmentSelection::new(Treatment::preset(TreatmentKind::Laser), intensity)
}

#[test]
fn intensity_is_clamped_into_unit_range() {
    let low = build_material(&filler(-0.4));
    let high = build_material(&filler(1.7));
    assert_eq!(low.uniforms.get_f32(U_INTENSITY), Some(0.0));
    assert_eq!(high.uniforms.get_f32(U_INTENSITY), Some(1.0));
    let nan = build_material(&filler(f32::NAN));
    assert_eq!(nan.uniforms.get_f32(U_INTENSITY), Some(0.0));
}

#[test]
fn bypassing_the_constructor_is_still_clamped() {
    let raw = TreatmentSelection {
        treatment: Treatment::SkinImprovement,
        intensity: 3.0,
    };
    let m = build_material(&raw);
    assert_eq!(m.uniforms.get_f32(U_INTENSITY), Some(1.0));
}

#[test]
fn filler_influence_falls_off_to_zero_at_the_radius() {
    let c = Vec2::new(0.5, 0.5);
    let r = 0.25;
    assert_eq!(radial_influence(c, c, r), 1.0);
    assert_eq!(radial_influence(c + Vec2::new(r, 0.0), c, r), 0.0);
    assert_eq!(radial_influence(c + Vec2::new(0.0, r * 2.0), c, r), 0.0);
    let half = radial_influence(c + Vec2::new(r * 0.5, 0.0), c, r);
    assert!(half > 0.0 && half < 1.0, "influence at half radius was {half}");
}

#[test]
fn laser_pulse_oscillates_around_one_half() {
    assert_eq!(laser_pulse(0.0), 0.5);
    assert!((laser_pulse(std::f32::consts::PI / 20.0) - 1.0).abs() < 1e-6);
    for i in 0..100 {
        let p = laser_pulse(i as f32 * 0.037);
        assert!((0.0..=1.0).contains(&p));
    }
}

#[test]
fn blend_helpers_use_the_tuning_constants() {
    assert!((filler_tint_amount(1.0, 1.0) - FILLER_TINT_WEIGHT).abs() < 1e-6);
    assert_eq!(laser_treated_amount(0.5, 1.0, 0.5), 0.25);
    assert!((laser_glow_amount(1.0, 0.5) - 0.5 * LASER_GLOW_WEIGHT).abs() < 1e-6);
    assert_eq!(skin_smoothing(1.0), SKIN_SMOOTHING_WEIGHT);
    assert_eq!(smoothstep(0.5, 0.5, 0.4), 0.0);
    assert_eq!(smoothstep(0.5, 0.5, 0.5), 1.0);
}

#[test]
fn flat_material_has_no_time_dependence() {
    let m = flat_material();
    assert_eq!(m.kind, TreatmentKind::None);
    assert!(!m.procedural);
    assert!(!m.is_time_dependent());
    assert!(!m.uniforms.contains(U_INTENSITY));
    assert_eq!(m.uniforms.get_vec3(U_BASE_COLOR), Some(SKIN_TONE));
    assert_eq!(m.uniforms.get_f32(U_OPACITY), Some(0.9));
    assert!(m.surface.transparent && m.surface.double_sided);
}

#[test]
fn switching_filler_to_laser_leaks_no_filler_uniforms() {
    let f = build_material(&filler(0.5));
    assert!(f.uniforms.contains(U_TARGET_POINT));
    assert!(f.uniforms.contains(U_TARGET_RADIUS));

    let l = build_material(&laser(0.5));
    assert!(!l.uniforms.contains(U_TARGET_POINT));
    assert!(!l.uniforms.contains(U_TARGET_RADIUS));
    assert_eq!(l.uniforms.get_vec2(U_LASER_POSITION), Some(LASER_PRESET_CENTER));
    assert_eq!(l.uniforms.get_f32(U_LASER_RADIUS), Some(LASER_PRESET_RADIUS));
    assert!(l.is_time_dependent());
}

#[test]
fn building_is_pure() {
    for kind in TreatmentKind::ALL {
        let sel = TreatmentSelection::new(Treatment::preset(kind), 0.7);
        assert_eq!(build_material(&sel), build_material(&sel), "{kind}");
    }
}

#[test]
fn flat_only_devices_get_the_flat_material() {
    for kind in TreatmentKind::ALL {
        let sel = TreatmentSelection::new(Treatment::preset(kind), 0.7);
        let m = build_material_for(&sel, ShaderSupport::FlatOnly);
        assert_eq!(m, flat_material());
    }
    let m = build_material_for(&laser(0.7), ShaderSupport::Procedural);
    assert_eq!(m.kind, TreatmentKind::Laser);
}

#[test]
fn spatial_parameters_are_sanitized() {
    let spot = TargetSpot::new(Vec2::new(f32::NAN, 0.2), f32::NAN);
    let m = filler_material(spot, 0.5);
    assert_eq!(m.uniforms.get_vec2(U_TARGET_POINT), Some(FILLER_PRESET_CENTER));
    assert_eq!(m.uniforms.get_f32(U_TARGET_RADIUS), Some(MIN_TARGET_RADIUS));

    let m = laser_material(TargetSpot::new(Vec2::new(1.5, -0.2), -1.0), 0.5);
    assert_eq!(m.uniforms.get_vec2(U_LASER_POSITION), Some(Vec2::new(1.0, 0.0)));
    assert_eq!(m.uniforms.get_f32(U_LASER_RADIUS), Some(MIN_TARGET_RADIUS));

    let m = laser_material(TargetSpot::new(Vec2::splat(0.5), 4.0), 0.5);
    assert_eq!(m.uniforms.get_f32(U_LASER_RADIUS), Some(MAX_TARGET_RADIUS));
}

#[test]
fn sources_carry_entry_points_and_tuning_constants() {
    for kind in TreatmentKind::ALL {
        let sel = TreatmentSelection::new(Treatment::preset(kind), 0.5);
        let m = build_material(&sel);
        assert!(m.vertex_source.contains("fn vs_main"));
        assert!(m.fragment_source.contains("fn fs_main"));
        assert_eq!(m.vertex_entry, VERTEX_ENTRY);
        assert_eq!(m.fragment_entry, FRAGMENT_ENTRY);
        assert!(m.fragment_source.contains("const AMBIENT_LIGHT: f32 = 0.4;"));
    }
    let f = build_material(&filler(0.5));
    assert!(f
        .fragment_source
        .contains("const FILLER_TINT_WEIGHT: f32 = 0.3;"));
    assert!(f
        .fragment_source
        .contains("const FILLER_TINT: vec3<f32> = vec3<f32>(1.0, 0.9, 0.88);"));
    let l = build_material(&laser(0.5));
    assert!(l
        .fragment_source
        .contains("const LASER_PULSE_FREQUENCY: f32 = 10.0;"));
    assert!(!l.fragment_source.contains("FILLER_TINT"));
}

#[test]
fn uniforms_only_update_declared_names() {
    let mut u = build_material(&filler(0.5)).uniforms;
    assert!(u.set(U_INTENSITY, UniformValue::Float(0.8)));
    assert_eq!(u.get_f32(U_INTENSITY), Some(0.8));
    let before = u.len();
    assert!(!u.set(U_LASER_RADIUS, UniformValue::Float(0.2)));
    assert_eq!(u.len(), before);
    assert_eq!(u.get_vec2(U_INTENSITY), None, "wrong type reads as absent");
}

#[test]
fn uniform_block_matches_the_wgsl_layout() {
    assert_eq!(std::mem::size_of::<TreatmentUniformBlock>(), 48);

    let block = TreatmentUniformBlock::pack(&build_material(&filler(0.5)).uniforms);
    assert_eq!(block.target_uv, [0.5, 0.4]);
    assert_eq!(block.radius, FILLER_PRESET_RADIUS);
    assert_eq!(block.intensity, 0.5);
    assert_eq!(block.opacity, SKIN_OPACITY);
    assert_eq!(block.base_color[3], SKIN_OPACITY);

    let block = TreatmentUniformBlock::pack(&build_material(&laser(0.25)).uniforms);
    assert_eq!(block.target_uv, [0.5, 0.3]);
    assert_eq!(block.radius, LASER_PRESET_RADIUS);

    let block = TreatmentUniformBlock::pack(&flat_material().uniforms);
    assert_eq!(block.intensity, 0.0);
    assert!(block.radius > 0.0);
    assert_eq!(bytemuck::bytes_of(&block).len(), 48);
}

#[test]
fn treatment_kinds_parse_from_host_names() {
    for kind in TreatmentKind::ALL {
        assert_eq!(kind.as_str().parse::<TreatmentKind>(), Ok(kind));
    }
    assert_eq!(" Laser ".parse::<TreatmentKind>(), Ok(TreatmentKind::Laser));
    assert_eq!("skin".parse::<TreatmentKind>(), Ok(TreatmentKind::SkinImprovement));
    assert!("botox".parse::<TreatmentKind>().is_err());
}

#[test]
fn constant_prelude_has_one_declaration_per_line() {
    let m = build_material(&TreatmentSelection::none());
    assert!(m
        .vertex_source
        .starts_with("const AMBIENT_LIGHT: f32 = 0.4;\nconst DIFFUSE_LIGHT: f32 = 0.6;\n"));
}

#[test]
fn every_material_uses_the_skin_surface() {
    for kind in TreatmentKind::ALL {
        let m = build_material(&TreatmentSelection::new(Treatment::preset(kind), 0.5));
        assert_eq!(m.surface.roughness, SKIN_ROUGHNESS);
        assert_eq!(m.surface.metalness, SKIN_METALNESS);
        assert!(m.surface.transparent && m.surface.double_sided);
    }
}
