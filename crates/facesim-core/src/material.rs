//! Treatment material builder.
//!
//! A [`MaterialDescriptor`] is a renderer-agnostic shader program: WGSL
//! sources for both stages plus the default value of every uniform it reads.
//! Building is pure; the orchestrator keeps the live uniform values.
//!
//! Blend coefficients are Rust constants written into each fragment source
//! as WGSL `const` declarations, and the CPU helpers below evaluate the same
//! formulas so they can be checked without a GPU.

use crate::constants::*;
use crate::treatment::{clamp_intensity, TargetSpot, Treatment, TreatmentKind, TreatmentSelection};
use crate::{COMMON_WGSL, FACE_VS_WGSL, FILLER_FS_WGSL, FLAT_FS_WGSL, LASER_FS_WGSL, SKIN_FS_WGSL};
use glam::{Vec2, Vec3};
use smallvec::SmallVec;

pub const U_INTENSITY: &str = "intensity";
pub const U_ELAPSED_TIME: &str = "elapsed_time";
pub const U_BASE_COLOR: &str = "base_color";
pub const U_OPACITY: &str = "opacity";
pub const U_TARGET_POINT: &str = "target_point";
pub const U_TARGET_RADIUS: &str = "target_radius";
pub const U_LASER_POSITION: &str = "laser_position";
pub const U_LASER_RADIUS: &str = "laser_radius";

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Device capability reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShaderSupport {
    #[default]
    Procedural,
    FlatOnly,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
}

impl UniformValue {
    pub fn as_f32(self) -> Option<f32> {
        match self {
            UniformValue::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vec2(self) -> Option<Vec2> {
        match self {
            UniformValue::Vec2(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vec3(self) -> Option<Vec3> {
        match self {
            UniformValue::Vec3(v) => Some(v),
            _ => None,
        }
    }

    /// Component values, e.g. for handing to a JS host.
    pub fn components(&self) -> SmallVec<[f32; 3]> {
        match *self {
            UniformValue::Float(v) => SmallVec::from_slice(&[v]),
            UniformValue::Vec2(v) => SmallVec::from_slice(&v.to_array()),
            UniformValue::Vec3(v) => SmallVec::from_slice(&v.to_array()),
        }
    }
}

/// Name → value map in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Uniforms {
    entries: SmallVec<[(&'static str, UniformValue); 8]>,
}

impl Uniforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces `name`, returning the previous value.
    pub fn insert(&mut self, name: &'static str, value: UniformValue) -> Option<UniformValue> {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Overwrites an existing uniform; unknown names are ignored (returns false).
    pub fn set(&mut self, name: &str, value: UniformValue) -> bool {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    pub fn get_f32(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(UniformValue::as_f32)
    }

    pub fn get_vec2(&self, name: &str) -> Option<Vec2> {
        self.get(name).and_then(UniformValue::as_vec2)
    }

    pub fn get_vec3(&self, name: &str) -> Option<Vec3> {
        self.get(name).and_then(UniformValue::as_vec3)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| *n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, UniformValue)> + '_ {
        self.entries.iter().copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fixed-function surface state the host applies alongside the program.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceParams {
    pub transparent: bool,
    pub double_sided: bool,
    pub roughness: f32,
    pub metalness: f32,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            transparent: true,
            double_sided: true,
            roughness: SKIN_ROUGHNESS,
            metalness: SKIN_METALNESS,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDescriptor {
    pub kind: TreatmentKind,
    /// False for the flat skin material.
    pub procedural: bool,
    pub vertex_source: String,
    pub fragment_source: String,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
    pub uniforms: Uniforms,
    pub surface: SurfaceParams,
}

impl MaterialDescriptor {
    pub fn is_time_dependent(&self) -> bool {
        self.uniforms.contains(U_ELAPSED_TIME)
    }
}

// ---------------- CPU mirrors of the shader math ----------------

/// Hermite step with GLSL/WGSL semantics; a collapsed edge acts as a hard step.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// 1 at `center`, smoothly falling to exactly 0 at `radius` and beyond.
#[inline]
pub fn radial_influence(uv: Vec2, center: Vec2, radius: f32) -> f32 {
    1.0 - smoothstep(0.0, radius, uv.distance(center))
}

/// Oscillates in [0, 1]; 0.5 at t = 0.
#[inline]
pub fn laser_pulse(elapsed_time: f32) -> f32 {
    (elapsed_time * LASER_PULSE_FREQUENCY).sin() * 0.5 + 0.5
}

#[inline]
pub fn filler_tint_amount(influence: f32, intensity: f32) -> f32 {
    influence * intensity * FILLER_TINT_WEIGHT
}

#[inline]
pub fn laser_treated_amount(influence: f32, pulse: f32, intensity: f32) -> f32 {
    influence * pulse * intensity
}

#[inline]
pub fn laser_glow_amount(influence: f32, intensity: f32) -> f32 {
    influence * intensity * LASER_GLOW_WEIGHT
}

#[inline]
pub fn skin_smoothing(intensity: f32) -> f32 {
    intensity * SKIN_SMOOTHING_WEIGHT
}

// ---------------- WGSL assembly ----------------

fn wgsl_f32(v: f32) -> String {
    format!("{v:?}")
}

fn wgsl_vec3(v: Vec3) -> String {
    format!("vec3<f32>({:?}, {:?}, {:?})", v.x, v.y, v.z)
}

fn const_prelude(consts: &[(&str, String)]) -> String {
    consts
        .iter()
        .map(|(name, value)| {
            let ty = if value.starts_with("vec3") { "vec3<f32>" } else { "f32" };
            format!("const {name}: {ty} = {value};\n")
        })
        .collect()
}

fn lighting_consts() -> Vec<(&'static str, String)> {
    vec![
        ("AMBIENT_LIGHT", wgsl_f32(AMBIENT_LIGHT)),
        ("DIFFUSE_LIGHT", wgsl_f32(DIFFUSE_LIGHT)),
    ]
}

fn treatment_consts(kind: TreatmentKind) -> Vec<(&'static str, String)> {
    match kind {
        TreatmentKind::None => Vec::new(),
        TreatmentKind::Filler => vec![
            ("FILLER_TINT", wgsl_vec3(FILLER_TINT)),
            ("FILLER_TINT_WEIGHT", wgsl_f32(FILLER_TINT_WEIGHT)),
            ("FILLER_SPECULAR_WEIGHT", wgsl_f32(FILLER_SPECULAR_WEIGHT)),
            ("FILLER_SPECULAR_POWER", wgsl_f32(FILLER_SPECULAR_POWER)),
        ],
        TreatmentKind::Laser => vec![
            ("LASER_PULSE_FREQUENCY", wgsl_f32(LASER_PULSE_FREQUENCY)),
            ("LASER_NOISE_SCALE", wgsl_f32(LASER_NOISE_SCALE)),
            ("LASER_NOISE_STRENGTH", wgsl_f32(LASER_NOISE_STRENGTH)),
            ("LASER_TREATED_TINT", wgsl_vec3(LASER_TREATED_TINT)),
            ("LASER_TREATED_NOISE", wgsl_f32(LASER_TREATED_NOISE)),
            ("LASER_GLOW_COLOR", wgsl_vec3(LASER_GLOW_COLOR)),
            ("LASER_GLOW_WEIGHT", wgsl_f32(LASER_GLOW_WEIGHT)),
        ],
        TreatmentKind::SkinImprovement => vec![
            ("SKIN_NOISE_LOW", wgsl_f32(SKIN_NOISE_LOW)),
            ("SKIN_NOISE_HIGH", wgsl_f32(SKIN_NOISE_HIGH)),
            ("SKIN_NOISE_LOW_WEIGHT", wgsl_f32(SKIN_NOISE_LOW_WEIGHT)),
            ("SKIN_SMOOTHING_WEIGHT", wgsl_f32(SKIN_SMOOTHING_WEIGHT)),
            ("SKIN_BLEMISH_STRENGTH", wgsl_f32(SKIN_BLEMISH_STRENGTH)),
            ("SKIN_BRIGHTEN", wgsl_f32(SKIN_BRIGHTEN)),
            ("SKIN_HEALTHY_TINT", wgsl_vec3(SKIN_HEALTHY_TINT)),
            ("SKIN_HIGHLIGHT_WEIGHT", wgsl_f32(SKIN_HIGHLIGHT_WEIGHT)),
            ("SKIN_HIGHLIGHT_POWER", wgsl_f32(SKIN_HIGHLIGHT_POWER)),
        ],
    }
}

fn vertex_source() -> String {
    [const_prelude(&lighting_consts()).as_str(), COMMON_WGSL, FACE_VS_WGSL].concat()
}

fn fragment_source(kind: TreatmentKind) -> String {
    let mut consts = lighting_consts();
    consts.extend(treatment_consts(kind));
    let body = match kind {
        TreatmentKind::None => FLAT_FS_WGSL,
        TreatmentKind::Filler => FILLER_FS_WGSL,
        TreatmentKind::Laser => LASER_FS_WGSL,
        TreatmentKind::SkinImprovement => SKIN_FS_WGSL,
    };
    [const_prelude(&consts).as_str(), COMMON_WGSL, body].concat()
}

fn base_uniforms(intensity: Option<f32>) -> Uniforms {
    let mut u = Uniforms::new();
    u.insert(U_BASE_COLOR, UniformValue::Vec3(SKIN_TONE));
    u.insert(U_OPACITY, UniformValue::Float(SKIN_OPACITY));
    if let Some(intensity) = intensity {
        u.insert(U_INTENSITY, UniformValue::Float(clamp_intensity(intensity)));
        u.insert(U_ELAPSED_TIME, UniformValue::Float(0.0));
    }
    u
}

fn descriptor(kind: TreatmentKind, procedural: bool, uniforms: Uniforms) -> MaterialDescriptor {
    MaterialDescriptor {
        kind,
        procedural,
        vertex_source: vertex_source(),
        fragment_source: fragment_source(kind),
        vertex_entry: VERTEX_ENTRY,
        fragment_entry: FRAGMENT_ENTRY,
        uniforms,
        surface: SurfaceParams::default(),
    }
}

/// Constant skin tone, translucent, no time dependence.
pub fn flat_material() -> MaterialDescriptor {
    descriptor(TreatmentKind::None, false, base_uniforms(None))
}

pub fn filler_material(spot: TargetSpot, intensity: f32) -> MaterialDescriptor {
    let spot = spot.sanitized(TargetSpot::filler_preset());
    let mut u = base_uniforms(Some(intensity));
    u.insert(U_TARGET_POINT, UniformValue::Vec2(spot.center));
    u.insert(U_TARGET_RADIUS, UniformValue::Float(spot.radius));
    descriptor(TreatmentKind::Filler, true, u)
}

pub fn laser_material(spot: TargetSpot, intensity: f32) -> MaterialDescriptor {
    let spot = spot.sanitized(TargetSpot::laser_preset());
    let mut u = base_uniforms(Some(intensity));
    u.insert(U_LASER_POSITION, UniformValue::Vec2(spot.center));
    u.insert(U_LASER_RADIUS, UniformValue::Float(spot.radius));
    descriptor(TreatmentKind::Laser, true, u)
}

pub fn skin_improvement_material(intensity: f32) -> MaterialDescriptor {
    descriptor(
        TreatmentKind::SkinImprovement,
        true,
        base_uniforms(Some(intensity)),
    )
}

pub fn build_material(selection: &TreatmentSelection) -> MaterialDescriptor {
    let selection = selection.sanitized();
    match selection.treatment {
        Treatment::None => flat_material(),
        Treatment::Filler(spot) => filler_material(spot, selection.intensity),
        Treatment::Laser(spot) => laser_material(spot, selection.intensity),
        Treatment::SkinImprovement => skin_improvement_material(selection.intensity),
    }
}

/// As [`build_material`], substituting the flat material when the device
/// cannot run procedural shaders.
pub fn build_material_for(
    selection: &TreatmentSelection,
    support: ShaderSupport,
) -> MaterialDescriptor {
    match support {
        ShaderSupport::Procedural => build_material(selection),
        ShaderSupport::FlatOnly => flat_material(),
    }
}

/// GPU layout of `TreatmentUniforms` in the WGSL sources (48 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TreatmentUniformBlock {
    pub base_color: [f32; 4],
    pub target_uv: [f32; 2],
    pub radius: f32,
    pub intensity: f32,
    pub elapsed_time: f32,
    pub opacity: f32,
    pub _pad: [f32; 2],
}

impl TreatmentUniformBlock {
    /// Packs whichever uniforms a material declares; absent ones stay zero
    /// except radius, which keeps the minimum so the falloff never divides by 0.
    pub fn pack(uniforms: &Uniforms) -> Self {
        let color = uniforms.get_vec3(U_BASE_COLOR).unwrap_or(SKIN_TONE);
        let opacity = uniforms.get_f32(U_OPACITY).unwrap_or(1.0);
        let target = uniforms
            .get_vec2(U_TARGET_POINT)
            .or_else(|| uniforms.get_vec2(U_LASER_POSITION))
            .unwrap_or(Vec2::ZERO);
        let radius = uniforms
            .get_f32(U_TARGET_RADIUS)
            .or_else(|| uniforms.get_f32(U_LASER_RADIUS))
            .unwrap_or(MIN_TARGET_RADIUS);
        Self {
            base_color: color.extend(opacity).to_array(),
            target_uv: target.to_array(),
            radius,
            intensity: uniforms.get_f32(U_INTENSITY).unwrap_or(0.0),
            elapsed_time: uniforms.get_f32(U_ELAPSED_TIME).unwrap_or(0.0),
            opacity,
            _pad: [0.0; 2],
        }
    }
}
