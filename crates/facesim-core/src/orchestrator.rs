//! Per-frame driver tying landmarks, treatment selection and time together.
//!
//! The host calls [`Orchestrator::tick`] once per animation frame and
//! forwards user input as [`ControlEvent`]s in between. All cross-frame state
//! lives here; nothing is shared or global apart from the landmark-set id
//! counter.

use crate::constants::PRESET_INTENSITY;
use crate::landmarks::{LandmarkSet, LandmarkSetId};
use crate::material::{
    build_material_for, MaterialDescriptor, ShaderSupport, UniformValue, Uniforms, U_ELAPSED_TIME,
    U_INTENSITY,
};
use crate::mesh::{build_mesh, MeshDescriptor, MeshLayout};
use crate::morph::{synthesize_morph_targets, MorphTarget};
use crate::overlay::{treatment_overlay, OverlayDescriptor};
use crate::regions::{zone_target, Region};
use crate::treatment::{clamp_intensity, TargetSpot, Treatment, TreatmentKind, TreatmentSelection};
use glam::Vec3;
use std::time::Duration;

/// Session parameters chosen by the host at startup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulatorConfig {
    pub shader_support: ShaderSupport,
    /// Placement used when filler is picked without an explicit target.
    pub filler_preset: TargetSpot,
    pub laser_preset: TargetSpot,
    /// Intensity a treatment starts at when selected by kind.
    pub preset_intensity: f32,
    pub layout: MeshLayout<'static>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            shader_support: ShaderSupport::Procedural,
            filler_preset: TargetSpot::filler_preset(),
            laser_preset: TargetSpot::laser_preset(),
            preset_intensity: PRESET_INTENSITY,
            layout: MeshLayout::face(),
        }
    }
}

/// Drawing surface size in physical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// width / height, or 1.0 while the surface has no height.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a> {
    pub landmarks: Option<&'a LandmarkSet>,
    pub dt: Duration,
    pub viewport: Viewport,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlEvent {
    /// Treatment button: preset placement and intensity.
    SelectTreatment(TreatmentKind),
    /// Slider: updates the live uniform, no material rebuild.
    SetIntensity(f32),
    SetSelection(TreatmentSelection),
    SetShaderSupport(ShaderSupport),
    /// Moves the active filler or laser spot onto a zone of the tracked face.
    TargetZone(Region),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrackingState {
    #[default]
    Idle,
    TrackingNoTreatment,
    TrackingTreatmentActive,
}

impl TrackingState {
    pub const fn as_str(self) -> &'static str {
        match self {
            TrackingState::Idle => "idle",
            TrackingState::TrackingNoTreatment => "tracking-no-treatment",
            TrackingState::TrackingTreatmentActive => "tracking-treatment-active",
        }
    }
}

/// Everything the host needs to draw one frame.
#[derive(Clone, Copy, Debug)]
pub struct SceneFrame<'a> {
    pub mesh: &'a MeshDescriptor,
    /// Empty while no face is tracked.
    pub morph_targets: &'a [MorphTarget],
    pub material: &'a MaterialDescriptor,
    /// Current values for the material's uniforms.
    pub uniforms: &'a Uniforms,
    /// Additive effect quad drawn over the face, if the treatment has one.
    pub overlay: Option<OverlayDescriptor>,
    pub transform_scale: Vec3,
    pub viewport_aspect_ratio: f32,
    pub elapsed_time: f64,
    pub tracking_present: bool,
    pub state: TrackingState,
    /// Geometry changed since the previous frame; re-upload buffers.
    pub mesh_rebuilt: bool,
    /// Program changed since the previous frame; recreate the pipeline.
    pub material_rebuilt: bool,
}

pub struct Orchestrator {
    config: SimulatorConfig,
    selection: TreatmentSelection,
    support: ShaderSupport,
    elapsed: f64,
    last_set: Option<LandmarkSetId>,
    landmarks: Option<LandmarkSet>,
    mesh: MeshDescriptor,
    morph_targets: Vec<MorphTarget>,
    material: MaterialDescriptor,
    uniforms: Uniforms,
    material_dirty: bool,
    state: TrackingState,
}

impl Orchestrator {
    pub fn new(config: SimulatorConfig) -> Self {
        let selection = TreatmentSelection::none();
        let material = build_material_for(&selection, config.shader_support);
        let uniforms = material.uniforms.clone();
        Self {
            config,
            selection,
            support: config.shader_support,
            elapsed: 0.0,
            last_set: None,
            landmarks: None,
            mesh: MeshDescriptor::empty(),
            morph_targets: Vec::new(),
            material,
            uniforms,
            // first frame reports the material so hosts build their pipeline
            material_dirty: true,
            state: TrackingState::Idle,
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn selection(&self) -> TreatmentSelection {
        self.selection
    }

    pub fn shader_support(&self) -> ShaderSupport {
        self.support
    }

    pub fn elapsed_time(&self) -> f64 {
        self.elapsed
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn tracking_present(&self) -> bool {
        self.state != TrackingState::Idle
    }

    pub fn mesh(&self) -> &MeshDescriptor {
        &self.mesh
    }

    pub fn morph_targets(&self) -> &[MorphTarget] {
        &self.morph_targets
    }

    pub fn material(&self) -> &MaterialDescriptor {
        &self.material
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    pub fn handle(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::SelectTreatment(kind) => {
                let (treatment, intensity) = match kind {
                    TreatmentKind::None => (Treatment::None, 0.0),
                    TreatmentKind::Filler => (
                        Treatment::Filler(self.config.filler_preset),
                        self.config.preset_intensity,
                    ),
                    TreatmentKind::Laser => (
                        Treatment::Laser(self.config.laser_preset),
                        self.config.preset_intensity,
                    ),
                    TreatmentKind::SkinImprovement => {
                        (Treatment::SkinImprovement, self.config.preset_intensity)
                    }
                };
                self.select(TreatmentSelection::new(treatment, intensity));
            }
            ControlEvent::SetIntensity(intensity) => self.set_intensity(intensity),
            ControlEvent::SetSelection(selection) => self.select(selection.sanitized()),
            ControlEvent::SetShaderSupport(support) => {
                if support != self.support {
                    log::info!("shader support {:?} -> {:?}", self.support, support);
                    self.support = support;
                    self.material_dirty = true;
                }
            }
            ControlEvent::TargetZone(region) => self.target_zone(region),
        }
    }

    fn target_zone(&mut self, region: Region) {
        let Some(set) = &self.landmarks else {
            log::debug!("zone {} ignored: no face tracked", region.name());
            return;
        };
        let Some(spot) = zone_target(set, region) else {
            log::debug!("zone {} has no landmarks", region.name());
            return;
        };
        let treatment = match self.selection.treatment {
            Treatment::Filler(_) => Treatment::Filler(spot),
            Treatment::Laser(_) => Treatment::Laser(spot),
            Treatment::None | Treatment::SkinImprovement => {
                log::debug!(
                    "zone {} ignored: {} has no placement",
                    region.name(),
                    self.selection.kind()
                );
                return;
            }
        };
        self.select(TreatmentSelection::new(treatment, self.selection.intensity));
    }

    fn select(&mut self, selection: TreatmentSelection) {
        if selection.treatment == self.selection.treatment {
            self.set_intensity(selection.intensity);
            return;
        }
        log::info!(
            "treatment {} -> {} at intensity {:.2}",
            self.selection.kind(),
            selection.kind(),
            selection.intensity
        );
        self.selection = selection;
        self.material_dirty = true;
    }

    fn set_intensity(&mut self, intensity: f32) {
        let intensity = clamp_intensity(intensity);
        self.selection.intensity = intensity;
        self.uniforms.set(U_INTENSITY, UniformValue::Float(intensity));
    }

    pub fn tick(&mut self, input: FrameInput<'_>) -> SceneFrame<'_> {
        let mesh_rebuilt = self.update_geometry(input.landmarks);

        let material_rebuilt = std::mem::take(&mut self.material_dirty);
        if material_rebuilt {
            self.material = build_material_for(&self.selection, self.support);
            self.uniforms = self.material.uniforms.clone();
            log::debug!(
                "rebuilt {} material (procedural: {})",
                self.material.kind,
                self.material.procedural
            );
        }

        self.elapsed += input.dt.as_secs_f64();
        self.uniforms
            .set(U_ELAPSED_TIME, UniformValue::Float(self.elapsed as f32));
        self.uniforms
            .set(U_INTENSITY, UniformValue::Float(self.selection.intensity));

        let tracking_present = input.landmarks.is_some();
        let state = match (tracking_present, self.material.kind) {
            (false, _) => TrackingState::Idle,
            (true, TreatmentKind::None) => TrackingState::TrackingNoTreatment,
            (true, _) => TrackingState::TrackingTreatmentActive,
        };
        if state != self.state {
            log::info!("state {} -> {}", self.state.as_str(), state.as_str());
            self.state = state;
        }

        let overlay = treatment_overlay(
            self.selection.kind(),
            self.selection.intensity,
            self.elapsed,
        );
        let aspect = input.viewport.aspect_ratio();
        SceneFrame {
            mesh: &self.mesh,
            morph_targets: &self.morph_targets,
            material: &self.material,
            uniforms: &self.uniforms,
            overlay,
            transform_scale: Vec3::new(aspect, 1.0, 1.0),
            viewport_aspect_ratio: aspect,
            elapsed_time: self.elapsed,
            tracking_present,
            state,
            mesh_rebuilt,
            material_rebuilt,
        }
    }

    /// Returns true when the cached mesh changed.
    fn update_geometry(&mut self, landmarks: Option<&LandmarkSet>) -> bool {
        match landmarks {
            Some(set) if self.last_set == Some(set.id()) => false,
            Some(set) => {
                self.mesh = build_mesh(set.points(), self.config.layout);
                self.morph_targets = synthesize_morph_targets(set);
                self.last_set = Some(set.id());
                self.landmarks = Some(set.clone());
                log::debug!(
                    "landmark set {} -> {} triangles",
                    set.id().get(),
                    self.mesh.triangle_count()
                );
                true
            }
            None => {
                self.landmarks = None;
                let had_mesh = self.last_set.take().is_some();
                if had_mesh {
                    self.mesh = MeshDescriptor::empty();
                    self.morph_targets.clear();
                }
                had_mesh
            }
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}
