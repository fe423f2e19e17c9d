use crate::controls::{frame_duration, parse_zone};
use crate::dom;
use facesim_core::{
    ControlEvent, FrameInput, LandmarkSet, Orchestrator, OverlayDescriptor, ShaderSupport,
    SimulatorConfig,
    TrackingState, TreatmentKind, TreatmentSelection, UniformValue, Viewport,
};
use instant::Instant;
use js_sys::{Array, Float32Array, Object, Reflect, Uint32Array};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;

/// Values copied out of the last `SceneFrame`, which cannot outlive the tick.
#[derive(Clone, Copy, Debug, Default)]
struct FrameSummary {
    transform_scale: [f32; 3],
    aspect_ratio: f32,
    elapsed_time: f64,
    tracking_present: bool,
    state: TrackingState,
    mesh_rebuilt: bool,
    material_rebuilt: bool,
    overlay: Option<OverlayDescriptor>,
}

pub struct Session {
    orchestrator: Orchestrator,
    landmarks: Option<LandmarkSet>,
    last: FrameSummary,
    last_tick: Option<Instant>,
}

impl Session {
    fn new(support: ShaderSupport) -> Self {
        Self {
            orchestrator: Orchestrator::new(SimulatorConfig {
                shader_support: support,
                ..SimulatorConfig::default()
            }),
            landmarks: None,
            last: FrameSummary::default(),
            last_tick: None,
        }
    }

    pub fn handle(&mut self, event: ControlEvent) {
        self.orchestrator.handle(event);
    }

    pub fn selection(&self) -> TreatmentSelection {
        self.orchestrator.selection()
    }

    fn tick(&mut self, dt: Duration, viewport: Viewport) {
        let frame = self.orchestrator.tick(FrameInput {
            landmarks: self.landmarks.as_ref(),
            dt,
            viewport,
        });
        self.last = FrameSummary {
            transform_scale: frame.transform_scale.to_array(),
            aspect_ratio: frame.viewport_aspect_ratio,
            elapsed_time: frame.elapsed_time,
            tracking_present: frame.tracking_present,
            state: frame.state,
            mesh_rebuilt: frame.mesh_rebuilt,
            material_rebuilt: frame.material_rebuilt,
            overlay: frame.overlay,
        };
    }
}

fn uniform_to_js(value: UniformValue) -> JsValue {
    match value {
        UniformValue::Float(v) => JsValue::from_f64(v as f64),
        other => Float32Array::from(other.components().as_slice()).into(),
    }
}

fn overlay_to_js(overlay: &OverlayDescriptor) -> Object {
    let obj = Object::new();
    let fields: [(&str, JsValue); 5] = [
        ("size", Float32Array::from(&overlay.size.to_array()[..]).into()),
        ("color", Float32Array::from(&overlay.color.to_array()[..]).into()),
        ("opacity", JsValue::from_f64(overlay.opacity as f64)),
        ("rotation", JsValue::from_f64(overlay.rotation as f64)),
        ("additive", JsValue::from_bool(overlay.additive)),
    ];
    for (name, value) in fields {
        let _ = Reflect::set(&obj, &JsValue::from_str(name), &value);
    }
    obj
}

/// Face simulator handle owned by the JS host. The host feeds landmarks and
/// calls `tick` from `requestAnimationFrame`, then reads back whichever
/// buffers the frame flags report as changed.
#[wasm_bindgen]
pub struct FaceSimulator {
    session: Rc<RefCell<Session>>,
}

#[wasm_bindgen]
impl FaceSimulator {
    #[wasm_bindgen(constructor)]
    pub fn new(procedural: bool) -> FaceSimulator {
        let support = if procedural {
            ShaderSupport::Procedural
        } else {
            ShaderSupport::FlatOnly
        };
        log::info!("[sim] created ({support:?})");
        FaceSimulator {
            session: Rc::new(RefCell::new(Session::new(support))),
        }
    }

    /// Hooks up `#treatment-*` buttons and `#treatment-intensity`.
    pub fn bind_controls(&self) -> Result<(), JsValue> {
        dom::bind_controls(&self.session).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Flat `[x, y, z, ...]` for all 468 landmarks, or null when no face is
    /// detected. Malformed frames are logged and treated as no face.
    pub fn set_landmarks(&self, coords: Option<Float32Array>) {
        let landmarks = coords.and_then(|c| match LandmarkSet::from_flat(&c.to_vec()) {
            Ok(set) => Some(set),
            Err(e) => {
                log::warn!("[sim] rejected landmark frame: {e}");
                None
            }
        });
        self.session.borrow_mut().landmarks = landmarks;
    }

    pub fn tick(&self, dt_ms: f64, width: u32, height: u32) {
        let dt = frame_duration(dt_ms);
        let mut s = self.session.borrow_mut();
        s.last_tick = Some(Instant::now());
        s.tick(dt, Viewport::new(width, height));
    }

    /// Like `tick`, measuring the frame time itself.
    pub fn tick_now(&self, width: u32, height: u32) {
        let now = Instant::now();
        let mut s = self.session.borrow_mut();
        let dt = s
            .last_tick
            .map(|t| now.duration_since(t))
            .unwrap_or_default();
        s.last_tick = Some(now);
        s.tick(dt, Viewport::new(width, height));
    }

    pub fn select_treatment(&self, name: &str) -> Result<(), JsValue> {
        let kind: TreatmentKind = name
            .parse()
            .map_err(|e: facesim_core::ParseTreatmentError| JsValue::from_str(&e.to_string()))?;
        let mut s = self.session.borrow_mut();
        s.handle(ControlEvent::SelectTreatment(kind));
        let selection = s.selection();
        if let Some(document) = dom::window_document() {
            dom::reflect_selection(&document, selection.kind(), selection.intensity);
        }
        Ok(())
    }

    /// Moves the active filler or laser spot onto a named zone of the
    /// tracked face. Ignored while no face is tracked.
    pub fn target_zone(&self, name: &str) -> Result<(), JsValue> {
        let region =
            parse_zone(name).ok_or_else(|| JsValue::from_str(&format!("unknown zone: {name}")))?;
        self.session
            .borrow_mut()
            .handle(ControlEvent::TargetZone(region));
        Ok(())
    }

    pub fn set_intensity(&self, intensity: f32) {
        self.session
            .borrow_mut()
            .handle(ControlEvent::SetIntensity(intensity));
    }

    pub fn set_procedural(&self, procedural: bool) {
        let support = if procedural {
            ShaderSupport::Procedural
        } else {
            ShaderSupport::FlatOnly
        };
        self.session
            .borrow_mut()
            .handle(ControlEvent::SetShaderSupport(support));
    }

    pub fn treatment(&self) -> String {
        self.session.borrow().selection().kind().to_string()
    }

    pub fn intensity(&self) -> f32 {
        self.session.borrow().selection().intensity
    }

    // ---- geometry ----

    pub fn positions(&self) -> Float32Array {
        Float32Array::from(self.session.borrow().orchestrator.mesh().positions_flat())
    }

    pub fn uvs(&self) -> Float32Array {
        Float32Array::from(self.session.borrow().orchestrator.mesh().uvs_flat())
    }

    pub fn normals(&self) -> Float32Array {
        Float32Array::from(self.session.borrow().orchestrator.mesh().normals_flat())
    }

    pub fn tangents(&self) -> Float32Array {
        Float32Array::from(self.session.borrow().orchestrator.mesh().tangents_flat())
    }

    pub fn indices(&self) -> Uint32Array {
        Uint32Array::from(self.session.borrow().orchestrator.mesh().indices.as_slice())
    }

    pub fn morph_target_names(&self) -> Array {
        self.session
            .borrow()
            .orchestrator
            .morph_targets()
            .iter()
            .map(|t| JsValue::from_str(t.name()))
            .collect()
    }

    pub fn morph_positions(&self, name: &str) -> Option<Float32Array> {
        let s = self.session.borrow();
        s.orchestrator
            .morph_targets()
            .iter()
            .find(|t| t.name() == name)
            .map(|t| Float32Array::from(t.positions_flat()))
    }

    // ---- material ----

    pub fn vertex_source(&self) -> String {
        self.session.borrow().orchestrator.material().vertex_source.clone()
    }

    pub fn fragment_source(&self) -> String {
        self.session.borrow().orchestrator.material().fragment_source.clone()
    }

    pub fn vertex_entry(&self) -> String {
        self.session.borrow().orchestrator.material().vertex_entry.to_string()
    }

    pub fn fragment_entry(&self) -> String {
        self.session.borrow().orchestrator.material().fragment_entry.to_string()
    }

    pub fn transparent(&self) -> bool {
        self.session.borrow().orchestrator.material().surface.transparent
    }

    pub fn double_sided(&self) -> bool {
        self.session.borrow().orchestrator.material().surface.double_sided
    }

    pub fn roughness(&self) -> f32 {
        self.session.borrow().orchestrator.material().surface.roughness
    }

    pub fn metalness(&self) -> f32 {
        self.session.borrow().orchestrator.material().surface.metalness
    }

    /// `{ name: number | Float32Array }` with the current uniform values.
    pub fn uniforms(&self) -> Object {
        let obj = Object::new();
        for (name, value) in self.session.borrow().orchestrator.uniforms().iter() {
            let _ = Reflect::set(&obj, &JsValue::from_str(name), &uniform_to_js(value));
        }
        obj
    }

    // ---- frame state ----

    pub fn transform_scale(&self) -> Float32Array {
        Float32Array::from(&self.session.borrow().last.transform_scale[..])
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.session.borrow().last.aspect_ratio
    }

    pub fn elapsed_time(&self) -> f64 {
        self.session.borrow().last.elapsed_time
    }

    pub fn tracking_present(&self) -> bool {
        self.session.borrow().last.tracking_present
    }

    pub fn state(&self) -> String {
        self.session.borrow().last.state.as_str().to_string()
    }

    pub fn mesh_rebuilt(&self) -> bool {
        self.session.borrow().last.mesh_rebuilt
    }

    pub fn material_rebuilt(&self) -> bool {
        self.session.borrow().last.material_rebuilt
    }

    /// `{ size, color, opacity, rotation, additive }` for the effect quad
    /// drawn over the face, or null when the treatment has none.
    pub fn overlay(&self) -> JsValue {
        match &self.session.borrow().last.overlay {
            Some(overlay) => overlay_to_js(overlay).into(),
            None => JsValue::NULL,
        }
    }
}
