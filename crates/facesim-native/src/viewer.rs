use crate::keys::ViewerCommand;
use facesim_core::{
    ControlEvent, Expression, FrameInput, LandmarkSet, Orchestrator, Region, SceneFrame,
    ShaderSupport, SimulatorConfig, SyntheticFace, Viewport,
};
use std::time::Duration;

// Tracker cadence: landmarks arrive slower than frames are drawn, so most
// frames reuse the cached mesh.
pub const TRACKER_INTERVAL: Duration = Duration::from_millis(33);
pub const INTENSITY_STEP: f32 = 0.1;

/// Viewer session: the orchestrator fed by a synthetic tracker, plus the
/// expression preview that real hosts would drive with morph weights.
pub struct Viewer {
    orchestrator: Orchestrator,
    stream: SyntheticFace,
    tracked: Option<LandmarkSet>,
    tracking_enabled: bool,
    since_sample: Duration,
    expression: Option<Expression>,
    zone: Option<Region>,
    pose_dirty: bool,
}

impl Viewer {
    pub fn new(seed: u64, config: SimulatorConfig) -> Self {
        Self {
            orchestrator: Orchestrator::new(config),
            stream: SyntheticFace::new(seed),
            tracked: None,
            tracking_enabled: true,
            since_sample: Duration::ZERO,
            expression: None,
            zone: None,
            pose_dirty: false,
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn tracking_enabled(&self) -> bool {
        self.tracking_enabled
    }

    pub fn expression(&self) -> Option<Expression> {
        self.expression
    }

    /// Zone last targeted with [`ViewerCommand::CycleZone`].
    pub fn zone(&self) -> Option<Region> {
        self.zone
    }

    /// One weight per entry of [`Expression::ALL`].
    pub fn expression_weights(&self) -> [f32; 3] {
        Expression::ALL.map(|e| if Some(e) == self.expression { 1.0 } else { 0.0 })
    }

    /// True once after the expression preview changed.
    pub fn take_pose_dirty(&mut self) -> bool {
        std::mem::take(&mut self.pose_dirty)
    }

    /// Returns false when the viewer should close.
    pub fn apply(&mut self, command: ViewerCommand) -> bool {
        match command {
            ViewerCommand::Select(kind) => {
                self.orchestrator.handle(ControlEvent::SelectTreatment(kind))
            }
            ViewerCommand::IntensityUp | ViewerCommand::IntensityDown => {
                let step = if command == ViewerCommand::IntensityUp {
                    INTENSITY_STEP
                } else {
                    -INTENSITY_STEP
                };
                let intensity = self.orchestrator.selection().intensity + step;
                self.orchestrator.handle(ControlEvent::SetIntensity(intensity));
                log::info!("intensity {:.1}", self.orchestrator.selection().intensity);
            }
            ViewerCommand::CycleExpression => {
                self.expression = match self.expression {
                    None => Some(Expression::Smile),
                    Some(Expression::Smile) => Some(Expression::Frown),
                    Some(Expression::Frown) => Some(Expression::EyesClosed),
                    Some(Expression::EyesClosed) => None,
                };
                self.pose_dirty = true;
                log::info!(
                    "expression {}",
                    self.expression.map_or("neutral", Expression::name)
                );
            }
            ViewerCommand::CycleZone => {
                let next = self
                    .zone
                    .and_then(|z| Region::ZONES.iter().position(|&r| r == z))
                    .map_or(0, |i| (i + 1) % Region::ZONES.len());
                let zone = Region::ZONES[next];
                self.zone = Some(zone);
                self.orchestrator.handle(ControlEvent::TargetZone(zone));
                log::info!("target zone {}", zone.name());
            }
            ViewerCommand::ToggleTracking => {
                self.tracking_enabled = !self.tracking_enabled;
                log::info!("tracking {}", if self.tracking_enabled { "on" } else { "off" });
            }
            ViewerCommand::ToggleProcedural => {
                let next = match self.orchestrator.shader_support() {
                    ShaderSupport::Procedural => ShaderSupport::FlatOnly,
                    ShaderSupport::FlatOnly => ShaderSupport::Procedural,
                };
                self.orchestrator.handle(ControlEvent::SetShaderSupport(next));
            }
            ViewerCommand::Quit => return false,
        }
        true
    }

    fn sample(&mut self, dt: Duration) {
        if !self.tracking_enabled {
            self.tracked = None;
            self.since_sample = Duration::ZERO;
            return;
        }
        self.since_sample += dt;
        if self.tracked.is_none() || self.since_sample >= TRACKER_INTERVAL {
            self.tracked = Some(self.stream.next_frame(self.since_sample));
            self.since_sample = Duration::ZERO;
        }
    }

    pub fn frame(&mut self, dt: Duration, viewport: Viewport) -> SceneFrame<'_> {
        self.sample(dt);
        self.orchestrator.tick(FrameInput {
            landmarks: self.tracked.as_ref(),
            dt,
            viewport,
        })
    }
}
