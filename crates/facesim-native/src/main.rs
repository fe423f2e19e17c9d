mod gpu;
mod keys;
mod viewer;

use facesim_core::{blend_positions, SimulatorConfig, TreatmentUniformBlock, Viewport};
use gpu::{face_vertices, GpuState};
use keys::{command_for_key, HELP};
use std::time::Instant;
use viewer::Viewer;
use winit::keyboard::{Key, NamedKey};
use winit::{event::*, event_loop::EventLoop, window::WindowBuilder};

const STREAM_SEED: u64 = 42;

fn key_name(key: &Key) -> Option<&str> {
    match key {
        Key::Character(s) => Some(s.as_str()),
        Key::Named(NamedKey::ArrowUp) => Some("ArrowUp"),
        Key::Named(NamedKey::ArrowDown) => Some("ArrowDown"),
        Key::Named(NamedKey::Escape) => Some("Escape"),
        _ => None,
    }
}

fn window_title(viewer: &Viewer) -> String {
    let orch = viewer.orchestrator();
    let selection = orch.selection();
    format!(
        "facesim: {} {:.1} [{}{}]",
        selection.kind(),
        selection.intensity,
        orch.state().as_str(),
        viewer
            .expression()
            .map(|e| format!(", {}", e.name()))
            .unwrap_or_default()
    )
}

/// Ticks the viewer and pushes whatever changed to the GPU.
fn draw_frame(
    viewer: &mut Viewer,
    gpu: &mut GpuState<'_>,
    dt: std::time::Duration,
) -> Result<(), wgpu::SurfaceError> {
    let (width, height) = gpu.size();
    let pose_dirty = viewer.take_pose_dirty();
    let weights = viewer.expression_weights();
    let frame = viewer.frame(dt, Viewport::new(width, height));

    if frame.material_rebuilt {
        gpu.rebuild_pipeline(frame.material);
    }
    if frame.mesh_rebuilt || pose_dirty {
        let positions = blend_positions(&frame.mesh.positions, frame.morph_targets, &weights);
        gpu.upload_mesh(&face_vertices(frame.mesh, &positions), &frame.mesh.indices);
    }
    let block = TreatmentUniformBlock::pack(frame.uniforms);
    gpu.render(frame.transform_scale, &block, frame.overlay.as_ref())
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    log::info!("{HELP}");

    let mut viewer = Viewer::new(STREAM_SEED, SimulatorConfig::default());

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(window_title(&viewer))
        .build(&event_loop)?;

    let mut gpu = pollster::block_on(GpuState::new(&window))?;
    let mut last_frame = Instant::now();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => gpu.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                },
            ..
        } => {
            if let Some(command) = key_name(&logical_key).and_then(command_for_key) {
                if !viewer.apply(command) {
                    elwt.exit();
                    return;
                }
                gpu.window.set_title(&window_title(&viewer));
            }
        }
        Event::AboutToWait => {
            let now = Instant::now();
            let dt = now - last_frame;
            last_frame = now;
            match draw_frame(&mut viewer, &mut gpu, dt) {
                Ok(_) => gpu.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => gpu.resize(gpu.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(e) => log::warn!("surface error: {e:?}"),
            }
        }
        _ => {}
    })?;
    Ok(())
}
