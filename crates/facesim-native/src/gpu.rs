use facesim_core::constants::{CAMERA_Z, LIGHT_DIR};
use facesim_core::{MaterialDescriptor, MeshDescriptor, OverlayDescriptor, TreatmentUniformBlock};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

const OVERLAY_WGSL: &str = include_str!("../shaders/overlay.wgsl");

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    light_dir: [f32; 4],
    camera_pos: [f32; 4],
}

/// Interleaved vertex matching `VsIn` in the face vertex shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FaceVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 4],
}

impl FaceVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
        3 => Float32x4
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FaceVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Vertices for `mesh` with `positions` substituted (morph-blended or base).
pub fn face_vertices(mesh: &MeshDescriptor, positions: &[Vec3]) -> Vec<FaceVertex> {
    positions
        .iter()
        .zip(&mesh.normals)
        .zip(mesh.uvs.iter().zip(&mesh.tangents))
        .map(|((p, n), (uv, t))| FaceVertex {
            position: p.to_array(),
            normal: n.to_array(),
            uv: uv.to_array(),
            tangent: t.to_array(),
        })
        .collect()
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OverlayVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl OverlayVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Two triangles covering the overlay quad.
pub fn overlay_vertices(overlay: &OverlayDescriptor) -> [OverlayVertex; 6] {
    let color = overlay.color.extend(overlay.opacity).to_array();
    let c = overlay.corners();
    [c[0], c[1], c[2], c[0], c[2], c[3]].map(|p| OverlayVertex {
        position: p.to_array(),
        color,
    })
}

const ADDITIVE_BLENDING: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent::OVER,
};

fn overlay_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    scene_bgl: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("overlay"),
        source: wgpu::ShaderSource::Wgsl(OVERLAY_WGSL.into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("overlay_pl"),
        bind_group_layouts: &[scene_bgl],
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("overlay"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            buffers: &[OverlayVertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(ADDITIVE_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

fn uniform_layout_entry(visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Writes into `slot` when it is large enough, otherwise replaces it.
fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    slot: &mut Option<wgpu::Buffer>,
    label: &str,
    usage: wgpu::BufferUsages,
    bytes: &[u8],
) {
    match slot {
        Some(buf) if buf.size() >= bytes.len() as u64 => queue.write_buffer(buf, 0, bytes),
        _ => {
            *slot = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytes,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            }));
        }
    }
}

pub struct GpuState<'w> {
    pub window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline_layout: wgpu::PipelineLayout,
    pipeline: Option<wgpu::RenderPipeline>,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    treatment_buffer: wgpu::Buffer,
    treatment_bind_group: wgpu::BindGroup,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
    overlay_pipeline: wgpu::RenderPipeline,
    overlay_buffer: Option<wgpu::Buffer>,
    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    pub async fn new(window: &'w winit::window::Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let treatment_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("treatment_uniforms"),
            size: std::mem::size_of::<TreatmentUniformBlock>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let scene_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[uniform_layout_entry(wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });
        let treatment_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("treatment_bgl"),
            entries: &[uniform_layout_entry(wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &scene_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });
        let treatment_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("treatment_bg"),
            layout: &treatment_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: treatment_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("face_pl"),
            bind_group_layouts: &[&scene_bgl, &treatment_bgl],
            push_constant_ranges: &[],
        });

        let overlay_pipeline = overlay_pipeline(&device, format, &scene_bgl);

        log::info!("gpu ready: {:?} {}x{}", format, config.width, config.height);
        Ok(Self {
            window,
            surface,
            device,
            queue,
            width: config.width,
            height: config.height,
            config,
            pipeline_layout,
            pipeline: None,
            scene_buffer,
            scene_bind_group,
            treatment_buffer,
            treatment_bind_group,
            vertex_buffer: None,
            index_buffer: None,
            index_count: 0,
            overlay_pipeline,
            overlay_buffer: None,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Compiles `material` into a pipeline. On a shader validation error the
    /// previous pipeline is kept.
    pub fn rebuild_pipeline(&mut self, material: &MaterialDescriptor) {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let vs = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("face_vs"),
                source: wgpu::ShaderSource::Wgsl(material.vertex_source.as_str().into()),
            });
        let fs = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("treatment_fs"),
                source: wgpu::ShaderSource::Wgsl(material.fragment_source.as_str().into()),
            });
        let cull_mode = if material.surface.double_sided {
            None
        } else {
            Some(wgpu::Face::Back)
        };
        let blend = if material.surface.transparent {
            wgpu::BlendState::ALPHA_BLENDING
        } else {
            wgpu::BlendState::REPLACE
        };
        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(material.kind.as_str()),
                layout: Some(&self.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &vs,
                    entry_point: Some(material.vertex_entry),
                    buffers: &[FaceVertex::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    cull_mode,
                    ..wgpu::PrimitiveState::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &fs,
                    entry_point: Some(material.fragment_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.config.format,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                cache: None,
                multiview: None,
            });
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(err) => log::error!("{} material rejected: {err}", material.kind),
            None => {
                log::debug!("pipeline ready for {} material", material.kind);
                self.pipeline = Some(pipeline);
            }
        }
    }

    pub fn upload_mesh(&mut self, vertices: &[FaceVertex], indices: &[u32]) {
        self.index_count = indices.len() as u32;
        if vertices.is_empty() || indices.is_empty() {
            return;
        }
        upload(
            &self.device,
            &self.queue,
            &mut self.vertex_buffer,
            "face_vb",
            wgpu::BufferUsages::VERTEX,
            bytemuck::cast_slice(vertices),
        );
        upload(
            &self.device,
            &self.queue,
            &mut self.index_buffer,
            "face_ib",
            wgpu::BufferUsages::INDEX,
            bytemuck::cast_slice(indices),
        );
    }

    fn scene_uniforms(&self, transform_scale: Vec3) -> SceneUniforms {
        let aspect = self.width as f32 / self.height.max(1) as f32;
        // vertical field of view that fits mesh y in [-1, 1] at z = 0
        let fov = 2.0 * (1.0 / CAMERA_Z).atan();
        let proj = Mat4::perspective_rh(fov, aspect, 0.1, 10.0);
        let eye = Vec3::new(0.0, 0.0, CAMERA_Z);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        SceneUniforms {
            view_proj: (proj * view).to_cols_array_2d(),
            model: Mat4::from_scale(transform_scale).to_cols_array_2d(),
            light_dir: LIGHT_DIR.extend(0.0).to_array(),
            camera_pos: eye.extend(1.0).to_array(),
        }
    }

    pub fn render(
        &mut self,
        transform_scale: Vec3,
        treatment: &TreatmentUniformBlock,
        overlay: Option<&OverlayDescriptor>,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.scene_buffer,
            0,
            bytemuck::bytes_of(&self.scene_uniforms(transform_scale)),
        );
        self.queue
            .write_buffer(&self.treatment_buffer, 0, bytemuck::bytes_of(treatment));
        if let Some(overlay) = overlay {
            upload(
                &self.device,
                &self.queue,
                &mut self.overlay_buffer,
                "overlay_vb",
                wgpu::BufferUsages::VERTEX,
                bytemuck::cast_slice(&overlay_vertices(overlay)),
            );
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("face_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.06,
                            g: 0.06,
                            b: 0.08,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if let (Some(pipeline), Some(vb), Some(ib)) =
                (&self.pipeline, &self.vertex_buffer, &self.index_buffer)
            {
                if self.index_count > 0 {
                    rpass.set_pipeline(pipeline);
                    rpass.set_bind_group(0, &self.scene_bind_group, &[]);
                    rpass.set_bind_group(1, &self.treatment_bind_group, &[]);
                    rpass.set_vertex_buffer(0, vb.slice(..));
                    rpass.set_index_buffer(ib.slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..self.index_count, 0, 0..1);
                }
            }
            if let (Some(_), Some(vb)) = (overlay, &self.overlay_buffer) {
                rpass.set_pipeline(&self.overlay_pipeline);
                rpass.set_bind_group(0, &self.scene_bind_group, &[]);
                rpass.set_vertex_buffer(0, vb.slice(..));
                rpass.draw(0..6, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
