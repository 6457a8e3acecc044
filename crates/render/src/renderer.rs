use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::geometry::{box_vertices, line_list_vertices, sphere_vertices};
use crate::gpu_types::{CameraUniform, LightUniform, LineVertex, ModelUniform};
use crate::pipeline;
use crate::scene::{Mesh, MeshId, MeshKind, Scene};

/// Smallest vertex buffer allocated for a line system, in bytes
const MIN_LINE_BUFFER: u64 = 64 * std::mem::size_of::<LineVertex>() as u64;

/// GPU resources backing one scene mesh
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    /// Line-system revision last uploaded; `None` for solid meshes
    revision: Option<u64>,
}

/// Draws a [`Scene`] into a window surface
pub struct Renderer {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    light_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    model_layout: wgpu::BindGroupLayout,
    meshes: HashMap<MeshId, GpuMesh>,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to get adapter")?;
        let info = adapter.get_info();
        tracing::info!(adapter = %info.name, backend = ?info.backend, "GPU adapter selected");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Renderer Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .context("failed to request device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no supported formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            desired_maximum_frame_latency: 2,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        tracing::info!(width = config.width, height = config.height, ?format, "surface configured");

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let light_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Light Buffer"),
            size: std::mem::size_of::<LightUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = pipeline::create_frame_bind_group_layout(&device);
        let model_layout = pipeline::create_model_bind_group_layout(&device);
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_buffer.as_entire_binding(),
                },
            ],
        });

        let mesh_pipeline =
            pipeline::create_mesh_pipeline(&device, format, &frame_layout, &model_layout);
        let line_pipeline =
            pipeline::create_line_pipeline(&device, format, &frame_layout, &model_layout);
        let depth_view = pipeline::create_depth_view(&device, &config);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            depth_view,
            mesh_pipeline,
            line_pipeline,
            camera_buffer,
            light_buffer,
            frame_bind_group,
            model_layout,
            meshes: HashMap::new(),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        winit::dpi::PhysicalSize::new(self.config.width, self.config.height)
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = pipeline::create_depth_view(&self.device, &self.config);
            tracing::debug!(width = new_size.width, height = new_size.height, "surface resized");
        }
    }

    fn create_gpu_mesh(&self, id: MeshId, mesh: &Mesh) -> GpuMesh {
        let (vertex_buffer, vertex_count, revision) = match &mesh.kind {
            MeshKind::Sphere(options) => self.static_vertex_buffer(&sphere_vertices(options)),
            MeshKind::Box(options) => self.static_vertex_buffer(&box_vertices(options)),
            MeshKind::Lines(system) => {
                let vertices = line_list_vertices(system);
                let buffer = self.line_vertex_buffer(&vertices, 0);
                (buffer, vertices.len() as u32, Some(system.revision()))
            }
        };

        let model_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Model Buffer"),
                contents: bytemuck::bytes_of(&ModelUniform::from(mesh)),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let model_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout: &self.model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.as_entire_binding(),
            }],
        });
        tracing::debug!(name = %mesh.name, ?id, vertex_count, "uploaded mesh");

        GpuMesh {
            vertex_buffer,
            vertex_count,
            model_buffer,
            model_bind_group,
            revision,
        }
    }

    fn static_vertex_buffer<T: bytemuck::Pod>(
        &self,
        vertices: &[T],
    ) -> (wgpu::Buffer, u32, Option<u64>) {
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertices"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        (buffer, vertices.len() as u32, None)
    }

    /// Buffer with room for at least `vertices`, grown when required
    fn line_vertex_buffer(&self, vertices: &[LineVertex], current: u64) -> wgpu::Buffer {
        let required = std::mem::size_of_val(vertices) as u64;
        let size = required.max(MIN_LINE_BUFFER).max(current);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Line Vertices"),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        if required > 0 {
            self.queue
                .write_buffer(&buffer, 0, bytemuck::cast_slice(vertices));
        }
        buffer
    }

    /// Upload whatever changed in the scene since the last frame
    fn sync_scene(&mut self, scene: &Scene) {
        for (id, mesh) in scene.meshes() {
            if !self.meshes.contains_key(&id) {
                let gpu = self.create_gpu_mesh(id, mesh);
                self.meshes.insert(id, gpu);
                continue;
            }

            if let MeshKind::Lines(system) = &mesh.kind {
                let stale = self
                    .meshes
                    .get(&id)
                    .is_some_and(|gpu| gpu.revision != Some(system.revision()));
                if stale {
                    let vertices = line_list_vertices(system);
                    let bytes: &[u8] = bytemuck::cast_slice(&vertices);
                    let replacement = match self.meshes.get(&id) {
                        Some(gpu) if gpu.vertex_buffer.size() >= bytes.len() as u64 => {
                            if !bytes.is_empty() {
                                self.queue.write_buffer(&gpu.vertex_buffer, 0, bytes);
                            }
                            None
                        }
                        Some(gpu) => {
                            Some(self.line_vertex_buffer(&vertices, gpu.vertex_buffer.size() * 2))
                        }
                        None => None,
                    };
                    if let Some(gpu) = self.meshes.get_mut(&id) {
                        if let Some(buffer) = replacement {
                            gpu.vertex_buffer.destroy();
                            gpu.vertex_buffer = buffer;
                        }
                        gpu.vertex_count = vertices.len() as u32;
                        gpu.revision = Some(system.revision());
                    }
                }
            }

            if let Some(gpu) = self.meshes.get(&id) {
                self.queue.write_buffer(
                    &gpu.model_buffer,
                    0,
                    bytemuck::bytes_of(&ModelUniform::from(mesh)),
                );
            }
        }
    }

    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        self.sync_scene(scene);

        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::from(&scene.camera)),
        );
        self.queue.write_buffer(
            &self.light_buffer,
            0,
            bytemuck::bytes_of(&LightUniform::from(&scene.light)),
        );

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let clear = scene.clear_color.as_dvec4();
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("enc") });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.x,
                            g: clear.y,
                            b: clear.z,
                            a: clear.w,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rpass.set_bind_group(0, &self.frame_bind_group, &[]);

            rpass.set_pipeline(&self.mesh_pipeline);
            for (id, mesh) in scene.meshes() {
                if matches!(mesh.kind, MeshKind::Lines(_)) {
                    continue;
                }
                if let Some(gpu) = self.meshes.get(&id) {
                    rpass.set_bind_group(1, &gpu.model_bind_group, &[]);
                    rpass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                    rpass.draw(0..gpu.vertex_count, 0..1);
                }
            }

            rpass.set_pipeline(&self.line_pipeline);
            rpass.set_bind_group(0, &self.frame_bind_group, &[]);
            for (id, mesh) in scene.meshes() {
                if !matches!(mesh.kind, MeshKind::Lines(_)) {
                    continue;
                }
                if let Some(gpu) = self.meshes.get(&id).filter(|gpu| gpu.vertex_count > 0) {
                    rpass.set_bind_group(1, &gpu.model_bind_group, &[]);
                    rpass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                    rpass.draw(0..gpu.vertex_count, 0..1);
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();

        Ok(())
    }
}
