use glam::Vec2;
use tracing::{debug, warn};
use wgpu::*;

use crate::model::{Room, TILE_SIZE};
use crate::utils::{hex_color, Mesh, MeshBuffer, Vertex};

pub const BACKDROP_COLOR: u32 = 0x404040;

/// Orthographic projection mapping pixel coordinates (origin top-left) to clip space
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::NoUninit)]
pub struct ScreenUniform {
    pub proj: [[f32; 4]; 4],
}

impl ScreenUniform {
    pub fn new(width: u32, height: u32) -> Self {
        let proj = glam::Mat4::orthographic_rh(0.0, width as f32, height as f32, 0.0, -1.0, 1.0);
        Self {
            proj: proj.to_cols_array_2d(),
        }
    }
}

pub struct ScreenResources {
    pub buffer: wgpu::Buffer,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
}

pub fn create_screen_resources(device: &wgpu::Device) -> ScreenResources {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("screen_buffer"),
        size: std::mem::size_of::<ScreenUniform>() as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("screen_bind_group_layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("screen_bind_group"),
        layout: &bind_group_layout,
        entries: &[wgpu::BindGroupEntry { binding: 0, resource: buffer.as_entire_binding() }],
    });

    ScreenResources { buffer, bind_group_layout, bind_group }
}

pub fn create_quad_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader_src = include_str!("shaders/quad.wgsl");
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("quad_shader"),
        source: wgpu::ShaderSource::Wgsl(shader_src.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("quad_pipeline_layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("quad_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute { offset: 0, shader_location: 0, format: wgpu::VertexFormat::Float32x2 },
                    wgpu::VertexAttribute { offset: 8, shader_location: 1, format: wgpu::VertexFormat::Float32x4 },
                ],
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState { format, blend: Some(wgpu::BlendState::ALPHA_BLENDING), write_mask: wgpu::ColorWrites::ALL })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
        multiview: None,
        cache: None,
    })
}

/// Top-left pixel of a room centred on a `width` x `height` surface
pub fn room_origin(room: &Room, width: u32, height: u32) -> Vec2 {
    let room_size = Vec2::new(room.width() as f32, room.height() as f32) * TILE_SIZE;
    ((Vec2::new(width as f32, height as f32) - room_size) / 2.0).floor()
}

/// One quad per cell; only rebuilt when the room's terrain changes
pub fn build_background_mesh(room: &Room, origin: Vec2) -> Mesh {
    let mut mesh = Mesh::empty();
    for y in 0..room.height() as i32 {
        for x in 0..room.width() as i32 {
            if let Some(tile) = room.tile_at(x, y) {
                let pos = origin + Vec2::new(x as f32, y as f32) * TILE_SIZE;
                mesh.push_rect(pos.x, pos.y, TILE_SIZE, TILE_SIZE, tile.color());
            }
        }
    }
    mesh
}

/// Boulders first, player last so it draws on top
pub fn build_actor_mesh(room: &Room, origin: Vec2) -> Mesh {
    let mut mesh = Mesh::empty();
    for actor in room.boulders().chain(std::iter::once(room.player())) {
        let pos = (origin + actor.pixel_pos(TILE_SIZE)).floor();
        mesh.push_rect(pos.x, pos.y, TILE_SIZE, TILE_SIZE, actor.kind.color());
    }
    mesh
}

/// Identifies which terrain the cached background was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BackgroundKey {
    attempt: u64,
    revision: u64,
}

/// Everything the renderer keeps between frames
pub struct RenderState {
    // wgpu resources
    pub format: TextureFormat,
    pub alpha_mode: CompositeAlphaMode,
    pub width: u32,
    pub height: u32,

    pipeline: RenderPipeline,
    screen: ScreenResources,

    // Pre-rendered room terrain
    background: Option<MeshBuffer>,
    background_key: Option<BackgroundKey>,

    // UI
    pub egui_renderer: egui_wgpu::Renderer,
    pub egui_primitives: Option<Vec<egui::ClippedPrimitive>>,
    pub egui_full_output: Option<egui::FullOutput>,
    pub egui_dpr: f32,
}

impl RenderState {
    pub fn new(
        device: &Device,
        queue: &Queue,
        format: TextureFormat,
        alpha_mode: CompositeAlphaMode,
        width: u32,
        height: u32,
    ) -> Self {
        let screen = create_screen_resources(device);
        let pipeline = create_quad_pipeline(device, format, &screen.bind_group_layout);
        queue.write_buffer(&screen.buffer, 0, bytemuck::bytes_of(&ScreenUniform::new(width, height)));
        let egui_renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self {
            format,
            alpha_mode,
            width,
            height,
            pipeline,
            screen,
            background: None,
            background_key: None,
            egui_renderer,
            egui_primitives: None,
            egui_full_output: None,
            egui_dpr: 1.0,
        }
    }

    pub fn resize(&mut self, queue: &Queue, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        queue.write_buffer(&self.screen.buffer, 0, bytemuck::bytes_of(&ScreenUniform::new(width, height)));
        // origin moved; terrain must be rebuilt
        self.background_key = None;
    }

    fn refresh_background(&mut self, device: &Device, room: &Room, attempt: u64, origin: Vec2) {
        let key = BackgroundKey { attempt, revision: room.background_revision() };
        if self.background_key == Some(key) {
            return;
        }
        debug!(attempt, revision = key.revision, "rebuilding room background");
        self.background = Some(build_background_mesh(room, origin).upload(device));
        self.background_key = Some(key);
    }

    fn surface_config(&self) -> SurfaceConfiguration {
        SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: self.format,
            width: self.width,
            height: self.height,
            present_mode: PresentMode::Fifo,
            alpha_mode: self.alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    /// Draw the backdrop, the room (if one is active) and the egui overlay
    pub fn draw_frame(
        &mut self,
        device: &Device,
        queue: &Queue,
        surface: &Surface,
        room: Option<&Room>,
        attempt: u64,
    ) -> Result<(), SurfaceError> {
        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                surface.configure(device, &self.surface_config());
                surface.get_current_texture()?
            }
            Err(e) => return Err(e),
        };

        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        let actors = room.map(|room| {
            let origin = room_origin(room, self.width, self.height);
            self.refresh_background(device, room, attempt, origin);
            build_actor_mesh(room, origin).upload(device)
        });

        {
            let backdrop = hex_color(BACKDROP_COLOR);
            let mut rp = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("room_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(Color {
                            r: backdrop[0] as f64,
                            g: backdrop[1] as f64,
                            b: backdrop[2] as f64,
                            a: 1.0,
                        }),
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(actors) = &actors {
                rp.set_pipeline(&self.pipeline);
                rp.set_bind_group(0, &self.screen.bind_group, &[]);
                for mesh in self.background.iter().chain(std::iter::once(actors)) {
                    if mesh.index_count == 0 {
                        continue;
                    }
                    rp.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    rp.set_index_buffer(mesh.index_buffer.slice(..), IndexFormat::Uint32);
                    rp.draw_indexed(0..mesh.index_count, 0, 0..1);
                }
            }
        }

        if let (Some(primitives), Some(output)) = (self.egui_primitives.take(), self.egui_full_output.take()) {
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.width, self.height],
                pixels_per_point: self.egui_dpr,
            };

            for (id, image_delta) in &output.textures_delta.set {
                self.egui_renderer.update_texture(device, queue, *id, image_delta);
            }
            self.egui_renderer
                .update_buffers(device, queue, &mut encoder, &primitives, &screen_descriptor);

            {
                let egui_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                    label: Some("egui_render_pass"),
                    color_attachments: &[Some(RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: Operations {
                            load: LoadOp::Load,
                            store: StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

                self.egui_renderer
                    .render(&mut egui_pass.forget_lifetime(), &primitives, &screen_descriptor);
            }

            for id in &output.textures_delta.free {
                self.egui_renderer.free_texture(id);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
