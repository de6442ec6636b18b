use crate::rendering::{Globals, Locals, RenderError, RenderResult, Vertex};
use crate::simulation::Scene;
use anyhow::Result;
use wgpu::util::DeviceExt;
use winit::window::Window;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

struct GpuMesh {
    vertex_buf: wgpu::Buffer,
    index_buf: wgpu::Buffer,
    index_count: u32,
}

struct GpuObject {
    mesh: usize,
    locals_buf: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    transparent: bool,
}

/// Forward renderer over wgpu. Uploads the assembled scene once at
/// construction; per frame it refreshes the camera/light globals and the
/// ring transforms, then draws opaque geometry followed by the blended lobes.
pub struct Renderer<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    depth_view: wgpu::TextureView,
    globals_buf: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    opaque_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,
    meshes: Vec<GpuMesh>,
    objects: Vec<GpuObject>,
    background: wgpu::Color,
}

impl<'w> Renderer<'w> {
    pub async fn new(window: &'w Window, scene: &Scene) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
                ..Default::default()
            })
            .await
            .ok_or(RenderError::NoAdapter)?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .map_err(RenderError::Device)?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[uniform_entry(0)],
        });
        let locals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("locals_bgl"),
            entries: &[uniform_entry(0)],
        });

        let globals_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buf.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &locals_layout],
            push_constant_ranges: &[],
        });
        let opaque_pipeline =
            create_scene_pipeline(&device, &pipeline_layout, &shader, format, false);
        let transparent_pipeline =
            create_scene_pipeline(&device, &pipeline_layout, &shader, format, true);

        // Upload the mesh pool and one uniform slot per scene node.
        let meshes = scene
            .meshes
            .iter()
            .map(|mesh| GpuMesh {
                vertex_buf: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_vertices"),
                    contents: bytemuck::cast_slice(&mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                index_buf: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_indices"),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: mesh.indices.len() as u32,
            })
            .collect();

        let objects = scene
            .nodes
            .iter()
            .map(|node| {
                let locals = Locals {
                    model: node.model_matrix().to_cols_array_2d(),
                    color: node.color,
                };
                let locals_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("locals"),
                    contents: bytemuck::bytes_of(&locals),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("locals_bg"),
                    layout: &locals_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: locals_buf.as_entire_binding(),
                    }],
                });
                GpuObject {
                    mesh: node.mesh,
                    locals_buf,
                    bind_group,
                    transparent: node.transparent,
                }
            })
            .collect();

        let background = wgpu::Color {
            r: scene.background[0] as f64,
            g: scene.background[1] as f64,
            b: scene.background[2] as f64,
            a: 1.0,
        };

        log::info!(
            "renderer ready: {} meshes, {} objects, {}x{} {format:?}",
            scene.meshes.len(),
            scene.nodes.len(),
            config.width,
            config.height,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            depth_view,
            globals_buf,
            globals_bind_group,
            opaque_pipeline,
            transparent_pipeline,
            meshes,
            objects,
            background,
        })
    }

    /// Reconfigure the output surface. Zero-sized viewports (minimized
    /// window) are ignored; the old configuration stays valid.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, &self.config);
    }

    pub fn render(&mut self, scene: &Scene) -> RenderResult<()> {
        self.queue.write_buffer(
            &self.globals_buf,
            0,
            bytemuck::bytes_of(&globals_from(scene)),
        );
        // only ring transforms change after assembly
        for ring in &scene.rings {
            let node = &scene.nodes[ring.node];
            let locals = Locals {
                model: node.model_matrix().to_cols_array_2d(),
                color: node.color,
            };
            self.queue
                .write_buffer(&self.objects[ring.node].locals_buf, 0, bytemuck::bytes_of(&locals));
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // stale swapchain; reconfigure and draw again next tick
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
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
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);

            rpass.set_pipeline(&self.opaque_pipeline);
            for object in self.objects.iter().filter(|o| !o.transparent) {
                draw_object(&mut rpass, object, &self.meshes);
            }
            rpass.set_pipeline(&self.transparent_pipeline);
            for object in self.objects.iter().filter(|o| o.transparent) {
                draw_object(&mut rpass, object, &self.meshes);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn draw_object<'a>(
    rpass: &mut wgpu::RenderPass<'a>,
    object: &'a GpuObject,
    meshes: &'a [GpuMesh],
) {
    let mesh = &meshes[object.mesh];
    rpass.set_bind_group(1, &object.bind_group, &[]);
    rpass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
    rpass.set_index_buffer(mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
    rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
}

fn globals_from(scene: &Scene) -> Globals {
    let key_dir = scene.lights.key.position.normalize_or_zero();
    let fill_dir = scene.lights.fill.position.normalize_or_zero();
    Globals {
        view_proj: scene.camera.view_projection().to_cols_array_2d(),
        camera_pos: scene.camera.position.extend(1.0).to_array(),
        fog: [
            scene.fog.color[0],
            scene.fog.color[1],
            scene.fog.color[2],
            scene.fog.density,
        ],
        light0_dir: key_dir.extend(0.0).to_array(),
        light0_color: scene.lights.key.color.extend(1.0).to_array(),
        light1_dir: fill_dir.extend(0.0).to_array(),
        light1_color: scene.lights.fill.color.extend(1.0).to_array(),
        ambient: scene.lights.ambient.extend(1.0).to_array(),
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_scene_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    transparent: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(if transparent {
            "transparent_pipeline"
        } else {
            "opaque_pipeline"
        }),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[Vertex::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(if transparent {
                    wgpu::BlendState::ALPHA_BLENDING
                } else {
                    wgpu::BlendState::REPLACE
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // rings and lobes are double-sided
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            // blended lobes test against depth but do not occlude
            depth_write_enabled: !transparent,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}
