use globe_core::mesh::{starfield, unit_box, uv_sphere, Vertex};
use globe_core::{GlobeConfig, SceneRenderer, SceneView};
use glam::Mat4;
use rand::prelude::*;
use web_sys as web;
use wgpu::util::DeviceExt;

mod helpers;
use helpers::{PipelineSpec, ADDITIVE_BLENDING};

// Sphere tessellation, matching the deployed globe.
const SPHERE_SEGMENTS: u32 = 50;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    group: [[f32; 4]; 4],
    eye_time: [f32; 4],
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MarkerInstance {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

struct Mesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl Mesh {
    fn upload(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u32]) -> Self {
        let vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ib = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertices: vb,
            indices: ib,
            index_count: indices.len() as u32,
        }
    }
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    globe_pipeline: wgpu::RenderPipeline,
    atmosphere_pipeline: wgpu::RenderPipeline,
    stars_pipeline: wgpu::RenderPipeline,
    marker_pipeline: wgpu::RenderPipeline,

    sphere: Mesh,
    marker_box: Mesh,
    stars: wgpu::Buffer,
    star_count: u32,
    instances: wgpu::Buffer,
    instance_capacity: usize,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
    atmosphere_scale: f32,
}

impl<'a> GpuState<'a> {
    pub async fn new(
        canvas: &'a web::HtmlCanvasElement,
        globe: &GlobeConfig,
        marker_count: usize,
    ) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let (depth_tex, depth_view) = helpers::create_depth_texture(&device, width, height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("globe_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::constants::GLOBE_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2],
        };
        let star_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3],
        };
        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MarkerInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &wgpu::vertex_attr_array![
                3 => Float32x4, 4 => Float32x4, 5 => Float32x4, 6 => Float32x4, 7 => Float32x4
            ],
        };

        let globe_pipeline = helpers::make_scene_pipeline(
            &device,
            &layout,
            &shader,
            format,
            PipelineSpec {
                label: "globe_pipeline",
                vs_entry: "vs_globe",
                fs_entry: "fs_globe",
                buffers: &[vertex_layout.clone()],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                blend: None,
                depth_write: true,
            },
        );
        let atmosphere_pipeline = helpers::make_scene_pipeline(
            &device,
            &layout,
            &shader,
            format,
            PipelineSpec {
                label: "atmosphere_pipeline",
                vs_entry: "vs_atmosphere",
                fs_entry: "fs_atmosphere",
                buffers: &[vertex_layout.clone()],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Front),
                blend: Some(ADDITIVE_BLENDING),
                depth_write: false,
            },
        );
        let stars_pipeline = helpers::make_scene_pipeline(
            &device,
            &layout,
            &shader,
            format,
            PipelineSpec {
                label: "stars_pipeline",
                vs_entry: "vs_stars",
                fs_entry: "fs_stars",
                buffers: &[star_layout],
                topology: wgpu::PrimitiveTopology::PointList,
                cull_mode: None,
                blend: None,
                depth_write: false,
            },
        );
        let marker_pipeline = helpers::make_scene_pipeline(
            &device,
            &layout,
            &shader,
            format,
            PipelineSpec {
                label: "marker_pipeline",
                vs_entry: "vs_marker",
                fs_entry: "fs_marker",
                buffers: &[vertex_layout, instance_layout],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                depth_write: false,
            },
        );

        let sphere_data = uv_sphere(globe.globe_radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS);
        let sphere = Mesh::upload(&device, "sphere", &sphere_data.vertices, &sphere_data.indices);
        let box_data = unit_box();
        let marker_box = Mesh::upload(&device, "marker_box", &box_data.vertices, &box_data.indices);

        let mut rng = StdRng::seed_from_u64(globe.stars.seed);
        let star_positions = starfield(globe.stars.count, globe.stars.spread, &mut rng);
        let stars = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("stars"),
            contents: bytemuck::cast_slice(&star_positions),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instance_capacity = marker_count.max(1);
        let instances = create_instance_buffer(&device, instance_capacity);

        log::info!(
            "[gpu] {}x{} format={:?} markers={} stars={}",
            width,
            height,
            format,
            marker_count,
            star_positions.len()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_tex,
            depth_view,
            uniform_buffer,
            bind_group,
            globe_pipeline,
            atmosphere_pipeline,
            stars_pipeline,
            marker_pipeline,
            sphere,
            marker_box,
            stars,
            star_count: star_positions.len() as u32,
            instances,
            instance_capacity,
            width,
            height,
            clear_color: wgpu::Color::BLACK,
            atmosphere_scale: globe.atmosphere_scale,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            (self.depth_tex, self.depth_view) =
                helpers::create_depth_texture(&self.device, width, height);
        }
    }

    fn write_instances(&mut self, view: &SceneView<'_>) -> u32 {
        let group = view.group_quat();
        let packed: Vec<MarkerInstance> = view
            .markers
            .iter()
            .map(|m| MarkerInstance {
                model: m.model_matrix(group).to_cols_array_2d(),
                color: [m.color[0], m.color[1], m.color[2], m.current_opacity],
            })
            .collect();
        if packed.len() > self.instance_capacity {
            self.instance_capacity = packed.len().next_power_of_two();
            self.instances = create_instance_buffer(&self.device, self.instance_capacity);
        }
        if !packed.is_empty() {
            self.queue
                .write_buffer(&self.instances, 0, bytemuck::cast_slice(&packed));
        }
        packed.len() as u32
    }

    pub fn render_scene(&mut self, view: &SceneView<'_>) -> Result<(), wgpu::SurfaceError> {
        let uniforms = SceneUniforms {
            view_proj: view.camera.view_projection().to_cols_array_2d(),
            group: Mat4::from_quat(view.group_quat()).to_cols_array_2d(),
            eye_time: view.camera.eye.extend(view.elapsed_sec).to_array(),
            params: [self.atmosphere_scale, 0.0, 0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        let marker_count = self.write_instances(view);

        let frame = self.surface.get_current_texture()?;
        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
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
            rpass.set_bind_group(0, &self.bind_group, &[]);

            rpass.set_pipeline(&self.stars_pipeline);
            rpass.set_vertex_buffer(0, self.stars.slice(..));
            rpass.draw(0..self.star_count, 0..1);

            rpass.set_vertex_buffer(0, self.sphere.vertices.slice(..));
            rpass.set_index_buffer(self.sphere.indices.slice(..), wgpu::IndexFormat::Uint32);
            rpass.set_pipeline(&self.globe_pipeline);
            rpass.draw_indexed(0..self.sphere.index_count, 0, 0..1);
            rpass.set_pipeline(&self.atmosphere_pipeline);
            rpass.draw_indexed(0..self.sphere.index_count, 0, 0..1);

            if marker_count > 0 {
                rpass.set_pipeline(&self.marker_pipeline);
                rpass.set_vertex_buffer(0, self.marker_box.vertices.slice(..));
                rpass.set_vertex_buffer(1, self.instances.slice(..));
                rpass.set_index_buffer(
                    self.marker_box.indices.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                rpass.draw_indexed(0..self.marker_box.index_count, 0, 0..marker_count);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl<'a> SceneRenderer for GpuState<'a> {
    type Error = wgpu::SurfaceError;

    fn render(&mut self, view: &SceneView<'_>) -> Result<(), Self::Error> {
        self.render_scene(view)
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("marker_instances"),
        size: (capacity * std::mem::size_of::<MarkerInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
