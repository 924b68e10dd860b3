use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use bytemuck::{bytes_of, Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3, Vec4};
use log::{debug, info};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::common::{CameraParams, LightParams, LightSource, RenderBackend};
use crate::draw::DrawCommand;
use crate::geometry::{Mesh, Vertex};

/// GPU renderer backed by wgpu that shades the park like the classic
/// fixed-function pipeline.
pub struct Renderer {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    depth: DepthBuffer,
    pipeline: wgpu::RenderPipeline,
    global_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    mesh_cache: HashMap<String, MeshBuffers>,
    globals: GlobalUniform,
    clear_color: wgpu::Color,
    pending: Vec<DrawCommand>,
}

impl Renderer {
    /// Initializes the GPU renderer for the provided window.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(anyhow!("window has zero area"));
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to acquire GPU adapter")?;
        info!("using GPU adapter {}", adapter.get_info().name);

        let device_descriptor = wgpu::DeviceDescriptor {
            label: Some("park-device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            ..Default::default()
        };
        let (device, queue) = adapter
            .request_device(&device_descriptor)
            .await
            .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let Some(&first_format) = surface_caps.formats.first() else {
            return Err(anyhow!("surface reports no supported formats"));
        };
        // Lighting output is written as-is, without gamma encoding.
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|format| !format.is_srgb())
            .copied()
            .unwrap_or(first_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps
                .present_modes
                .iter()
                .copied()
                .find(|mode| {
                    matches!(
                        mode,
                        wgpu::PresentMode::Mailbox | wgpu::PresentMode::Immediate
                    )
                })
                .unwrap_or(wgpu::PresentMode::Fifo),
            desired_maximum_frame_latency: 2,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth = DepthBuffer::create(&device, config.width, config.height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("park-shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let global_layout = uniform_layout::<GlobalUniform>(&device, "global-bind-layout");
        let object_layout = uniform_layout::<ObjectConstants>(&device, "object-bind-layout");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("park-pipeline-layout"),
            bind_group_layouts: &[&global_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let global_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("global-uniform"),
            size: std::mem::size_of::<GlobalUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("global-bind-group"),
            layout: &global_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_buffer.as_entire_binding(),
            }],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("park-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x3,
                            offset: 0,
                            shader_location: 0,
                        },
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x3,
                            offset: (3 * std::mem::size_of::<f32>()) as u64,
                            shader_location: 1,
                        },
                    ],
                }],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            depth,
            pipeline,
            global_buffer,
            global_bind_group,
            object_layout,
            mesh_cache: HashMap::new(),
            globals: GlobalUniform::zeroed(),
            clear_color: wgpu::Color::BLACK,
            pending: Vec::new(),
        })
    }

    /// Resizes the swap chain to match the new dimensions.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthBuffer::create(&self.device, new_size.width, new_size.height);
    }

    /// Reconfigures the surface at the current size after it was lost.
    pub fn reconfigure(&mut self) {
        self.resize(self.size);
    }

    fn ensure_mesh_loaded(&mut self, command: &DrawCommand) {
        let key = command.primitive.mesh_key();
        if self.mesh_cache.contains_key(&key) {
            return;
        }
        let mesh = command.primitive.build_mesh();
        debug!(
            "uploading mesh {key}: {} vertices, {} triangles",
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        let buffers = MeshBuffers::from_mesh(&self.device, &mesh, &key);
        self.mesh_cache.insert(key, buffers);
    }

    fn object_bind_group(&self, command: &DrawCommand) -> wgpu::BindGroup {
        let normal = Mat3::from_mat4(command.model).inverse().transpose();
        let material = &command.material;
        let constants = ObjectConstants {
            model: command.model.to_cols_array_2d(),
            normal: mat3_to_3x4(normal),
            ambient: material.ambient.into(),
            diffuse: material.diffuse.into(),
            specular: material.specular.into(),
            emission: material.emission.into(),
            shininess: [material.shininess, 0.0, 0.0, 0.0],
        };

        let object_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("object-uniform"),
                contents: bytes_of(&constants),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: object_buffer.as_entire_binding(),
            }],
            label: Some("object-bind-group"),
        })
    }
}

impl RenderBackend for Renderer {
    type Error = wgpu::SurfaceError;

    fn clear(&mut self, color: Vec4) {
        self.clear_color = wgpu::Color {
            r: color.x as f64,
            g: color.y as f64,
            b: color.z as f64,
            a: color.w as f64,
        };
        self.pending.clear();
    }

    fn set_camera(&mut self, camera: &CameraParams) {
        self.globals.view_proj = camera.view_proj().to_cols_array_2d();
        self.globals.camera_position = camera.position.extend(1.0).into();
        let toward_eye = infinite_viewer_axis(camera.view);
        self.globals.options[1..].copy_from_slice(&toward_eye.to_array());
    }

    fn set_lighting(&mut self, lighting: &LightParams) {
        self.globals.global_ambient = lighting.global_ambient.into();
        self.globals.options[0] = f32::from(u8::from(lighting.local_viewer));
        self.globals.lights = lighting.sources.map(LightUniform::from);
    }

    fn draw(&mut self, commands: &[DrawCommand]) {
        for command in commands {
            self.ensure_mesh_loaded(command);
        }
        self.pending.extend_from_slice(commands);
    }

    /// Uploads the frame globals and submits every pending draw in one pass.
    fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.queue
            .write_buffer(&self.global_buffer, 0, bytes_of(&self.globals));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("park-encoder"),
            });

        let bind_groups: Vec<_> = self
            .pending
            .iter()
            .map(|command| self.object_bind_group(command))
            .collect();

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("park-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.global_bind_group, &[]);

        for (command, bind_group) in self.pending.iter().zip(bind_groups.iter()) {
            let Some(mesh) = self.mesh_cache.get(&command.primitive.mesh_key()) else {
                continue;
            };
            pass.set_vertex_buffer(0, mesh.vertex.slice(..));
            pass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint32);
            pass.set_bind_group(1, bind_group, &[]);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }

        drop(pass); // explicit to satisfy lifetimes on some backends
        self.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        output.present();
        self.pending.clear();
        Ok(())
    }
}

fn uniform_layout<T>(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: std::num::NonZeroU64::new(std::mem::size_of::<T>() as u64),
            },
            count: None,
        }],
    })
}

/// Eye-space +Z expressed in world space.
fn infinite_viewer_axis(view: Mat4) -> Vec3 {
    Mat3::from_mat4(view).transpose() * Vec3::Z
}

fn mat3_to_3x4(matrix: Mat3) -> [[f32; 4]; 3] {
    let cols = matrix.to_cols_array();
    [
        [cols[0], cols[1], cols[2], 0.0],
        [cols[3], cols[4], cols[5], 0.0],
        [cols[6], cols[7], cols[8], 0.0],
    ]
}

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn from_mesh(device: &wgpu::Device, mesh: &Mesh, label: &str) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex,
            index,
            index_count: mesh.indices.len() as u32,
        }
    }
}

struct DepthBuffer {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthBuffer {
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    fn create(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct LightUniform {
    position: [f32; 4],
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    /// constant, linear, quadratic, enabled
    attenuation: [f32; 4],
}

impl From<LightSource> for LightUniform {
    fn from(light: LightSource) -> Self {
        Self {
            position: light.position.into(),
            ambient: light.ambient.into(),
            diffuse: light.diffuse.into(),
            specular: light.specular.into(),
            attenuation: [
                light.attenuation.constant,
                light.attenuation.linear,
                light.attenuation.quadratic,
                f32::from(u8::from(light.enabled)),
            ],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct GlobalUniform {
    view_proj: [[f32; 4]; 4],
    camera_position: [f32; 4],
    global_ambient: [f32; 4],
    /// x: local viewer, yzw: world-space direction towards an infinite viewer
    options: [f32; 4],
    lights: [LightUniform; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ObjectConstants {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 3],
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    emission: [f32; 4],
    shininess: [f32; 4],
}

const SHADER: &str = r#"
struct Light {
    position: vec4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
    attenuation: vec4<f32>,
}

struct GlobalUniform {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    global_ambient: vec4<f32>,
    options: vec4<f32>,
    lights: array<Light, 2>,
}

struct ObjectConstants {
    model: mat4x4<f32>,
    normal: mat3x4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
    emission: vec4<f32>,
    shininess: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: GlobalUniform;

@group(1) @binding(0)
var<uniform> surface: ObjectConstants;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world_position = surface.model * vec4<f32>(input.position, 1.0);
    out.position = globals.view_proj * world_position;
    out.world_pos = world_position.xyz;

    let world_normal = mat3x3<f32>(
        surface.normal[0].xyz,
        surface.normal[1].xyz,
        surface.normal[2].xyz
    ) * input.normal;

    out.normal = normalize(world_normal);
    return out;
}

fn shade_light(light: Light, normal: vec3<f32>, world_pos: vec3<f32>, eye: vec3<f32>) -> vec3<f32> {
    if (light.attenuation.w < 0.5) {
        return vec3<f32>(0.0);
    }

    var to_light = normalize(light.position.xyz);
    var falloff = 1.0;
    if (light.position.w != 0.0) {
        let offset = light.position.xyz - world_pos;
        let dist = length(offset);
        to_light = offset / max(dist, 1e-6);
        falloff = 1.0 / (light.attenuation.x
            + light.attenuation.y * dist
            + light.attenuation.z * dist * dist);
    }

    let n_dot_l = max(dot(normal, to_light), 0.0);
    var color = light.ambient.rgb * surface.ambient.rgb
        + n_dot_l * light.diffuse.rgb * surface.diffuse.rgb;
    if (n_dot_l > 0.0) {
        let half_vector = normalize(to_light + eye);
        let n_dot_h = max(dot(normal, half_vector), 1e-6);
        color += pow(n_dot_h, surface.shininess.x) * light.specular.rgb * surface.specular.rgb;
    }
    return falloff * color;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(input.normal);
    var eye = globals.options.yzw;
    if (globals.options.x > 0.5) {
        eye = normalize(globals.camera_position.xyz - input.world_pos);
    }

    var color = surface.emission.rgb + globals.global_ambient.rgb * surface.ambient.rgb;
    color += shade_light(globals.lights[0], normal, input.world_pos, eye);
    color += shade_light(globals.lights[1], normal, input.world_pos, eye);
    return vec4<f32>(clamp(color, vec3<f32>(0.0), vec3<f32>(1.0)), surface.diffuse.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraState;
    use crate::lighting::Lighting;

    #[test]
    fn uniform_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 80);
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 64 + 16 * 3 + 2 * 80);
        assert_eq!(std::mem::size_of::<ObjectConstants>(), 64 + 48 + 16 * 5);
    }

    #[test]
    fn infinite_viewer_looks_back_along_the_view_direction() {
        let camera = CameraState::default();
        let axis = infinite_viewer_axis(camera.view_matrix());
        assert!(axis.distance(-camera.direction()) < 1e-5);

        let turned = CameraState {
            yaw: 90.0,
            pitch: 30.0,
            ..CameraState::default()
        };
        let axis = infinite_viewer_axis(turned.view_matrix());
        assert!(axis.distance(-turned.direction()) < 1e-5);
    }

    #[test]
    fn disabled_light_packs_zero_flag() {
        let mut lighting = Lighting::dusk();
        lighting.toggle_lamp();
        let [sun, lamp] = lighting.configure().sources.map(LightUniform::from);
        assert_eq!(sun.attenuation[3], 1.0);
        assert_eq!(lamp.attenuation[3], 0.0);
        assert_eq!(lamp.attenuation, [0.8, 0.03, 0.005, 0.0]);
        assert_eq!(lamp.position[3], 1.0);
    }
}
