//! wgpu implementation of [`Canvas`].
//!
//! Draw calls are batched on the CPU during a frame and submitted in one
//! render pass by [`GpuCanvas::present`]:
//!
//! 1. clear to the fill color
//! 2. sprites (glows and discs, in call order)
//! 3. lines
//! 4. vignette, if one was requested
//!
//! The scene issues every sprite before any line, so batching by type keeps
//! the painter's order.

mod shader;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};
use log::{debug, info};
use winit::window::Window;

use crate::canvas::{Canvas, Viewport};
use crate::error::GpuError;

use shader::SHADER_SOURCE;

const SPRITE_GLOW: u32 = 0;
const SPRITE_DISC: u32 = 1;

/// Initial instance capacity; buffers grow by doubling.
const INITIAL_CAPACITY: usize = 1024;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct FrameUniforms {
    size: [f32; 2],
    vignette_inner: f32,
    vignette_outer: f32,
    vignette_color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SpriteInstance {
    center: [f32; 2],
    radius: f32,
    kind: u32,
    color: [f32; 4],
}

impl SpriteInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32, 2 => Uint32, 3 => Float32x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LineInstance {
    from: [f32; 2],
    to: [f32; 2],
    start: [f32; 4],
    end: [f32; 4],
    width: f32,
    _pad: [f32; 3],
}

impl LineInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// A growable instance buffer.
struct InstanceBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: usize,
}

impl InstanceBuffer {
    fn new<T: Pod>(device: &wgpu::Device, label: &'static str, capacity: usize) -> Self {
        Self {
            label,
            buffer: create_instance_buffer::<T>(device, label, capacity),
            capacity,
        }
    }

    /// Upload `data`, reallocating if it no longer fits.
    fn write<T: Pod>(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[T]) {
        if data.is_empty() {
            return;
        }
        if data.len() > self.capacity {
            let capacity = data.len().next_power_of_two();
            debug!("growing {} to {} instances", self.label, capacity);
            self.buffer = create_instance_buffer::<T>(device, self.label, capacity);
            self.capacity = capacity;
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
    }
}

fn create_instance_buffer<T: Pod>(
    device: &wgpu::Device,
    label: &'static str,
    capacity: usize,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (capacity * std::mem::size_of::<T>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// A window surface that implements [`Canvas`].
pub struct GpuCanvas {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    /// Requested size; may be zero while the window is minimized.
    size: Viewport,
    sprite_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    vignette_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    sprite_buffer: InstanceBuffer,
    line_buffer: InstanceBuffer,
    clear_color: wgpu::Color,
    sprites: Vec<SpriteInstance>,
    lines: Vec<LineInstance>,
    vignette: Option<(f32, f32, Vec4)>,
}

impl GpuCanvas {
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;
        info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colors are authored in sRGB, so write them unconverted.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(GpuError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Backdrop Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Backdrop Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let sprite_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            "Sprite Pipeline",
            ("vs_sprite", "fs_sprite"),
            &[SpriteInstance::layout()],
            surface_format,
        );
        let line_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            "Line Pipeline",
            ("vs_line", "fs_line"),
            &[LineInstance::layout()],
            surface_format,
        );
        let vignette_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            "Vignette Pipeline",
            ("vs_vignette", "fs_vignette"),
            &[],
            surface_format,
        );

        let sprite_buffer =
            InstanceBuffer::new::<SpriteInstance>(&device, "Sprite Instance Buffer", INITIAL_CAPACITY);
        let line_buffer =
            InstanceBuffer::new::<LineInstance>(&device, "Line Instance Buffer", INITIAL_CAPACITY);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size: Viewport::new(size.width, size.height),
            sprite_pipeline,
            line_pipeline,
            vignette_pipeline,
            uniform_buffer,
            uniform_bind_group,
            sprite_buffer,
            line_buffer,
            clear_color: wgpu::Color::BLACK,
            sprites: Vec::new(),
            lines: Vec::new(),
            vignette: None,
        })
    }

    /// Reconfigure the surface at the current size, after it was lost.
    pub fn reconfigure(&mut self) {
        if !self.size.is_empty() {
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Submit the batched frame and present it.
    ///
    /// A zero-sized surface drops the batch and presents nothing.
    pub fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        if self.size.is_empty() {
            self.clear_batches();
            return Ok(());
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (inner, outer, color) = self.vignette.unwrap_or((0.0, 1.0, Vec4::ZERO));
        let uniforms = FrameUniforms {
            size: [self.config.width as f32, self.config.height as f32],
            vignette_inner: inner,
            vignette_outer: outer,
            vignette_color: color.to_array(),
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        self.sprite_buffer.write(&self.device, &self.queue, &self.sprites);
        self.line_buffer.write(&self.device, &self.queue, &self.lines);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Backdrop Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Backdrop Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            if !self.sprites.is_empty() {
                render_pass.set_pipeline(&self.sprite_pipeline);
                render_pass.set_vertex_buffer(0, self.sprite_buffer.buffer.slice(..));
                render_pass.draw(0..6, 0..self.sprites.len() as u32);
            }

            if !self.lines.is_empty() {
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_vertex_buffer(0, self.line_buffer.buffer.slice(..));
                render_pass.draw(0..6, 0..self.lines.len() as u32);
            }

            if self.vignette.is_some() {
                render_pass.set_pipeline(&self.vignette_pipeline);
                render_pass.draw(0..3, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.clear_batches();
        Ok(())
    }

    fn clear_batches(&mut self) {
        self.sprites.clear();
        self.lines.clear();
        self.vignette = None;
    }
}

impl Canvas for GpuCanvas {
    fn size(&self) -> Viewport {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = Viewport::new(width, height);
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn fill(&mut self, color: Vec4) {
        self.clear_batches();
        self.clear_color = wgpu::Color {
            r: color.x as f64,
            g: color.y as f64,
            b: color.z as f64,
            a: 1.0,
        };
    }

    fn glow(&mut self, center: Vec2, radius: f32, color: Vec4) {
        self.sprites.push(SpriteInstance {
            center: center.to_array(),
            radius,
            kind: SPRITE_GLOW,
            color: color.to_array(),
        });
    }

    fn disc(&mut self, center: Vec2, radius: f32, color: Vec4) {
        self.sprites.push(SpriteInstance {
            center: center.to_array(),
            radius,
            kind: SPRITE_DISC,
            color: color.to_array(),
        });
    }

    fn gradient_line(&mut self, from: Vec2, to: Vec2, width: f32, start: Vec4, end: Vec4) {
        self.lines.push(LineInstance {
            from: from.to_array(),
            to: to.to_array(),
            start: start.to_array(),
            end: end.to_array(),
            width,
            _pad: [0.0; 3],
        });
    }

    fn vignette(&mut self, inner: f32, outer: f32, color: Vec4) {
        self.vignette = Some((inner, outer, color));
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &str,
    (vs_entry, fs_entry): (&str, &str),
    buffers: &[wgpu::VertexBufferLayout<'_>],
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs_entry),
            buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
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
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
