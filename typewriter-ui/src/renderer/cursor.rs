//! Cursor rendering pipeline

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, Buffer, Device, Queue, RenderPass, RenderPipeline, TextureFormat};

use crate::elements::text_writing::{TextWritingStyle, WritingFrame};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct CursorVertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl CursorVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CursorVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct CursorUniforms {
    viewport: [f32; 4], // width, height, 0, 0
}

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Draws the typewriter cursor as a single solid quad
pub struct CursorRenderer {
    pipeline: RenderPipeline,
    uniform_buffer: Buffer,
    bind_group: BindGroup,
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    visible: bool,
}

impl CursorRenderer {
    /// Create a new cursor renderer
    pub fn new(device: &Device, format: TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Cursor Shader"),
            source: wgpu::ShaderSource::Wgsl(CURSOR_SHADER.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Cursor Bind Group Layout"),
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cursor Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Cursor Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[CursorVertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
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
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cursor Uniform Buffer"),
            contents: bytemuck::cast_slice(&[CursorUniforms {
                viewport: [800.0, 600.0, 0.0, 0.0],
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Cursor Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // One quad, rewritten in place every frame
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cursor Vertex Buffer"),
            contents: bytemuck::cast_slice(&[CursorVertex::zeroed(); 4]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cursor Index Buffer"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            vertex_buffer,
            index_buffer,
            visible: false,
        }
    }

    /// Prepare the frame's cursor for rendering
    pub fn prepare(
        &mut self,
        queue: &Queue,
        frame: &WritingFrame,
        style: &TextWritingStyle,
        viewport: [f32; 2],
        scale_factor: f32,
    ) {
        let Some(cursor) = frame.cursor.as_ref() else {
            self.visible = false;
            return;
        };

        let [r, g, b, a] = style.cursor_color;
        let alpha = a * cursor.opacity;
        if alpha <= 0.0 {
            self.visible = false;
            return;
        }

        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[CursorUniforms {
                viewport: [viewport[0], viewport[1], 0.0, 0.0],
            }]),
        );

        let [w, h] = style.cursor_size();
        // Centered on the text line
        let x = (frame.origin[0] + cursor.left) * scale_factor;
        let y = (frame.origin[1] + (style.line_height() - h) / 2.0) * scale_factor;
        let w = w * scale_factor;
        let h = h * scale_factor;
        let color = [r, g, b, alpha];

        let vertices = [
            CursorVertex { position: [x, y], color },
            CursorVertex { position: [x + w, y], color },
            CursorVertex { position: [x + w, y + h], color },
            CursorVertex { position: [x, y + h], color },
        ];
        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        self.visible = true;
    }

    /// Render the prepared cursor
    pub fn render<'a>(&'a self, render_pass: &mut RenderPass<'a>) {
        if !self.visible {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}

const CURSOR_SHADER: &str = r#"
struct Uniforms {
    viewport: vec4<f32>, // width, height, 0, 0
}

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;

    // Pixels to clip space, y down
    let clip_x = (in.position.x / uniforms.viewport.x) * 2.0 - 1.0;
    let clip_y = 1.0 - (in.position.y / uniforms.viewport.y) * 2.0;

    out.clip_position = vec4<f32>(clip_x, clip_y, 0.0, 1.0);
    out.color = in.color;

    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
