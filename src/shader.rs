// shader.rs: program compile/link and cached handles

use crate::error::RenderError;
use log::info;

pub const VERTEX_SHADER: &str = include_str!("shaders/sphere_vertex.wgsl");
pub const FRAGMENT_SHADER: &str = include_str!("shaders/sphere_fragment.wgsl");

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

pub const UNIFORM_GROUP: u32 = 0;
pub const TEXTURE_GROUP: u32 = 1;

/// Attribute locations and uniform bindings of the sphere program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramHandles {
    pub position: u32,
    pub tex_coordinate: u32,
    pub transform: u32,
    pub texture_transform: u32,
    pub texture: u32,
    pub sampler: u32,
}

pub const HANDLES: ProgramHandles = ProgramHandles {
    position: 0,
    tex_coordinate: 1,
    transform: 0,
    texture_transform: 1,
    texture: 0,
    sampler: 1,
};

pub const COORDS_PER_VERTEX: u64 = 3;
pub const TEX_COORDS_PER_VERTEX: u64 = 2;
const FLOAT_SIZE: u64 = std::mem::size_of::<f32>() as u64;

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x3,
    offset: 0,
    shader_location: HANDLES.position,
}];

const TEX_COORDINATE_ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x2,
    offset: 0,
    shader_location: HANDLES.tex_coordinate,
}];

/// Position and texture-coordinate streams live in separate buffers (slots 0 and 1).
pub fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
    [
        wgpu::VertexBufferLayout {
            array_stride: COORDS_PER_VERTEX * FLOAT_SIZE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POSITION_ATTRIBUTES,
        },
        wgpu::VertexBufferLayout {
            array_stride: TEX_COORDS_PER_VERTEX * FLOAT_SIZE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &TEX_COORDINATE_ATTRIBUTES,
        },
    ]
}

pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    pub uniform_layout: wgpu::BindGroupLayout,
    pub texture_layout: wgpu::BindGroupLayout,
    pub handles: ProgramHandles,
}

impl ShaderProgram {
    /// Compiles both stages and links them into a pipeline. Any error log is
    /// returned to the caller; no half-built program escapes.
    pub fn compile_and_link(
        device: &wgpu::Device,
        vertex_source: &str,
        fragment_source: &str,
        color_format: wgpu::TextureFormat,
    ) -> Result<Self, RenderError> {
        let vertex = compile(device, "vertex", vertex_source)?;
        let fragment = compile(device, "fragment", fragment_source)?;

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                uniform_entry(HANDLES.transform),
                uniform_entry(HANDLES.texture_transform),
            ],
            label: Some("transform_bind_group_layout"),
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: HANDLES.texture,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: HANDLES.sampler,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("video_bind_group_layout"),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sphere Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sphere Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: "vs_main",
                buffers: &vertex_layouts(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // 从球体内部观看，不剔除
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        if let Some(e) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::ProgramLink { log: e.to_string() });
        }

        info!("Sphere program linked");
        Ok(Self { pipeline, uniform_layout, texture_layout, handles: HANDLES })
    }

    /// Makes the program current for the pass.
    pub fn activate<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
    }
}

fn compile(device: &wgpu::Device, stage: &'static str, source: &str) -> Result<wgpu::ShaderModule, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(stage),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(e) => Err(RenderError::ShaderCompile { stage, log: e.to_string() }),
        None => Ok(module),
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(64),
        },
        count: None,
    }
}
