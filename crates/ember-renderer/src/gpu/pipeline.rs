//! Per-program GPU state and render pipeline construction.

use std::num::NonZeroU64;

use crate::mesh::Topology;
use crate::shader::{AttributeRole, ProgramId, ShaderProgram};

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Every vertex stream is one `vec4<f32>`.
const ATTRIBUTE_STRIDE: wgpu::BufferAddress = 16;

/// Which declared attributes a draw provides real buffers for.
pub(crate) type AttributeMask = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PipelineKey {
    pub program: ProgramId,
    pub provided: AttributeMask,
    pub topology: Topology,
}

/// Modules and layouts for one prepared program.
pub(crate) struct GpuProgram {
    pub label: String,
    pub vertex_module: wgpu::ShaderModule,
    pub fragment_module: wgpu::ShaderModule,
    pub vertex_entry: String,
    pub fragment_entry: String,
    /// Declared attributes in vertex-buffer slot order.
    pub attributes: Vec<(AttributeRole, u32)>,
    pub uniform_size: u64,
    pub bind_group_layout: Option<wgpu::BindGroupLayout>,
    pub bind_group: Option<wgpu::BindGroup>,
    pub pipeline_layout: wgpu::PipelineLayout,
}

impl GpuProgram {
    pub fn new(device: &wgpu::Device, program: &ShaderProgram, uniform_buffer: &wgpu::Buffer) -> Self {
        let label = program.label().to_string();
        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{label} vertex")),
            source: wgpu::ShaderSource::Wgsl(program.vertex_source().into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{label} fragment")),
            source: wgpu::ShaderSource::Wgsl(program.fragment_source().into()),
        });

        let uniform_size = u64::from(program.uniforms().size());
        let bind_group_layout = NonZeroU64::new(uniform_size).map(|size| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label} uniforms layout")),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: Some(size),
                    },
                    count: None,
                }],
            })
        });

        let layouts: Vec<&wgpu::BindGroupLayout> = bind_group_layout.iter().collect();
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} pipeline layout")),
            bind_group_layouts: &layouts,
            push_constant_ranges: &[],
        });

        let mut gpu_program = Self {
            label,
            vertex_module,
            fragment_module,
            vertex_entry: program.vertex_entry_point().to_string(),
            fragment_entry: program.fragment_entry_point().to_string(),
            attributes: program.attributes().to_vec(),
            uniform_size,
            bind_group_layout,
            bind_group: None,
            pipeline_layout,
        };
        gpu_program.rebind(device, uniform_buffer);
        gpu_program
    }

    /// Mask with every declared attribute provided.
    pub fn full_mask(&self) -> AttributeMask {
        self.attributes
            .iter()
            .fold(0, |mask, (role, _)| mask | role.bit())
    }

    /// Point the bind group at `uniform_buffer`, after it was (re)created.
    pub fn rebind(&mut self, device: &wgpu::Device, uniform_buffer: &wgpu::Buffer) {
        self.bind_group = self.bind_group_layout.as_ref().map(|layout| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{} uniforms", self.label)),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: uniform_buffer,
                        offset: 0,
                        size: NonZeroU64::new(self.uniform_size),
                    }),
                }],
            })
        });
    }

    /// Build a pipeline where attributes missing from `provided` read a
    /// single per-instance fallback value instead of a vertex stream.
    pub fn build_pipeline(
        &self,
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        provided: AttributeMask,
        topology: Topology,
    ) -> wgpu::RenderPipeline {
        let attributes: Vec<[wgpu::VertexAttribute; 1]> = self
            .attributes
            .iter()
            .map(|&(_, location)| {
                [wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 0,
                    shader_location: location,
                }]
            })
            .collect();
        let buffers: Vec<wgpu::VertexBufferLayout> = self
            .attributes
            .iter()
            .zip(&attributes)
            .map(|(&(role, _), attribute)| wgpu::VertexBufferLayout {
                array_stride: ATTRIBUTE_STRIDE,
                step_mode: if provided & role.bit() != 0 {
                    wgpu::VertexStepMode::Vertex
                } else {
                    wgpu::VertexStepMode::Instance
                },
                attributes: attribute,
            })
            .collect();

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{} pipeline", self.label)),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.vertex_module,
                entry_point: Some(&self.vertex_entry),
                buffers: &buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.fragment_module,
                entry_point: Some(&self.fragment_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: topology.to_wgpu(),
                front_face: wgpu::FrontFace::Ccw,
                // mirrored parts flip winding, so nothing is culled
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

pub(crate) fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("ember depth"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
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
