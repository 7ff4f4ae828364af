//! Executes recorded frames on a window surface.

use std::collections::HashMap;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use super::context::GpuContext;
use super::pipeline::{create_depth_view, GpuProgram, PipelineKey};
use crate::backend::{BufferUsage, GpuBackend};
use crate::context::{FrameStats, RenderContext, ResolvedDraw, Viewport};
use crate::error::RendererError;
use crate::mesh::Topology;
use crate::shader::{ProgramId, ShaderProgram};

const INITIAL_UNIFORM_CAPACITY: u64 = 64 * 1024;

/// Generic attribute value for declared attributes a mesh does not provide.
const FALLBACK_ATTRIBUTE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

pub struct WgpuBackend {
    gpu: GpuContext,
    depth_view: wgpu::TextureView,
    programs: HashMap<ProgramId, GpuProgram>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    uniform_buffer: wgpu::Buffer,
    uniform_capacity: u64,
    fallback_attribute: wgpu::Buffer,
}

impl WgpuBackend {
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RendererError> {
        let gpu = GpuContext::new(window, vsync).await?;
        let depth_view = create_depth_view(&gpu.device, gpu.size.width, gpu.size.height);
        let uniform_buffer = create_uniform_buffer(&gpu.device, INITIAL_UNIFORM_CAPACITY);
        let fallback_attribute = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("fallback attribute"),
                contents: bytemuck::cast_slice(&FALLBACK_ATTRIBUTE),
                usage: wgpu::BufferUsages::VERTEX,
            });

        Ok(Self {
            gpu,
            depth_view,
            programs: HashMap::new(),
            pipelines: HashMap::new(),
            uniform_buffer,
            uniform_capacity: INITIAL_UNIFORM_CAPACITY,
            fallback_attribute,
        })
    }

    pub fn size(&self) -> Viewport {
        self.gpu.size
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.depth_view = create_depth_view(&self.gpu.device, self.gpu.size.width, self.gpu.size.height);
    }

    pub fn set_vsync(&mut self, vsync: bool) {
        self.gpu.set_vsync(vsync);
    }

    /// Grow the uniform buffer to hold `bytes` and upload them.
    fn upload_uniforms(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let needed = bytes.len() as u64;
        if needed > self.uniform_capacity {
            let capacity = needed.next_power_of_two();
            tracing::debug!(from = self.uniform_capacity, to = capacity, "growing uniform buffer");
            self.uniform_buffer = create_uniform_buffer(&self.gpu.device, capacity);
            self.uniform_capacity = capacity;
            for program in self.programs.values_mut() {
                program.rebind(&self.gpu.device, &self.uniform_buffer);
            }
        }
        self.gpu.queue.write_buffer(&self.uniform_buffer, 0, bytes);
    }

    fn pipeline_key(&self, draw: &ResolvedDraw<'_, Self>) -> Result<PipelineKey, RendererError> {
        let program = self
            .programs
            .get(&draw.program)
            .ok_or(RendererError::UnknownProgram(draw.program))?;
        let provided = program
            .attributes
            .iter()
            .filter(|(_, location)| draw.attributes.iter().any(|(l, _)| l == location))
            .fold(0, |mask, (role, _)| mask | role.bit());
        Ok(PipelineKey {
            program: draw.program,
            provided,
            topology: draw.topology,
        })
    }

    fn ensure_pipeline(&mut self, key: PipelineKey) -> Result<(), RendererError> {
        if self.pipelines.contains_key(&key) {
            return Ok(());
        }
        let program = self
            .programs
            .get(&key.program)
            .ok_or(RendererError::UnknownProgram(key.program))?;
        tracing::debug!(
            program = %program.label,
            provided = key.provided,
            topology = ?key.topology,
            "building pipeline"
        );
        let device = &self.gpu.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = program.build_pipeline(device, self.gpu.format(), key.provided, key.topology);
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RendererError::Pipeline(format!(
                "program '{}' ({:?}): {err}",
                program.label, key.topology
            )));
        }
        self.pipelines.insert(key, pipeline);
        Ok(())
    }
}

impl GpuBackend for WgpuBackend {
    type Buffer = wgpu::Buffer;

    fn create_buffer(&self, label: &str, usage: BufferUsage, contents: &[u8]) -> wgpu::Buffer {
        let usage = match usage {
            BufferUsage::Vertex => wgpu::BufferUsages::VERTEX,
            BufferUsage::Index => wgpu::BufferUsages::INDEX,
        };
        self.gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            })
    }

    /// Create the program's modules and its full-attribute triangle
    /// pipeline inside a validation scope, so device-side failures surface
    /// here rather than mid-frame.
    fn prepare_program(&mut self, program: &ShaderProgram) -> Result<(), RendererError> {
        let device = &self.gpu.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let gpu_program = GpuProgram::new(device, program, &self.uniform_buffer);
        let key = PipelineKey {
            program: program.id(),
            provided: gpu_program.full_mask(),
            topology: Topology::TriangleList,
        };
        let pipeline = gpu_program.build_pipeline(device, self.gpu.format(), key.provided, key.topology);

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RendererError::Pipeline(format!(
                "program '{}': {err}",
                program.label()
            )));
        }

        tracing::info!(program = program.label(), "prepared GPU program");
        self.programs.insert(program.id(), gpu_program);
        self.pipelines.insert(key, pipeline);
        Ok(())
    }

    fn submit(&mut self, ctx: &RenderContext<'_, Self>) -> Result<FrameStats, RendererError> {
        let draws = ctx.resolve_draws();
        let keys = draws
            .iter()
            .map(|draw| self.pipeline_key(draw))
            .collect::<Result<Vec<_>, _>>()?;
        for &key in &keys {
            self.ensure_pipeline(key)?;
        }
        self.upload_uniforms(ctx.uniform_bytes());

        let output = match self.gpu.current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("surface lost or outdated, reconfiguring and skipping frame");
                self.gpu.reconfigure();
                return Ok(ctx.stats());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface texture timed out, skipping frame");
                return Ok(ctx.stats());
            }
            Err(e) => return Err(e.into()),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ember frame encoder"),
            });

        let [r, g, b, a] = ctx.clear_color().map(f64::from);
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ember main pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
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

            let viewport = ctx.viewport();
            let width = viewport.width.clamp(1, self.gpu.size.width);
            let height = viewport.height.clamp(1, self.gpu.size.height);
            pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);

            for (draw, key) in draws.iter().zip(&keys) {
                let (Some(pipeline), Some(program)) =
                    (self.pipelines.get(key), self.programs.get(&draw.program))
                else {
                    continue;
                };
                pass.set_pipeline(pipeline);
                if let Some(bind_group) = &program.bind_group {
                    pass.set_bind_group(0, bind_group, &[draw.uniform_offset.unwrap_or(0)]);
                }
                for (slot, (_, location)) in program.attributes.iter().enumerate() {
                    let buffer = draw
                        .attributes
                        .iter()
                        .find(|(l, _)| l == location)
                        .map_or(&self.fallback_attribute, |&(_, buffer)| buffer);
                    pass.set_vertex_buffer(slot as u32, buffer.slice(..));
                }
                pass.set_index_buffer(draw.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..draw.count, 0, 0..1);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(ctx.stats())
    }
}

fn create_uniform_buffer(device: &wgpu::Device, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("ember uniform arena"),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
