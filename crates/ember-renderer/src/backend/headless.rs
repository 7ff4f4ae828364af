//! A backend with no device behind it.
//!
//! Buffers are counted rather than allocated and each submitted frame is
//! kept as a [`FrameRecord`]. Used by tests and by `--headless` runs.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{BufferUsage, GpuBackend};
use crate::context::{FrameStats, RenderContext, Viewport};
use crate::error::RendererError;
use crate::mesh::Topology;
use crate::shader::{ProgramId, ShaderProgram};

/// A counted stand-in for a GPU buffer.
#[derive(Debug)]
pub struct HeadlessBuffer {
    id: u64,
    usage: BufferUsage,
    size: usize,
    live: Rc<Cell<usize>>,
}

impl HeadlessBuffer {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Drop for HeadlessBuffer {
    fn drop(&mut self) {
        self.live.set(self.live.get().saturating_sub(1));
    }
}

/// One indexed draw as executed.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub program: ProgramId,
    pub uniform_offset: Option<u32>,
    /// `(location, buffer id)` pairs, sorted by location.
    pub attributes: Vec<(u32, u64)>,
    pub index_buffer: u64,
    pub count: u32,
    pub topology: Topology,
}

/// One submitted frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub clear_color: [f32; 4],
    pub cleared: bool,
    pub viewport: Viewport,
    pub draws: Vec<DrawRecord>,
    pub uniform_bytes: usize,
    pub stats: FrameStats,
}

#[derive(Debug)]
struct PreparedProgram {
    label: String,
}

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: Cell<u64>,
    live: Rc<Cell<usize>>,
    created: Cell<u64>,
    programs: HashMap<ProgramId, PreparedProgram>,
    frames: Vec<FrameRecord>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers created and not yet dropped.
    pub fn live_buffers(&self) -> usize {
        self.live.get()
    }

    /// Buffers created over the backend's lifetime.
    pub fn buffers_created(&self) -> u64 {
        self.created.get()
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&FrameRecord> {
        self.frames.last()
    }

    pub fn is_prepared(&self, id: ProgramId) -> bool {
        self.programs.contains_key(&id)
    }

    pub fn program_label(&self, id: ProgramId) -> Option<&str> {
        self.programs.get(&id).map(|p| p.label.as_str())
    }
}

impl GpuBackend for HeadlessBackend {
    type Buffer = HeadlessBuffer;

    fn create_buffer(&self, _label: &str, usage: BufferUsage, contents: &[u8]) -> HeadlessBuffer {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.created.set(self.created.get() + 1);
        self.live.set(self.live.get() + 1);
        HeadlessBuffer {
            id,
            usage,
            size: contents.len(),
            live: Rc::clone(&self.live),
        }
    }

    fn prepare_program(&mut self, program: &ShaderProgram) -> Result<(), RendererError> {
        self.programs.insert(
            program.id(),
            PreparedProgram {
                label: program.label().to_string(),
            },
        );
        Ok(())
    }

    fn submit(&mut self, ctx: &RenderContext<'_, Self>) -> Result<FrameStats, RendererError> {
        let mut draws = Vec::new();
        for draw in ctx.resolve_draws() {
            if !self.programs.contains_key(&draw.program) {
                return Err(RendererError::UnknownProgram(draw.program));
            }
            if draw.index_buffer.usage() != BufferUsage::Index {
                return Err(RendererError::Pipeline(format!(
                    "buffer {} bound as index buffer",
                    draw.index_buffer.id()
                )));
            }
            let index_capacity = draw.index_buffer.size() / std::mem::size_of::<u32>();
            if draw.count as usize > index_capacity {
                return Err(RendererError::Pipeline(format!(
                    "draw of {} elements exceeds index buffer of {index_capacity}",
                    draw.count
                )));
            }
            draws.push(DrawRecord {
                program: draw.program,
                uniform_offset: draw.uniform_offset,
                attributes: draw
                    .attributes
                    .iter()
                    .map(|(location, buffer)| (*location, buffer.id()))
                    .collect(),
                index_buffer: draw.index_buffer.id(),
                count: draw.count,
                topology: draw.topology,
            });
        }

        let stats = ctx.stats();
        self.frames.push(FrameRecord {
            clear_color: ctx.clear_color(),
            cleared: ctx.was_cleared(),
            viewport: ctx.viewport(),
            draws,
            uniform_bytes: ctx.uniform_bytes().len(),
            stats,
        });
        Ok(stats)
    }
}
