//! Per-frame recording state.
//!
//! A [`RenderContext`] replaces GL's implicit "current program" with an
//! explicit value. Programs and the renderer append commands to it; a
//! backend replays them with [`RenderContext::resolve_draws`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::backend::GpuBackend;
use crate::mesh::Topology;
use crate::shader::{ProgramId, ShaderProgram};

/// Alignment of uniform snapshots, the wgpu default for dynamic offsets.
pub const UNIFORM_ALIGNMENT: u32 = 256;

/// Render target size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

/// Counters for one recorded frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub program_switches: u32,
    pub uniform_uploads: u32,
}

/// One recorded state change or draw.
pub enum DrawCommand<'a, B: GpuBackend> {
    UseProgram(ProgramId),
    BindUniforms { offset: u32 },
    EnableAttribute { location: u32, buffer: &'a B::Buffer },
    BindIndexBuffer(&'a B::Buffer),
    DrawIndexed { topology: Topology, count: u32 },
    DisableAttribute { location: u32 },
}

impl<B: GpuBackend> fmt::Debug for DrawCommand<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCommand::UseProgram(id) => f.debug_tuple("UseProgram").field(id).finish(),
            DrawCommand::BindUniforms { offset } => f
                .debug_struct("BindUniforms")
                .field("offset", offset)
                .finish(),
            DrawCommand::EnableAttribute { location, buffer } => f
                .debug_struct("EnableAttribute")
                .field("location", location)
                .field("buffer", buffer)
                .finish(),
            DrawCommand::BindIndexBuffer(buffer) => {
                f.debug_tuple("BindIndexBuffer").field(buffer).finish()
            }
            DrawCommand::DrawIndexed { topology, count } => f
                .debug_struct("DrawIndexed")
                .field("topology", topology)
                .field("count", count)
                .finish(),
            DrawCommand::DisableAttribute { location } => f
                .debug_struct("DisableAttribute")
                .field("location", location)
                .finish(),
        }
    }
}

/// A draw with the state in effect when it was recorded.
pub struct ResolvedDraw<'a, B: GpuBackend> {
    pub program: ProgramId,
    /// Offset into [`RenderContext::uniform_bytes`], or `None` for a
    /// program without a uniform block.
    pub uniform_offset: Option<u32>,
    /// Enabled attribute buffers, sorted by location.
    pub attributes: Vec<(u32, &'a B::Buffer)>,
    pub index_buffer: &'a B::Buffer,
    pub count: u32,
    pub topology: Topology,
}

/// Recording state for one frame.
pub struct RenderContext<'a, B: GpuBackend> {
    clear_color: [f32; 4],
    cleared: bool,
    viewport: Viewport,
    active_program: Option<ProgramId>,
    bound_uniforms: Option<u32>,
    commands: Vec<DrawCommand<'a, B>>,
    uniform_arena: Vec<u8>,
    /// Latest snapshot per program: (block revision, arena offset).
    snapshots: HashMap<ProgramId, (u64, u32)>,
    stats: FrameStats,
}

impl<'a, B: GpuBackend> RenderContext<'a, B> {
    pub fn new(clear_color: [f32; 4], viewport: Viewport) -> Self {
        Self {
            clear_color,
            cleared: false,
            viewport,
            active_program: None,
            bound_uniforms: None,
            commands: Vec::new(),
            uniform_arena: Vec::new(),
            snapshots: HashMap::new(),
            stats: FrameStats::default(),
        }
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn was_cleared(&self) -> bool {
        self.cleared
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn active_program(&self) -> Option<ProgramId> {
        self.active_program
    }

    pub fn commands(&self) -> &[DrawCommand<'a, B>] {
        &self.commands
    }

    /// Packed uniform snapshots referenced by `BindUniforms` offsets.
    pub fn uniform_bytes(&self) -> &[u8] {
        &self.uniform_arena
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Drop everything recorded so far and start over with `color`.
    pub fn reset(&mut self, color: [f32; 4]) {
        self.clear_color = color;
        self.cleared = true;
        self.active_program = None;
        self.bound_uniforms = None;
        self.commands.clear();
        self.uniform_arena.clear();
        self.snapshots.clear();
        self.stats = FrameStats::default();
    }

    /// Make `program` active. Returns whether this was a switch.
    pub fn use_program(&mut self, program: ProgramId) -> bool {
        if self.active_program == Some(program) {
            return false;
        }
        self.active_program = Some(program);
        self.bound_uniforms = None;
        self.commands.push(DrawCommand::UseProgram(program));
        self.stats.program_switches += 1;
        true
    }

    /// Bind a snapshot of `program`'s uniform block, uploading a new one
    /// only if the block changed since its last snapshot in this frame.
    ///
    /// `program` must be the active program.
    pub fn bind_uniforms(&mut self, program: &ShaderProgram) {
        debug_assert_eq!(self.active_program, Some(program.id()));
        let block = program.uniforms();
        if block.size() == 0 {
            return;
        }

        let offset = match self.snapshots.get(&program.id()) {
            Some(&(revision, offset)) if revision == block.revision() => offset,
            _ => {
                let offset = align_up(self.uniform_arena.len() as u32, UNIFORM_ALIGNMENT);
                self.uniform_arena.resize(offset as usize, 0);
                self.uniform_arena.extend_from_slice(block.bytes());
                self.snapshots
                    .insert(program.id(), (block.revision(), offset));
                self.stats.uniform_uploads += 1;
                offset
            }
        };

        if self.bound_uniforms != Some(offset) {
            self.bound_uniforms = Some(offset);
            self.commands.push(DrawCommand::BindUniforms { offset });
        }
    }

    pub fn enable_attribute(&mut self, location: u32, buffer: &'a B::Buffer) {
        self.commands
            .push(DrawCommand::EnableAttribute { location, buffer });
    }

    pub fn disable_attribute(&mut self, location: u32) {
        self.commands.push(DrawCommand::DisableAttribute { location });
    }

    pub fn bind_index_buffer(&mut self, buffer: &'a B::Buffer) {
        self.commands.push(DrawCommand::BindIndexBuffer(buffer));
    }

    pub fn draw_indexed(&mut self, topology: Topology, count: u32) {
        self.commands
            .push(DrawCommand::DrawIndexed { topology, count });
        self.stats.draw_calls += 1;
    }

    /// Replay the command stream and return each draw with its state.
    ///
    /// Draws with no active program or no index buffer are skipped.
    pub fn resolve_draws(&self) -> Vec<ResolvedDraw<'a, B>> {
        let mut program = None;
        let mut uniforms = None;
        let mut attributes: BTreeMap<u32, &'a B::Buffer> = BTreeMap::new();
        let mut index = None;
        let mut draws = Vec::new();

        for command in &self.commands {
            match *command {
                DrawCommand::UseProgram(id) => {
                    program = Some(id);
                    uniforms = None;
                }
                DrawCommand::BindUniforms { offset } => uniforms = Some(offset),
                DrawCommand::EnableAttribute { location, buffer } => {
                    attributes.insert(location, buffer);
                }
                DrawCommand::DisableAttribute { location } => {
                    attributes.remove(&location);
                }
                DrawCommand::BindIndexBuffer(buffer) => index = Some(buffer),
                DrawCommand::DrawIndexed { topology, count } => {
                    if let (Some(program), Some(index_buffer)) = (program, index) {
                        draws.push(ResolvedDraw {
                            program,
                            uniform_offset: uniforms,
                            attributes: attributes.iter().map(|(&l, &b)| (l, b)).collect(),
                            index_buffer,
                            count,
                            topology,
                        });
                    }
                }
            }
        }
        draws
    }
}

fn align_up(value: u32, alignment: u32) -> u32 {
    value.div_ceil(alignment) * alignment
}
