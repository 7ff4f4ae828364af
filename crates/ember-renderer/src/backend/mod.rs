//! The seam between recorded frames and the device that executes them.

mod headless;

pub use headless::{DrawRecord, FrameRecord, HeadlessBackend, HeadlessBuffer};

use crate::context::{FrameStats, RenderContext};
use crate::error::RendererError;
use crate::shader::ShaderProgram;
use std::fmt;

/// Intended binding of a GPU buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    Vertex,
    Index,
}

/// A device that owns buffers and program pipelines and executes frames.
///
/// Buffers are released when the returned handle is dropped.
pub trait GpuBackend: Sized {
    type Buffer: fmt::Debug;

    /// Allocate a buffer initialised with `contents`.
    fn create_buffer(&self, label: &str, usage: BufferUsage, contents: &[u8]) -> Self::Buffer;

    /// Build device-side state for a linked program. Must be called before
    /// the program appears in a submitted frame.
    fn prepare_program(&mut self, program: &ShaderProgram) -> Result<(), RendererError>;

    /// Execute every draw recorded in `ctx`.
    fn submit(&mut self, ctx: &RenderContext<'_, Self>) -> Result<FrameStats, RendererError>;
}
