//! Ember rendering core.
//!
//! Icosphere generation, GPU mesh buffers, shader programs with reflected
//! uniform slots, and an explicit render context that records draw calls
//! for a [`GpuBackend`] to execute.

pub mod backend;
pub mod camera;
pub mod context;
pub mod error;
pub mod geometry;
pub mod gpu;
pub mod math;
pub mod mesh;
pub mod perf;
pub mod renderer;
pub mod shader;

pub use backend::{BufferUsage, GpuBackend, HeadlessBackend};
pub use camera::Camera;
pub use context::{FrameStats, RenderContext, Viewport};
pub use error::RendererError;
pub use geometry::{Icosphere, Mesh, MeshError};
pub use gpu::WgpuBackend;
pub use mesh::{MeshBuffer, Topology};
pub use perf::FrameTimer;
pub use renderer::Renderer;
pub use shader::{ShaderError, ShaderProgram, ShaderStage, UniformRole};
