//! wgpu implementation of [`GpuBackend`](crate::backend::GpuBackend).

mod backend;
mod context;
mod pipeline;

pub use backend::WgpuBackend;
pub use context::GpuContext;
