use crate::shader::{ProgramId, ShaderError};

/// Errors that can occur while preparing or submitting GPU work.
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("surface error: {0}")]
    SurfaceError(String),

    #[error("no suitable GPU adapter found")]
    AdapterNotFound,

    #[error("device error: {0}")]
    DeviceError(String),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("pipeline error: {0}")]
    Pipeline(String),

    #[error("program {0} was not prepared on this backend")]
    UnknownProgram(ProgramId),
}

impl From<wgpu::SurfaceError> for RendererError {
    fn from(e: wgpu::SurfaceError) -> Self {
        RendererError::SurfaceError(e.to_string())
    }
}

impl From<wgpu::RequestDeviceError> for RendererError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        RendererError::DeviceError(e.to_string())
    }
}

impl From<wgpu::CreateSurfaceError> for RendererError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        RendererError::SurfaceError(e.to_string())
    }
}
