//! Shader programs: stage compilation, linking, and uniform binding.
//!
//! Each stage is WGSL, parsed and validated with naga. Linking checks the
//! stage pair the way a GL linker would and resolves every known uniform
//! and attribute name to an optional slot. Setters for names a program does
//! not use are no-ops.

mod link;
mod program;
mod reflect;
mod uniforms;


pub use program::{ProgramId, ShaderProgram};
pub use reflect::{compile_stage, StageInterface};
pub use uniforms::{AttributeRole, UniformBlock, UniformKind, UniformRole, UniformSlot};

use std::fmt;

/// Programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub(crate) fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Compile or link failure. Always fatal for the program concerned.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ShaderError {
    #[error("{stage} shader '{label}' failed to compile:\n{diagnostic}")]
    Compile {
        stage: ShaderStage,
        label: String,
        diagnostic: String,
    },

    #[error("shader program '{label}' failed to link:\n{diagnostic}")]
    Link { label: String, diagnostic: String },
}
