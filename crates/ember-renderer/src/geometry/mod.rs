//! Procedural mesh generation.

mod icosphere;
mod types;

pub use icosphere::Icosphere;
pub use types::{Mesh, MeshError};
