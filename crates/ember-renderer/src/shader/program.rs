//! Linked shader programs and their uniform setters.

use glam::{Mat4, Vec3, Vec4};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::link::link;
use super::reflect::compile_stage;
use super::uniforms::{AttributeRole, UniformBlock, UniformRole};
use super::{ShaderError, ShaderStage};
use crate::backend::GpuBackend;
use crate::context::RenderContext;
use crate::math::inverse_transpose;
use crate::mesh::MeshBuffer;

static NEXT_PROGRAM_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(u64);

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A linked vertex/fragment pair with its own uniform block image.
///
/// Setters only touch the CPU image, so they work whether or not the
/// program is active; the image is snapshotted into the frame when the
/// program draws.
#[derive(Debug)]
pub struct ShaderProgram {
    id: ProgramId,
    label: String,
    vertex_source: String,
    fragment_source: String,
    vertex_entry: String,
    fragment_entry: String,
    attributes: Vec<(AttributeRole, u32)>,
    uniforms: UniformBlock,
}

impl ShaderProgram {
    /// Compile both stages and link them. No partially linked program is
    /// ever returned.
    pub fn new(
        label: impl Into<String>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ShaderError> {
        let label = label.into();
        let vertex = compile_stage(ShaderStage::Vertex, &label, vertex_source)?;
        let fragment = compile_stage(ShaderStage::Fragment, &label, fragment_source)?;
        let linked = link(&label, &vertex, &fragment)?;

        let program = Self {
            id: ProgramId(NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed)),
            label,
            vertex_source: vertex_source.to_string(),
            fragment_source: fragment_source.to_string(),
            vertex_entry: vertex.entry_point,
            fragment_entry: fragment.entry_point,
            attributes: linked.attributes,
            uniforms: UniformBlock::new(linked.block_size, linked.slots),
        };

        tracing::info!(
            program = %program.label,
            id = %program.id,
            uniforms = UniformRole::ALL.iter().filter(|r| program.uniforms.has(**r)).count(),
            attributes = program.attributes.len(),
            block_bytes = program.uniforms.size(),
            "linked shader program"
        );
        Ok(program)
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vertex_source(&self) -> &str {
        &self.vertex_source
    }

    pub fn fragment_source(&self) -> &str {
        &self.fragment_source
    }

    pub fn vertex_entry_point(&self) -> &str {
        &self.vertex_entry
    }

    pub fn fragment_entry_point(&self) -> &str {
        &self.fragment_entry
    }

    /// Declared attributes with their locations, sorted by location.
    pub fn attributes(&self) -> &[(AttributeRole, u32)] {
        &self.attributes
    }

    pub fn attribute_location(&self, role: AttributeRole) -> Option<u32> {
        self.attributes
            .iter()
            .find(|(r, _)| *r == role)
            .map(|&(_, location)| location)
    }

    pub fn uniforms(&self) -> &UniformBlock {
        &self.uniforms
    }

    pub fn has_uniform(&self, role: UniformRole) -> bool {
        self.uniforms.has(role)
    }

    // -- setters ------------------------------------------------------------

    /// Set the model matrix and its inverse-transpose.
    pub fn set_model_matrix(&mut self, model: Mat4) {
        self.write_mat4(UniformRole::Model, model);
        self.write_mat4(UniformRole::ModelInvTr, inverse_transpose(model));
    }

    pub fn set_view_proj_matrix(&mut self, view_proj: Mat4) {
        self.write_mat4(UniformRole::ViewProj, view_proj);
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.uniforms
            .write(UniformRole::Color, bytemuck::bytes_of(&color));
    }

    pub fn set_secondary_color(&mut self, color: Vec4) {
        self.uniforms
            .write(UniformRole::SecondaryColor, bytemuck::bytes_of(&color));
    }

    pub fn set_time(&mut self, time: f32) {
        self.write_f32(UniformRole::Time, time);
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.write_f32(UniformRole::Scale, scale);
    }

    pub fn set_camera_position(&mut self, position: Vec3) {
        self.write_vec3(UniformRole::CameraPosition, position);
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.write_f32(UniformRole::Radius, radius);
    }

    pub fn set_irid_a(&mut self, v: Vec3) {
        self.write_vec3(UniformRole::IridA, v);
    }

    pub fn set_irid_b(&mut self, v: Vec3) {
        self.write_vec3(UniformRole::IridB, v);
    }

    pub fn set_irid_c(&mut self, v: Vec3) {
        self.write_vec3(UniformRole::IridC, v);
    }

    pub fn set_irid_d(&mut self, v: Vec3) {
        self.write_vec3(UniformRole::IridD, v);
    }

    pub fn set_perlin_frequency(&mut self, frequency: f32) {
        self.write_f32(UniformRole::PerlinFrequency, frequency);
    }

    pub fn set_fbm_amplitude(&mut self, amplitude: f32) {
        self.write_f32(UniformRole::FbmAmplitude, amplitude);
    }

    pub fn set_fbm_frequency(&mut self, frequency: f32) {
        self.write_f32(UniformRole::FbmFrequency, frequency);
    }

    fn write_f32(&mut self, role: UniformRole, value: f32) {
        self.uniforms.write(role, bytemuck::bytes_of(&value));
    }

    fn write_vec3(&mut self, role: UniformRole, value: Vec3) {
        self.uniforms.write(role, bytemuck::bytes_of(&value));
    }

    fn write_mat4(&mut self, role: UniformRole, value: Mat4) {
        self.uniforms
            .write(role, bytemuck::cast_slice(&value.to_cols_array()));
    }

    // -- recording ----------------------------------------------------------

    /// Make this the active program in `ctx`.
    pub fn activate<B: GpuBackend>(&self, ctx: &mut RenderContext<'_, B>) {
        ctx.use_program(self.id);
    }

    /// Record one indexed draw of `mesh` with the current uniform values.
    ///
    /// Only attributes both declared here and provided by the mesh are
    /// enabled, and they are disabled again after the draw. An empty mesh
    /// leaves only the activation behind.
    pub fn draw<'a, B: GpuBackend>(&self, ctx: &mut RenderContext<'a, B>, mesh: &'a MeshBuffer<B>) {
        self.activate(ctx);
        let count = mesh.element_count();
        let Some(index) = mesh.bind_index().filter(|_| count > 0) else {
            return;
        };

        ctx.bind_uniforms(self);

        let mut enabled = Vec::with_capacity(self.attributes.len());
        for &(role, location) in &self.attributes {
            if let Some(buffer) = mesh.attribute(role) {
                ctx.enable_attribute(location, buffer);
                enabled.push(location);
            }
        }

        ctx.bind_index_buffer(index);
        ctx.draw_indexed(mesh.primitive_topology(), count);

        for location in enabled {
            ctx.disable_attribute(location);
        }
    }
}
