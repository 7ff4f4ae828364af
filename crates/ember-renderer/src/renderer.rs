//! Frame-level orchestration.

use crate::backend::GpuBackend;
use crate::camera::Camera;
use crate::context::{FrameStats, RenderContext, Viewport};
use crate::error::RendererError;
use crate::mesh::MeshBuffer;
use crate::shader::ShaderProgram;

/// Holds frame-wide settings and records passes into a [`RenderContext`].
///
/// It has no ordering policy: passes draw in the order they are rendered.
#[derive(Debug, Clone)]
pub struct Renderer {
    clear_color: [f32; 4],
    viewport: Viewport,
}

impl Renderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            viewport,
        }
    }

    pub fn set_clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.clear_color = [r, g, b, a];
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Start recording a frame at the current viewport.
    pub fn begin_frame<'a, B: GpuBackend>(&self) -> RenderContext<'a, B> {
        RenderContext::new(self.clear_color, self.viewport)
    }

    /// Clear color and depth: anything recorded earlier in the frame is
    /// discarded and no program is active afterwards.
    pub fn clear<B: GpuBackend>(&self, ctx: &mut RenderContext<'_, B>) {
        ctx.reset(self.clear_color);
    }

    /// Push the camera into `program` and draw each mesh in order.
    ///
    /// An empty mesh list draws nothing and leaves the active program alone.
    pub fn render<'a, B: GpuBackend>(
        &self,
        ctx: &mut RenderContext<'a, B>,
        camera: &Camera,
        program: &mut ShaderProgram,
        meshes: &[&'a MeshBuffer<B>],
    ) {
        program.set_view_proj_matrix(camera.view_proj());
        for &mesh in meshes {
            program.draw(ctx, mesh);
        }
    }

    /// Hand the recorded frame to `backend`.
    pub fn finish<B: GpuBackend>(
        &self,
        backend: &mut B,
        ctx: &RenderContext<'_, B>,
    ) -> Result<FrameStats, RendererError> {
        backend.submit(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::geometry::Icosphere;
    use crate::mesh::Topology;
    use crate::shader::tests::lit_program;
    use crate::shader::UniformRole;
    use glam::Vec3;

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 45.0, 1.0, 0.1, 100.0)
    }

    #[test]
    fn empty_render_list_draws_nothing() {
        let renderer = Renderer::new(Viewport::new(100, 100));
        let mut program = lit_program();
        let mut ctx = renderer.begin_frame::<HeadlessBackend>();
        renderer.clear(&mut ctx);
        renderer.render(&mut ctx, &camera(), &mut program, &[]);
        assert_eq!(ctx.stats().draw_calls, 0);
        assert_eq!(ctx.active_program(), None);
    }

    #[test]
    fn render_sets_view_projection() {
        let renderer = Renderer::new(Viewport::new(100, 100));
        let mut program = lit_program();
        let mut ctx = renderer.begin_frame::<HeadlessBackend>();
        let cam = camera();
        renderer.render(&mut ctx, &cam, &mut program, &[]);
        let floats = program.uniforms().read_floats(UniformRole::ViewProj).unwrap();
        assert_eq!(floats, cam.view_proj().to_cols_array());
    }

    #[test]
    fn render_draws_each_mesh_in_order() {
        let mut backend = HeadlessBackend::new();
        let a = MeshBuffer::upload(
            &backend,
            &Icosphere::build(Vec3::ZERO, 1.0, 0),
            Topology::TriangleList,
        );
        let b = MeshBuffer::upload(
            &backend,
            &Icosphere::build(Vec3::ZERO, 1.0, 1),
            Topology::TriangleList,
        );
        let mut program = lit_program();
        backend.prepare_program(&program).unwrap();

        let mut renderer = Renderer::new(Viewport::new(100, 100));
        renderer.set_clear_color(0.2, 0.2, 0.2, 1.0);
        let mut ctx = renderer.begin_frame();
        renderer.clear(&mut ctx);
        renderer.render(&mut ctx, &camera(), &mut program, &[&a, &b]);
        let stats = renderer.finish(&mut backend, &ctx).unwrap();

        assert_eq!(stats.draw_calls, 2);
        assert_eq!(stats.program_switches, 1);
        let frame = backend.last_frame().unwrap();
        let counts: Vec<u32> = frame.draws.iter().map(|d| d.count).collect();
        assert_eq!(counts, [60, 240]);
        assert_eq!(frame.clear_color, [0.2, 0.2, 0.2, 1.0]);
        assert!(frame.cleared);
    }

    #[test]
    fn clear_discards_earlier_draws() {
        let backend = HeadlessBackend::new();
        let mesh = MeshBuffer::upload(
            &backend,
            &Icosphere::build(Vec3::ZERO, 1.0, 0),
            Topology::TriangleList,
        );
        let mut program = lit_program();
        let renderer = Renderer::new(Viewport::new(100, 100));
        let mut ctx = renderer.begin_frame();
        renderer.render(&mut ctx, &camera(), &mut program, &[&mesh]);
        renderer.clear(&mut ctx);
        assert_eq!(ctx.stats().draw_calls, 0);
        assert!(ctx.resolve_draws().is_empty());
    }

    #[test]
    fn unprepared_program_is_rejected() {
        let mut backend = HeadlessBackend::new();
        let mesh = MeshBuffer::upload(
            &backend,
            &Icosphere::build(Vec3::ZERO, 1.0, 0),
            Topology::TriangleList,
        );
        let mut program = lit_program();
        let renderer = Renderer::new(Viewport::new(100, 100));
        let mut ctx = renderer.begin_frame();
        renderer.render(&mut ctx, &camera(), &mut program, &[&mesh]);
        let err = renderer.finish(&mut backend, &ctx).unwrap_err();
        assert!(matches!(err, RendererError::UnknownProgram(id) if id == program.id()));
    }
}
