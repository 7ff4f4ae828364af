//! The ember face: meshes, programs and the per-frame pass sequence.

pub mod pose;

#[cfg(test)]
mod tests;

use glam::{Mat4, Vec3, Vec4};

use ember_common::Color;
use ember_config::schema::{FlameConfig, SceneConfig};
use ember_renderer::{
    Camera, FrameStats, GpuBackend, Icosphere, MeshBuffer, RenderContext, Renderer,
    RendererError, ShaderProgram, Topology,
};

use crate::shaders::ProgramKind;

use pose::{BODY_RADIUS, BROW_RADIUS, EYEBALL_RADIUS, LASH_RADIUS, MOUTH_RADIUS, NOSE_RADIUS};

/// Tip color of the translucent outer flame.
const FLAME_TIP: Vec4 = Vec4::new(1.0, 0.9, 0.55, 1.0);

fn to_vec4(color: Color) -> Vec4 {
    Vec4::from_array(color.to_rgba_f32())
}

fn to_vec3(v: [f64; 3]) -> Vec3 {
    Vec3::new(v[0] as f32, v[1] as f32, v[2] as f32)
}

/// What the meshes are built for. Any change means a full rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryLevel {
    pub subdivisions: u32,
    pub topology: Topology,
}

impl GeometryLevel {
    pub fn new(subdivisions: u32, wireframe: bool) -> Self {
        Self {
            subdivisions,
            topology: if wireframe {
                Topology::LineList
            } else {
                Topology::TriangleList
            },
        }
    }
}

/// One linked program per face part.
#[derive(Debug)]
pub struct ScenePrograms {
    pub body: ShaderProgram,
    pub flame: ShaderProgram,
    pub brows: ShaderProgram,
    pub eye: ShaderProgram,
    pub lash: ShaderProgram,
    pub eyeball: ShaderProgram,
    pub nose: ShaderProgram,
    pub mouth: ShaderProgram,
}

impl ScenePrograms {
    pub fn build() -> Result<Self, RendererError> {
        Ok(Self {
            body: ProgramKind::Body.build()?,
            flame: ProgramKind::Flame.build()?,
            brows: ProgramKind::Brows.build()?,
            eye: ProgramKind::Eye.build()?,
            lash: ProgramKind::Lash.build()?,
            eyeball: ProgramKind::Eyeball.build()?,
            nose: ProgramKind::Nose.build()?,
            mouth: ProgramKind::Mouth.build()?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShaderProgram> {
        [
            &self.body,
            &self.flame,
            &self.brows,
            &self.eye,
            &self.lash,
            &self.eyeball,
            &self.nose,
            &self.mouth,
        ]
        .into_iter()
    }
}

/// GPU meshes for every face part at one geometry level.
#[derive(Debug)]
pub struct SceneMeshes<B: GpuBackend> {
    pub body: MeshBuffer<B>,
    pub outer_flame: MeshBuffer<B>,
    pub left_brow: MeshBuffer<B>,
    pub right_brow: MeshBuffer<B>,
    pub eye: MeshBuffer<B>,
    pub lash: MeshBuffer<B>,
    pub eyeball: MeshBuffer<B>,
    pub nose: MeshBuffer<B>,
    pub mouth: MeshBuffer<B>,
}

impl<B: GpuBackend> SceneMeshes<B> {
    pub const COUNT: usize = 9;

    pub fn build(backend: &B, level: GeometryLevel) -> Self {
        let sphere = |center: Vec3, radius: f32| {
            let mesh = Icosphere::build(center, radius, level.subdivisions);
            MeshBuffer::upload(backend, &mesh, level.topology)
        };

        Self {
            body: sphere(Vec3::ZERO, BODY_RADIUS),
            outer_flame: sphere(Vec3::ZERO, BODY_RADIUS),
            left_brow: sphere(pose::LEFT_BROW_POS, BROW_RADIUS),
            right_brow: sphere(pose::right_brow_pos(), BROW_RADIUS),
            eye: sphere(Vec3::ZERO, BROW_RADIUS),
            lash: sphere(Vec3::ZERO, LASH_RADIUS),
            eyeball: sphere(Vec3::ZERO, EYEBALL_RADIUS),
            nose: sphere(Vec3::ZERO, NOSE_RADIUS),
            mouth: sphere(Vec3::ZERO, MOUTH_RADIUS),
        }
    }
}

/// Drives the face: keeps geometry in sync with the settings and records
/// the fixed pass sequence each frame.
#[derive(Debug)]
pub struct Scene<B: GpuBackend> {
    programs: ScenePrograms,
    meshes: SceneMeshes<B>,
    level: GeometryLevel,
    settings: SceneConfig,
    wireframe: bool,
    frame: u32,
}

impl<B: GpuBackend> Scene<B> {
    /// Link every program, prepare it on `backend` and build the meshes.
    pub fn new(backend: &mut B, settings: &SceneConfig, wireframe: bool) -> Result<Self, RendererError> {
        let programs = ScenePrograms::build()?;
        for program in programs.iter() {
            backend.prepare_program(program)?;
        }

        let level = GeometryLevel::new(settings.subdivisions, wireframe);
        let meshes = SceneMeshes::build(backend, level);
        tracing::info!(
            subdivisions = level.subdivisions,
            topology = ?level.topology,
            "scene geometry built"
        );

        Ok(Self {
            programs,
            meshes,
            level,
            settings: settings.clone(),
            wireframe,
            frame: 0,
        })
    }

    pub fn level(&self) -> GeometryLevel {
        self.level
    }

    pub fn settings(&self) -> &SceneConfig {
        &self.settings
    }

    pub fn programs(&self) -> &ScenePrograms {
        &self.programs
    }

    /// Frames rendered so far; drives the `time` uniform.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Take new settings. Geometry follows on the next frame.
    pub fn apply_settings(&mut self, settings: &SceneConfig, wireframe: bool) {
        self.settings = settings.clone();
        self.wireframe = wireframe;
    }

    /// Rebuild the meshes if the requested level differs from the built one.
    /// Returns whether a rebuild happened.
    pub fn sync_geometry(&mut self, backend: &B) -> bool {
        let requested = GeometryLevel::new(self.settings.subdivisions, self.wireframe);
        if requested == self.level {
            return false;
        }

        tracing::info!(
            from = self.level.subdivisions,
            to = requested.subdivisions,
            topology = ?requested.topology,
            "rebuilding scene geometry"
        );
        // the previous buffers are released on assignment
        self.meshes = SceneMeshes::build(backend, requested);
        self.level = requested;
        true
    }

    /// Advance one frame: sync geometry, record every pass, submit.
    pub fn render_frame(
        &mut self,
        backend: &mut B,
        renderer: &Renderer,
        camera: &Camera,
    ) -> Result<FrameStats, RendererError> {
        self.sync_geometry(backend);
        self.frame = self.frame.wrapping_add(1);

        let mut ctx = renderer.begin_frame::<B>();
        renderer.clear(&mut ctx);
        record_passes(
            &mut ctx,
            renderer,
            camera,
            &mut self.programs,
            &self.meshes,
            &self.settings,
            self.frame as f32,
        );
        renderer.finish(backend, &ctx)
    }
}

fn apply_flame_look(program: &mut ShaderProgram, flame: &FlameConfig) {
    program.set_irid_a(to_vec3(flame.irid_a));
    program.set_irid_b(to_vec3(flame.irid_b));
    program.set_irid_c(to_vec3(flame.irid_c));
    program.set_irid_d(to_vec3(flame.irid_d));
    program.set_perlin_frequency(flame.perlin_freq as f32);
    program.set_fbm_amplitude(flame.fbm_amp as f32);
    program.set_fbm_frequency(flame.fbm_freq as f32);
}

/// Body, brows, eyes, lashes, eyeballs, nose, mouth, outer flame.
fn record_passes<'a, B: GpuBackend>(
    ctx: &mut RenderContext<'a, B>,
    renderer: &Renderer,
    camera: &Camera,
    programs: &mut ScenePrograms,
    meshes: &'a SceneMeshes<B>,
    settings: &SceneConfig,
    time: f32,
) {
    let geom_color = to_vec4(settings.geom_color);
    let eye_pos = camera.eye();
    let palette = &settings.palette;

    let body = &mut programs.body;
    apply_flame_look(body, &settings.flame);
    body.set_color(geom_color);
    body.set_time(time);
    body.set_scale(1.0);
    body.set_model_matrix(Mat4::IDENTITY);
    body.set_camera_position(eye_pos);
    renderer.render(ctx, camera, body, &[&meshes.body]);

    let brows = &mut programs.brows;
    apply_flame_look(brows, &settings.flame);
    brows.set_color(geom_color);
    brows.set_time(time);
    brows.set_scale(1.0);
    brows.set_radius(BROW_RADIUS);
    brows.set_model_matrix(Mat4::IDENTITY);
    brows.set_camera_position(eye_pos);
    renderer.render(ctx, camera, brows, &[&meshes.left_brow, &meshes.right_brow]);

    let eye = &mut programs.eye;
    eye.set_color(to_vec4(palette.eye));
    eye.set_radius(BROW_RADIUS);
    eye.set_model_matrix(pose::left_eye());
    renderer.render(ctx, camera, eye, &[&meshes.eye]);
    eye.set_model_matrix(pose::right_eye());
    renderer.render(ctx, camera, eye, &[&meshes.eye]);

    let lash = &mut programs.lash;
    lash.set_color(to_vec4(palette.lash));
    lash.set_radius(LASH_RADIUS);
    lash.set_model_matrix(pose::left_lash());
    renderer.render(ctx, camera, lash, &[&meshes.lash]);
    lash.set_model_matrix(pose::right_lash());
    renderer.render(ctx, camera, lash, &[&meshes.lash]);

    let eyeball = &mut programs.eyeball;
    eyeball.set_color(to_vec4(palette.eyeball));
    eyeball.set_time(time);
    eyeball.set_radius(EYEBALL_RADIUS);
    eyeball.set_model_matrix(pose::left_eyeball());
    renderer.render(ctx, camera, eyeball, &[&meshes.eyeball]);
    eyeball.set_model_matrix(pose::right_eyeball());
    renderer.render(ctx, camera, eyeball, &[&meshes.eyeball]);

    let nose = &mut programs.nose;
    nose.set_color(to_vec4(palette.nose));
    nose.set_model_matrix(pose::nose());
    let nose_meshes = settings.nose.then_some(&meshes.nose);
    renderer.render(ctx, camera, nose, nose_meshes.as_slice());

    let mouth = &mut programs.mouth;
    mouth.set_color(to_vec4(palette.mouth));
    mouth.set_model_matrix(pose::mouth());
    let mouth_meshes = settings.mouth.then_some(&meshes.mouth);
    renderer.render(ctx, camera, mouth, mouth_meshes.as_slice());

    let flame = &mut programs.flame;
    apply_flame_look(flame, &settings.flame);
    flame.set_color(geom_color);
    flame.set_secondary_color(FLAME_TIP);
    flame.set_time(time);
    flame.set_scale(settings.outer_flame_scale as f32);
    flame.set_model_matrix(Mat4::IDENTITY);
    flame.set_camera_position(eye_pos);
    let flame_meshes = settings.outer_flame.then_some(&meshes.outer_flame);
    renderer.render(ctx, camera, flame, flame_meshes.as_slice());
}
