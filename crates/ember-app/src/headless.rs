//! Windowless frame loop on the headless backend.

use std::time::Instant;

use ember_config::schema::EmberConfig;
use ember_renderer::{FrameStats, HeadlessBackend, RendererError, Viewport};

use crate::scene::Scene;
use crate::setup::{build_camera, build_renderer};

/// Totals over a headless run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadlessSummary {
    pub frames: u32,
    pub draw_calls: u64,
    pub program_switches: u64,
    pub uniform_uploads: u64,
    pub live_buffers: usize,
}

impl HeadlessSummary {
    fn add(&mut self, stats: FrameStats) {
        self.frames += 1;
        self.draw_calls += u64::from(stats.draw_calls);
        self.program_switches += u64::from(stats.program_switches);
        self.uniform_uploads += u64::from(stats.uniform_uploads);
    }
}

/// Render `frames` frames of the configured scene without a window.
pub fn run(config: &EmberConfig, frames: u32) -> Result<HeadlessSummary, RendererError> {
    let viewport = Viewport::new(config.window.width, config.window.height);
    let mut backend = HeadlessBackend::new();
    let mut scene = Scene::new(&mut backend, &config.scene, config.render.wireframe)?;
    let renderer = build_renderer(config, viewport);
    let mut camera = build_camera(&config.camera, viewport);

    let started = Instant::now();
    let mut summary = HeadlessSummary::default();
    for _ in 0..frames {
        camera.update();
        let stats = scene.render_frame(&mut backend, &renderer, &camera)?;
        tracing::trace!(
            frame = scene.frame(),
            draws = stats.draw_calls,
            switches = stats.program_switches,
            uploads = stats.uniform_uploads,
            "headless frame"
        );
        summary.add(stats);
    }
    summary.live_buffers = backend.live_buffers();

    tracing::info!(
        frames = summary.frames,
        draw_calls = summary.draw_calls,
        program_switches = summary.program_switches,
        uniform_uploads = summary.uniform_uploads,
        live_buffers = summary.live_buffers,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "headless run complete"
    );
    Ok(summary)
}
