//! Frame rendering logic.

use std::time::Duration;

use super::core::EmberApp;

impl EmberApp {
    /// Render a single frame. Any backend error is fatal.
    pub(super) fn render_frame(&mut self) {
        let (Some(backend), Some(scene)) = (self.backend.as_mut(), self.scene.as_mut()) else {
            return;
        };

        self.timer.begin_frame();
        self.camera.update();

        match scene.render_frame(backend, &self.renderer, &self.camera) {
            Ok(stats) => tracing::trace!(
                frame = scene.frame(),
                draws = stats.draw_calls,
                switches = stats.program_switches,
                uploads = stats.uniform_uploads,
                "frame submitted"
            ),
            Err(e) => {
                tracing::error!("Render error: {e}");
                self.should_exit = true;
                return;
            }
        }

        let interval = Duration::from_secs(u64::from(self.config.logging.fps_interval_secs));
        if self.timer.report_due(interval) {
            tracing::debug!(
                fps = self.timer.fps(),
                frame_ms = self.timer.frame_time_ms(),
                "frame rate"
            );
        }
    }
}
