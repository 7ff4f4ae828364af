//! Config reload polling and redraw scheduling.

use std::path::PathBuf;

use winit::event_loop::{ActiveEventLoop, ControlFlow};

use ember_config::schema::EmberConfig;
use ember_config::ReloadManager;

use crate::setup::{apply_camera_config, apply_render_config};

use super::core::EmberApp;

impl EmberApp {
    /// Start watching `path` on a background runtime. Changes are picked up
    /// by [`EmberApp::poll_config`].
    pub fn start_config_reload(&mut self, path: PathBuf) {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("ember-config")
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::warn!("Failed to start config reload runtime: {e}");
                return;
            }
        };

        tracing::info!("Watching {} for changes", path.display());
        let (_, rx) = runtime.block_on(ReloadManager::start(path));
        self.config_rx = Some(rx);
        self.tokio_runtime = Some(runtime);
    }

    /// Apply a reloaded config, if one was published.
    pub(super) fn poll_config(&mut self) {
        let Some(rx) = self.config_rx.as_mut() else {
            return;
        };
        match rx.has_changed() {
            Ok(true) => {}
            Ok(false) => return,
            Err(_) => {
                tracing::warn!("Config reload channel closed");
                self.config_rx = None;
                return;
            }
        }

        let config = rx.borrow_and_update().clone();
        self.apply_config(config);
    }

    fn apply_config(&mut self, mut config: EmberConfig) {
        if let Some(subdivisions) = self.subdivisions_override {
            config.scene.subdivisions = subdivisions;
        }

        if let Some(scene) = &mut self.scene {
            scene.apply_settings(&config.scene, config.render.wireframe);
        }
        if config.render.vsync != self.config.render.vsync {
            if let Some(backend) = &mut self.backend {
                backend.set_vsync(config.render.vsync);
            }
        }
        apply_render_config(&mut self.renderer, &config.render);
        apply_camera_config(&mut self.camera, &config.camera);

        tracing::info!(
            subdivisions = config.scene.subdivisions,
            wireframe = config.render.wireframe,
            "Config applied"
        );
        self.config = config;
    }

    /// Poll for config changes and keep frames coming.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        self.poll_config();
        self.request_redraw();
        event_loop.set_control_flow(ControlFlow::Wait);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_common::Color;
    use glam::Vec3;
    use tokio::sync::watch;

    #[test]
    fn published_config_is_applied_once() {
        let mut app = EmberApp::new(EmberConfig::default(), None);
        let (tx, rx) = watch::channel(EmberConfig::default());
        app.config_rx = Some(rx);

        app.poll_config();
        assert_eq!(app.config, EmberConfig::default());

        let mut edited = EmberConfig::default();
        edited.render.clear_color = Color::BLACK;
        edited.camera.eye = [0.0, 2.0, 6.0];
        tx.send(edited.clone()).unwrap();

        app.poll_config();
        assert_eq!(app.config, edited);
        assert_eq!(app.renderer.clear_color(), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(app.camera.eye(), Vec3::new(0.0, 2.0, 6.0));
    }

    #[test]
    fn subdivision_override_survives_reload() {
        let mut app = EmberApp::new(EmberConfig::default(), Some(2));
        let (tx, rx) = watch::channel(EmberConfig::default());
        app.config_rx = Some(rx);

        let mut edited = EmberConfig::default();
        edited.scene.subdivisions = 7;
        tx.send(edited).unwrap();

        app.poll_config();
        assert_eq!(app.config.scene.subdivisions, 2);
    }

    #[test]
    fn closed_channel_stops_polling() {
        let mut app = EmberApp::new(EmberConfig::default(), None);
        let (tx, rx) = watch::channel(EmberConfig::default());
        app.config_rx = Some(rx);
        drop(tx);

        app.poll_config();
        assert!(app.config_rx.is_none());
    }
}
