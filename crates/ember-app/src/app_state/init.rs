//! Window creation, GPU backend initialization and scene setup.

use std::sync::Arc;

use winit::event_loop::ActiveEventLoop;
use winit::window::WindowAttributes;

use ember_renderer::WgpuBackend;

use crate::scene::Scene;

use super::core::EmberApp;

impl EmberApp {
    /// Create the window, the GPU backend and the scene.
    /// Returns `false` if initialization failed and the event loop should exit.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let attrs = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                f64::from(self.config.window.width),
                f64::from(self.config.window.height),
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                return false;
            }
        };

        let mut backend =
            match pollster::block_on(WgpuBackend::new(window.clone(), self.config.render.vsync)) {
                Ok(backend) => backend,
                Err(e) => {
                    tracing::error!("Failed to initialize GPU backend: {e}");
                    return false;
                }
            };

        let scene = match Scene::new(&mut backend, &self.config.scene, self.config.render.wireframe) {
            Ok(scene) => scene,
            Err(e) => {
                tracing::error!("Failed to build scene: {e}");
                return false;
            }
        };

        // the surface may differ from the requested logical size
        let size = backend.size();
        self.renderer.set_viewport(size.width, size.height);
        self.camera.set_aspect_ratio(size.aspect_ratio());
        self.camera.update_projection_matrix();

        tracing::info!(
            width = size.width,
            height = size.height,
            subdivisions = scene.level().subdivisions,
            "Window initialized"
        );

        self.window = Some(window);
        self.backend = Some(backend);
        self.scene = Some(scene);
        true
    }
}
