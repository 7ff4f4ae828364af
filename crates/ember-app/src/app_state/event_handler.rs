//! `ApplicationHandler` implementation for the winit event loop.

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use super::core::EmberApp;

impl ApplicationHandler for EmberApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if !self.initialize_window(event_loop) {
            event_loop.exit();
            return;
        }

        self.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.handle_resize(size.width, size.height);
                }
            }

            WindowEvent::RedrawRequested => {
                if self.should_exit {
                    event_loop.exit();
                    return;
                }
                self.render_frame();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
            return;
        }
        self.poll_and_schedule(event_loop);
    }
}

impl EmberApp {
    /// Reconfigure the surface and follow the new aspect ratio.
    fn handle_resize(&mut self, width: u32, height: u32) {
        if let Some(backend) = &mut self.backend {
            backend.resize(width, height);
        }
        self.renderer.set_viewport(width, height);
        self.camera
            .set_aspect_ratio(self.renderer.viewport().aspect_ratio());
        self.camera.update_projection_matrix();
        tracing::debug!(width, height, "window resized");
    }
}
