//! EmberApp struct definition and constructor.

use std::sync::Arc;

use tokio::sync::watch;
use winit::window::Window;

use ember_config::schema::EmberConfig;
use ember_renderer::{Camera, FrameTimer, Renderer, Viewport, WgpuBackend};

use crate::scene::Scene;
use crate::setup::{build_camera, build_renderer};

/// Top-level application state.
pub struct EmberApp {
    pub(super) config: EmberConfig,
    /// `--subdivisions`, kept across reloads.
    pub(super) subdivisions_override: Option<u32>,

    // Windowing
    pub(super) window: Option<Arc<Window>>,

    // Rendering; the scene is dropped before the backend
    pub(super) scene: Option<Scene<WgpuBackend>>,
    pub(super) backend: Option<WgpuBackend>,
    pub(super) renderer: Renderer,
    pub(super) camera: Camera,
    pub(super) timer: FrameTimer,

    // Live config reload
    pub(super) config_rx: Option<watch::Receiver<EmberConfig>>,
    pub(super) tokio_runtime: Option<tokio::runtime::Runtime>,

    // Whether the app should exit
    pub(super) should_exit: bool,
}

impl EmberApp {
    pub fn new(config: EmberConfig, subdivisions_override: Option<u32>) -> Self {
        let viewport = Viewport::new(config.window.width, config.window.height);
        let renderer = build_renderer(&config, viewport);
        let camera = build_camera(&config.camera, viewport);
        Self {
            config,
            subdivisions_override,
            window: None,
            scene: None,
            backend: None,
            renderer,
            camera,
            timer: FrameTimer::new(),
            config_rx: None,
            tokio_runtime: None,
            should_exit: false,
        }
    }

    pub(super) fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
