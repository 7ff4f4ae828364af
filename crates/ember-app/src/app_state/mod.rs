//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Coordinates config reload, the GPU backend and the scene.

mod core;
mod event_handler;
mod init;
mod polling;
mod render;

pub use core::EmberApp;
