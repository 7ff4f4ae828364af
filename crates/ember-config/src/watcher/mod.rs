//! File watcher for live config reload.
//!
//! Watches the directory containing `config.toml` so editors that save by
//! write-then-rename are still seen, and coalesces bursts of events.

mod config_watcher;

#[cfg(test)]
mod tests;

pub use config_watcher::{ConfigWatcher, DEFAULT_DEBOUNCE};
