//! Live config reload manager.
//!
//! Combines the file watcher with loading and validation, publishing each
//! accepted config on a `tokio::sync::watch` channel.

mod manager;

#[cfg(test)]
mod tests;

pub use manager::ReloadManager;
