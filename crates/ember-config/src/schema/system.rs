//! Logging configuration.

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
#[derive(Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// `tracing` filter directive for the ember crates.
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "ember=trace",
            LogLevel::Debug => "ember=debug",
            LogLevel::Info => "ember=info",
            LogLevel::Warning => "ember=warn",
            LogLevel::Error => "ember=error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Seconds between FPS log lines; 0 disables them (valid range: 0-3600).
    pub fps_interval_secs: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            fps_interval_secs: 5,
        }
    }
}
