//! Debounced watcher over a single config file.

use ember_common::ConfigError;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

/// Quiet period after the last file event before a reload is signalled.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Watches a config file and signals on a broadcast channel when it settles
/// after a change.
pub struct ConfigWatcher {
    path: PathBuf,
    debounce: Duration,
}

impl ConfigWatcher {
    /// Create a watcher for `path`. The file does not have to exist yet.
    pub fn new(path: PathBuf) -> Result<Self, ConfigError> {
        if path.file_name().is_none() {
            return Err(ConfigError::WatchError(format!(
                "{} does not name a file",
                path.display()
            )));
        }
        if !path.exists() {
            warn!(
                "config file {} does not exist yet, will watch for creation",
                path.display()
            );
        }
        Ok(Self {
            path,
            debounce: DEFAULT_DEBOUNCE,
        })
    }

    /// Override the debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run until the underlying notify channel closes, sending `()` on `tx`
    /// once per settled burst of changes.
    pub async fn watch(&self, tx: broadcast::Sender<()>) -> Result<(), ConfigError> {
        let watch_dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name: OsString = self
            .path
            .file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_default();

        info!("starting config file watcher for {}", self.path.display());

        // notify calls back on its own thread; bridge into async with mpsc
        let (notify_tx, mut notify_rx) = mpsc::channel::<()>(16);

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) => {
                    if is_config_event(&event, &file_name) {
                        debug!("config file change detected");
                        let _ = notify_tx.try_send(());
                    }
                }
                Err(e) => error!("file watcher error: {e}"),
            },
            notify::Config::default(),
        )
        .map_err(|e| ConfigError::WatchError(format!("failed to create watcher: {e}")))?;

        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| {
                ConfigError::WatchError(format!("failed to watch {}: {e}", watch_dir.display()))
            })?;

        while notify_rx.recv().await.is_some() {
            // Every further event restarts the quiet period.
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(self.debounce) => break,
                    msg = notify_rx.recv() => {
                        if msg.is_none() {
                            return Ok(());
                        }
                    }
                }
            }

            info!("config file changed, sending reload signal");
            if tx.send(()).is_err() {
                debug!("no receivers for config reload signal");
            }
        }

        drop(watcher);
        Ok(())
    }
}

/// Whether a notify event is a create or modify touching `file_name`.
pub(crate) fn is_config_event(event: &Event, file_name: &OsStr) -> bool {
    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
        return false;
    }
    event
        .paths
        .iter()
        .any(|p| p.file_name().is_some_and(|n| n == file_name))
}
