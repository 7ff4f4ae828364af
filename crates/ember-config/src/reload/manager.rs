//! Core reload manager implementation.

use crate::schema::EmberConfig;
use crate::toml_loader;
use crate::validation;
use crate::watcher::ConfigWatcher;
use ember_common::ConfigError;
use std::path::{Path, PathBuf};
use tokio::sync::{broadcast, watch};
use tracing::{error, info, warn};

/// Manages live config reloading.
///
/// A reload that fails to parse or validate is logged and dropped; the
/// receiver keeps the last good config.
pub struct ReloadManager {
    config_path: PathBuf,
}

impl ReloadManager {
    /// Load the initial config from `config_path` and start watching it.
    ///
    /// Must be called inside a tokio runtime. If the file is missing,
    /// unreadable or invalid the defaults are used and the watcher still
    /// waits for a good version of the file.
    pub async fn start(config_path: PathBuf) -> (EmberConfig, watch::Receiver<EmberConfig>) {
        let initial_config = match reload_config(&config_path) {
            Ok(config) => config,
            Err(e) => {
                warn!("failed to load config: {e}, using defaults");
                EmberConfig::default()
            }
        };

        let (config_tx, config_rx) = watch::channel(initial_config.clone());

        tokio::spawn(async move {
            let manager = ReloadManager { config_path };
            manager.run_watch_loop(config_tx).await;
        });

        (initial_config, config_rx)
    }

    async fn run_watch_loop(&self, config_tx: watch::Sender<EmberConfig>) {
        let watcher = match ConfigWatcher::new(self.config_path.clone()) {
            Ok(w) => w,
            Err(e) => {
                error!("failed to create config watcher: {e}");
                return;
            }
        };

        let (change_tx, mut change_rx) = broadcast::channel::<()>(16);
        tokio::spawn(async move {
            if let Err(e) = watcher.watch(change_tx).await {
                error!("config watcher error: {e}");
            }
        });

        loop {
            match change_rx.recv().await {
                Ok(()) => {
                    info!("reloading config from {}", self.config_path.display());
                    match reload_config(&self.config_path) {
                        Ok(config) => {
                            // no-op saves leave receivers unnotified
                            config_tx.send_if_modified(|current| {
                                if *current == config {
                                    false
                                } else {
                                    *current = config;
                                    true
                                }
                            });
                            if config_tx.is_closed() {
                                info!("all config receivers dropped, stopping reload manager");
                                break;
                            }
                        }
                        Err(e) => warn!("config reload failed: {e}"),
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("config watcher lagged by {n} events");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("config watcher channel closed");
                    break;
                }
            }
        }
    }
}

/// Load and validate the config at `path`. An invalid file is rejected.
pub(crate) fn reload_config(path: &Path) -> Result<EmberConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}
