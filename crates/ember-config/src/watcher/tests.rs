//! Tests for the config file watcher.

use super::config_watcher::is_config_event;
use super::*;
use notify::event::{CreateKind, ModifyKind, RemoveKind};
use notify::{Event, EventKind};
use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn watcher_new_with_nonexistent_path_succeeds() {
    let watcher = ConfigWatcher::new(PathBuf::from("/tmp/nonexistent_ember_test.toml"));
    assert!(watcher.is_ok());
}

#[test]
fn watcher_new_with_existing_path_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "# test").unwrap();

    let watcher = ConfigWatcher::new(path.clone()).unwrap();
    assert_eq!(watcher.path(), path.as_path());
}

#[test]
fn watcher_rejects_path_without_file_name() {
    assert!(ConfigWatcher::new(PathBuf::from("/")).is_err());
}

#[test]
fn modify_of_config_file_is_relevant() {
    let event = Event::new(EventKind::Modify(ModifyKind::Any))
        .add_path(PathBuf::from("/home/u/.config/ember/config.toml"));
    assert!(is_config_event(&event, OsStr::new("config.toml")));
}

#[test]
fn create_of_config_file_is_relevant() {
    let event = Event::new(EventKind::Create(CreateKind::File))
        .add_path(PathBuf::from("/tmp/config.toml"));
    assert!(is_config_event(&event, OsStr::new("config.toml")));
}

#[test]
fn sibling_file_is_ignored() {
    let event = Event::new(EventKind::Modify(ModifyKind::Any))
        .add_path(PathBuf::from("/tmp/config.toml.swp"));
    assert!(!is_config_event(&event, OsStr::new("config.toml")));
}

#[test]
fn removal_is_ignored() {
    let event = Event::new(EventKind::Remove(RemoveKind::File))
        .add_path(PathBuf::from("/tmp/config.toml"));
    assert!(!is_config_event(&event, OsStr::new("config.toml")));
}

#[tokio::test]
async fn write_to_watched_file_sends_signal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "# initial").unwrap();

    let watcher = ConfigWatcher::new(path.clone())
        .unwrap()
        .with_debounce(Duration::from_millis(50));
    let (tx, mut rx) = tokio::sync::broadcast::channel(4);
    let task = tokio::spawn(async move { watcher.watch(tx).await });

    // Give the OS watcher time to register before writing.
    tokio::time::sleep(Duration::from_millis(200)).await;
    std::fs::write(&path, "[scene]\nsubdivisions = 3\n").unwrap();

    let signal = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
    assert!(matches!(signal, Ok(Ok(()))));
    task.abort();
}
