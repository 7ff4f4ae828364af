//! Tests for the reload manager.

use super::manager::reload_config;
use super::*;
use crate::schema::EmberConfig;
use std::path::PathBuf;
use std::time::Duration;

#[tokio::test]
async fn start_with_nonexistent_path_uses_defaults() {
    let path = PathBuf::from("/tmp/nonexistent_ember_reload_test.toml");
    let (config, rx) = ReloadManager::start(path).await;
    assert_eq!(config, EmberConfig::default());
    assert_eq!(*rx.borrow(), EmberConfig::default());
}

#[tokio::test]
async fn start_with_valid_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[scene]
subdivisions = 3
"#,
    )
    .unwrap();

    let (config, _rx) = ReloadManager::start(path).await;
    assert_eq!(config.scene.subdivisions, 3);
    assert_eq!(config.camera.fov_y_degrees, 45.0);
}

#[tokio::test]
async fn start_with_invalid_values_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[scene]\nsubdivisions = 42\n").unwrap();

    let (config, rx) = ReloadManager::start(path).await;
    assert_eq!(config, EmberConfig::default());
    assert_eq!(*rx.borrow(), EmberConfig::default());
}

#[test]
fn reload_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[scene]\nsubdivisions = 42\n").unwrap();

    let err = reload_config(&path).unwrap_err();
    assert!(err.to_string().contains("scene.subdivisions"));
}

#[test]
fn reload_accepts_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[render]\nwireframe = true\n").unwrap();

    let config = reload_config(&path).unwrap();
    assert!(config.render.wireframe);
}

#[tokio::test]
async fn edited_file_is_published() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[scene]\nsubdivisions = 2\n").unwrap();

    let (config, mut rx) = ReloadManager::start(path.clone()).await;
    assert_eq!(config.scene.subdivisions, 2);

    tokio::time::sleep(Duration::from_millis(200)).await;
    std::fs::write(&path, "[scene]\nsubdivisions = 4\n").unwrap();

    let changed = tokio::time::timeout(Duration::from_secs(5), rx.changed()).await;
    assert!(matches!(changed, Ok(Ok(()))));
    assert_eq!(rx.borrow().scene.subdivisions, 4);
}
