//! Unit tests for the snapshot file repository

use chrono::{TimeZone, Utc};
use std::path::PathBuf;
use tempfile::TempDir;

use tr_core::domain::entities::StateSnapshot;
use tr_core::errors::DomainError;
use tr_core::repositories::SnapshotRepository;
use tr_shared::PersistenceConfig;

use crate::persistence::FileSnapshotRepository;

fn empty_snapshot() -> StateSnapshot {
    StateSnapshot::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        Vec::new(),
        Vec::new(),
    )
}

#[tokio::test]
async fn test_load_missing_file_returns_none() {
    let dir = TempDir::new().unwrap();
    let repository = FileSnapshotRepository::new(dir.path().join("state.json"));

    assert!(repository.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("state.json");
    let repository = FileSnapshotRepository::new(&path);

    repository.save(&empty_snapshot()).await.unwrap();

    assert!(path.exists());
    assert!(!dir.path().join("nested/deeper/state.json.tmp").exists());
    assert_eq!(repository.load().await.unwrap(), Some(empty_snapshot()));
}

#[tokio::test]
async fn test_corrupt_file_is_a_persistence_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, b"{ not json").unwrap();
    let repository = FileSnapshotRepository::new(&path);

    let result = repository.load().await;

    assert!(matches!(result, Err(DomainError::Persistence { .. })));
}

#[test]
fn test_from_config() {
    let disabled = PersistenceConfig {
        snapshot_path: None,
        ..Default::default()
    };
    assert!(FileSnapshotRepository::from_config(&disabled).is_none());

    let enabled = PersistenceConfig {
        snapshot_path: Some(PathBuf::from("/var/lib/tokens/state.json")),
        ..Default::default()
    };
    let repository = FileSnapshotRepository::from_config(&enabled).unwrap();
    assert_eq!(repository.path(), PathBuf::from("/var/lib/tokens/state.json"));
}
