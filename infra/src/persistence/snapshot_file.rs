//! JSON snapshot file
//!
//! Writes go to a sibling temporary file that is then renamed over the
//! target, so a crash mid-write leaves the previous snapshot intact.

use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use tr_core::domain::entities::StateSnapshot;
use tr_core::errors::DomainError;
use tr_core::repositories::SnapshotRepository;
use tr_shared::PersistenceConfig;

use crate::InfrastructureError;

/// Stores the state snapshot as a JSON document on disk
#[derive(Debug)]
pub struct FileSnapshotRepository {
    path: PathBuf,
    /// Serializes writers so two saves never share the temporary file
    write_lock: Mutex<()>,
}

impl FileSnapshotRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Repository for the configured snapshot path, if persistence is enabled
    pub fn from_config(config: &PersistenceConfig) -> Option<Self> {
        config.snapshot_path.as_ref().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn write(&self, snapshot: &StateSnapshot) -> Result<(), InfrastructureError> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let _guard = self.write_lock.lock().await;
        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn read(&self) -> Result<Option<StateSnapshot>, InfrastructureError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[async_trait]
impl SnapshotRepository for FileSnapshotRepository {
    async fn save(&self, snapshot: &StateSnapshot) -> Result<(), DomainError> {
        self.write(snapshot).await.map_err(|e| {
            warn!(path = %self.path.display(), "Failed to write snapshot: {}", e);
            DomainError::from(e)
        })?;

        info!(
            path = %self.path.display(),
            records = snapshot.active_tokens.len(),
            revocations = snapshot.blacklisted_tokens.len(),
            "Snapshot saved"
        );
        Ok(())
    }

    async fn load(&self) -> Result<Option<StateSnapshot>, DomainError> {
        let snapshot = self.read().await.map_err(|e| {
            warn!(path = %self.path.display(), "Failed to read snapshot: {}", e);
            DomainError::from(e)
        })?;

        match &snapshot {
            Some(s) => debug!(path = %self.path.display(), exported_at = %s.exported_at, "Snapshot loaded"),
            None => debug!(path = %self.path.display(), "No snapshot file present"),
        }
        Ok(snapshot)
    }
}
