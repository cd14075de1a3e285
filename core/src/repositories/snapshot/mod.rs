//! Snapshot persistence module.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::snapshot::StateSnapshot;
use crate::errors::DomainError;

/// Durable storage for exported manager state
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Persist a snapshot, replacing any previous one
    async fn save(&self, snapshot: &StateSnapshot) -> Result<(), DomainError>;

    /// Load the last saved snapshot, `None` if nothing was saved yet
    async fn load(&self) -> Result<Option<StateSnapshot>, DomainError>;
}

/// Snapshot repository that keeps the last snapshot in memory
#[derive(Clone, Default)]
pub struct InMemorySnapshotRepository {
    snapshot: Arc<RwLock<Option<StateSnapshot>>>,
}

impl InMemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotRepository for InMemorySnapshotRepository {
    async fn save(&self, snapshot: &StateSnapshot) -> Result<(), DomainError> {
        *self.snapshot.write().await = Some(snapshot.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<StateSnapshot>, DomainError> {
        Ok(self.snapshot.read().await.clone())
    }
}
