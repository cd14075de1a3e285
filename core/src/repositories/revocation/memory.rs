//! In-memory implementation of RevocationSet

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::revocation::RevocationEntry;
use crate::errors::DomainError;

use super::r#trait::RevocationSet;

/// Revocation set keyed by token id
#[derive(Clone, Default)]
pub struct InMemoryRevocationSet {
    entries: Arc<RwLock<HashMap<Uuid, RevocationEntry>>>,
}

impl InMemoryRevocationSet {
    /// Create a new empty set
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationSet for InMemoryRevocationSet {
    async fn add(&self, entry: RevocationEntry) -> Result<bool, DomainError> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(&entry.token_id) {
            return Ok(false);
        }
        entries.insert(entry.token_id, entry);
        Ok(true)
    }

    async fn contains(&self, token_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.entries.read().await.contains_key(&token_id))
    }

    async fn remove(&self, token_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.entries.write().await.remove(&token_id).is_some())
    }

    async fn list(&self) -> Result<Vec<Uuid>, DomainError> {
        Ok(self.entries.read().await.keys().copied().collect())
    }

    async fn entries(&self) -> Result<Vec<RevocationEntry>, DomainError> {
        Ok(self.entries.read().await.values().cloned().collect())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        Ok(before - entries.len())
    }

    async fn replace_all(&self, new_entries: Vec<RevocationEntry>) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        *entries = new_entries
            .into_iter()
            .map(|entry| (entry.token_id, entry))
            .collect();
        Ok(())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.entries.read().await.len())
    }
}
