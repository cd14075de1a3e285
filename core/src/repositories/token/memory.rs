//! In-memory implementation of TokenStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::{StatusTransition, TokenRecord, TokenStatus};
use crate::errors::DomainError;

use super::r#trait::{TokenStore, TransitionResult};

/// Token store backed by a map guarded by a read-write lock
#[derive(Clone, Default)]
pub struct InMemoryTokenStore {
    records: Arc<RwLock<HashMap<Uuid, TokenRecord>>>,
}

impl InMemoryTokenStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn put(&self, record: TokenRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().await;

        if records.contains_key(&record.token_id) {
            return Err(DomainError::Validation {
                message: format!("Token id {} already exists", record.token_id),
            });
        }

        records.insert(record.token_id, record);
        Ok(())
    }

    async fn get(&self, token_id: Uuid) -> Result<Option<TokenRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(&token_id).cloned())
    }

    async fn delete(&self, token_id: Uuid) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        Ok(records.remove(&token_id).is_some())
    }

    async fn list_active(&self) -> Result<Vec<TokenRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.is_active())
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<TokenRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }

    async fn transition(
        &self,
        token_id: Uuid,
        expected: &[TokenStatus],
        transition: StatusTransition,
    ) -> Result<TransitionResult, DomainError> {
        let mut records = self.records.write().await;

        let Some(record) = records.get_mut(&token_id) else {
            return Ok(TransitionResult::NotFound);
        };

        if !expected.contains(&record.status) || !record.apply(transition) {
            return Ok(TransitionResult::Conflict(record.status));
        }

        Ok(TransitionResult::Applied(record.clone()))
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Uuid>, DomainError> {
        let mut records = self.records.write().await;
        let expired: Vec<Uuid> = records
            .values()
            .filter(|r| r.created_at <= cutoff)
            .map(|r| r.token_id)
            .collect();

        for token_id in &expired {
            records.remove(token_id);
        }

        Ok(expired)
    }

    async fn replace_all(&self, new_records: Vec<TokenRecord>) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        *records = new_records
            .into_iter()
            .map(|record| (record.token_id, record))
            .collect();
        Ok(())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.records.read().await.len())
    }
}
