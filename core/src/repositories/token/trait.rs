//! Token store trait defining the interface for token record persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{StatusTransition, TokenRecord, TokenStatus};
use crate::errors::DomainError;

/// Outcome of a compare-and-swap status transition
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionResult {
    /// The transition was applied; carries the updated record
    Applied(TokenRecord),
    /// No record with the given id
    NotFound,
    /// The record's status was not one of the expected ones
    Conflict(TokenStatus),
}

/// Store trait for token record operations
///
/// Implementations must make every method atomic with respect to concurrent
/// callers. `transition` is a compare-and-swap on `status`, which is what
/// keeps a sweep and a manual rotation from both superseding the same token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Insert a new record
    ///
    /// # Returns
    /// * `Ok(())` - Record stored
    /// * `Err(DomainError::Validation)` - A record with the same id already exists
    async fn put(&self, record: TokenRecord) -> Result<(), DomainError>;

    /// Find a record by id
    async fn get(&self, token_id: Uuid) -> Result<Option<TokenRecord>, DomainError>;

    /// Delete a record
    ///
    /// # Returns
    /// * `Ok(true)` - Record deleted
    /// * `Ok(false)` - Record not found
    async fn delete(&self, token_id: Uuid) -> Result<bool, DomainError>;

    /// All records with `status == active`
    async fn list_active(&self) -> Result<Vec<TokenRecord>, DomainError>;

    /// All records regardless of status
    async fn list_all(&self) -> Result<Vec<TokenRecord>, DomainError>;

    /// Apply `transition` only if the record's current status is in `expected`
    async fn transition(
        &self,
        token_id: Uuid,
        expected: &[TokenStatus],
        transition: StatusTransition,
    ) -> Result<TransitionResult, DomainError>;

    /// Delete every record created at or before `cutoff`, returning their ids
    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Uuid>, DomainError>;

    /// Replace the whole contents of the store
    async fn replace_all(&self, records: Vec<TokenRecord>) -> Result<(), DomainError>;

    /// Number of stored records
    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.list_all().await?.len())
    }
}
