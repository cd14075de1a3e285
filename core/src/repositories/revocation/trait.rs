//! Revocation set trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::revocation::RevocationEntry;
use crate::errors::DomainError;

/// Set of blacklisted token ids
///
/// Membership is authoritative: a token in the set must fail verification no
/// matter what status its record reports. Each entry carries an expiry so that
/// ids of long-gone tokens can eventually be purged.
#[async_trait]
pub trait RevocationSet: Send + Sync {
    /// Add an entry
    ///
    /// # Returns
    /// * `Ok(true)` - The id was not in the set before
    /// * `Ok(false)` - The id was already blacklisted; the existing entry is kept
    async fn add(&self, entry: RevocationEntry) -> Result<bool, DomainError>;

    /// Check membership
    async fn contains(&self, token_id: Uuid) -> Result<bool, DomainError>;

    /// Remove an entry, returning whether it was present
    async fn remove(&self, token_id: Uuid) -> Result<bool, DomainError>;

    /// All blacklisted ids
    async fn list(&self) -> Result<Vec<Uuid>, DomainError>;

    /// All entries with their timestamps
    async fn entries(&self) -> Result<Vec<RevocationEntry>, DomainError>;

    /// Drop entries whose expiry is at or before `now`
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Replace the whole contents of the set
    async fn replace_all(&self, entries: Vec<RevocationEntry>) -> Result<(), DomainError>;

    /// Number of entries
    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }
}
