//! Revocation set entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A blacklisted token id with its eventual purge time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationEntry {
    pub token_id: Uuid,
    pub blacklisted_at: DateTime<Utc>,
    /// After this instant the entry may be purged from the set
    pub expires_at: DateTime<Utc>,
}

impl RevocationEntry {
    pub fn new(token_id: Uuid, blacklisted_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token_id,
            blacklisted_at,
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
