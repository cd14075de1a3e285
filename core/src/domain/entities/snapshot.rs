//! Exportable snapshot of manager state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::revocation::RevocationEntry;
use super::token::TokenRecord;

/// Schema version of exported snapshots
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Persisted state of the rotation manager
///
/// `active_tokens` holds every tracked record regardless of status; the
/// signed credential is kept verbatim so nothing is re-signed on import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub active_tokens: Vec<TokenRecord>,
    pub blacklisted_tokens: Vec<RevocationEntry>,
}

impl StateSnapshot {
    pub fn new(
        exported_at: DateTime<Utc>,
        active_tokens: Vec<TokenRecord>,
        blacklisted_tokens: Vec<RevocationEntry>,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            exported_at,
            active_tokens,
            blacklisted_tokens,
        }
    }

    /// Whether the snapshot was written by a manager with the same schema
    pub fn is_current_version(&self) -> bool {
        self.version == SNAPSHOT_VERSION
    }
}
