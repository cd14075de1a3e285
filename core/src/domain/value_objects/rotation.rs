//! Results of issuance, verification and rotation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{TokenClaims, TokenRecord};

/// Per-call overrides for issuance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueOptions {
    /// Lifetime of the signed credential; manager default when `None`
    pub ttl: Option<Duration>,
    /// Time until the token is due for rotation; manager default when `None`
    pub rotation_interval: Option<Duration>,
}

impl IssueOptions {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_rotation_interval(mut self, interval: Duration) -> Self {
        self.rotation_interval = Some(interval);
        self
    }

    /// The interval and lifetime `record` was minted with, so a successor
    /// keeps the cadence of the token it replaces
    pub fn inherited_from(record: &TokenRecord) -> Self {
        Self {
            ttl: Some(Duration::seconds(record.claims.exp - record.claims.issued_at)),
            rotation_interval: Some(record.rotation_due - record.created_at),
        }
    }
}

/// A freshly minted credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub signed_value: String,
    pub token_id: Uuid,
    pub rotation_due: DateTime<Utc>,
    /// Set when the token was minted by rotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_token_id: Option<Uuid>,
    pub rotation_count: u32,
}

impl From<&TokenRecord> for IssuedToken {
    fn from(record: &TokenRecord) -> Self {
        Self {
            signed_value: record.signed_value.clone(),
            token_id: record.token_id,
            rotation_due: record.rotation_due,
            previous_token_id: record.previous_token_id,
            rotation_count: record.rotation_count,
        }
    }
}

/// Result of verifying a credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims: Option<TokenClaims>,
    pub needs_rotation: bool,
    pub in_grace_period: bool,
    /// Rotation time of the tracked record; `None` for untracked tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_due: Option<DateTime<Utc>>,
}

impl VerificationOutcome {
    /// Whether a client should be told to refresh without being rejected
    pub fn should_advise_refresh(&self) -> bool {
        self.valid && self.needs_rotation && self.in_grace_period
    }
}

/// Per-token result of a mass rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationOutcome {
    pub old_token_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_token_id: Option<Uuid>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RotationOutcome {
    pub fn succeeded(old_token_id: Uuid, new_token_id: Uuid) -> Self {
        Self {
            old_token_id,
            new_token_id: Some(new_token_id),
            success: true,
            error: None,
        }
    }

    pub fn failed(old_token_id: Uuid, error: impl ToString) -> Self {
        Self {
            old_token_id,
            new_token_id: None,
            success: false,
            error: Some(error.to_string()),
        }
    }
}

/// Aggregate result of `force_rotate_all`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MassRotationReport {
    pub results: Vec<RotationOutcome>,
    pub succeeded: usize,
    pub failed: usize,
}

impl MassRotationReport {
    pub fn push(&mut self, outcome: RotationOutcome) {
        if outcome.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }
}

/// Counts over the token store and revocation set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStatistics {
    pub active_count: usize,
    pub rotated_count: usize,
    pub blacklisted_count: usize,
    pub pending_rotation_count: usize,
    pub total_count: usize,
}

/// Result of importing a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub records_imported: usize,
    pub revocations_imported: usize,
    /// Active records re-entered into the rotation schedule
    pub rotations_scheduled: usize,
    /// Active records already past due, left for the next sweep
    pub overdue_records: usize,
    pub version_mismatch: bool,
}
