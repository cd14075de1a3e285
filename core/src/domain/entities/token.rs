//! Token records tracked by the rotation manager.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::claims::TokenClaims;

/// Lifecycle status of a token record
///
/// Status only moves forward: `Active -> Rotated -> Blacklisted` or
/// `Active -> Blacklisted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStatus {
    Active,
    Rotated,
    Blacklisted,
}

impl TokenStatus {
    /// Whether moving from `self` to `next` is a forward transition
    pub fn can_transition_to(self, next: TokenStatus) -> bool {
        matches!(
            (self, next),
            (TokenStatus::Active, TokenStatus::Rotated)
                | (TokenStatus::Active, TokenStatus::Blacklisted)
                | (TokenStatus::Rotated, TokenStatus::Blacklisted)
                // Re-rotating an already rotated token keeps it rotated
                | (TokenStatus::Rotated, TokenStatus::Rotated)
        )
    }
}

impl std::fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenStatus::Active => write!(f, "active"),
            TokenStatus::Rotated => write!(f, "rotated"),
            TokenStatus::Blacklisted => write!(f, "blacklisted"),
        }
    }
}

/// A status change applied atomically by the token store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    /// Superseded by `new_token_id`
    Rotated {
        at: DateTime<Utc>,
        new_token_id: Uuid,
    },
    /// Revoked
    Blacklisted { at: DateTime<Utc> },
}

impl StatusTransition {
    /// Status the record ends up in
    pub fn target(&self) -> TokenStatus {
        match self {
            StatusTransition::Rotated { .. } => TokenStatus::Rotated,
            StatusTransition::Blacklisted { .. } => TokenStatus::Blacklisted,
        }
    }
}

/// Token record owned by the token store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    /// Unique identifier, never reused
    pub token_id: Uuid,

    /// Claims as signed into `signed_value`
    pub claims: TokenClaims,

    /// The credential handed out to the client
    pub signed_value: String,

    /// Lifecycle status
    pub status: TokenStatus,

    /// Creation (issuance) time
    pub created_at: DateTime<Utc>,

    /// Time the token becomes due for rotation
    pub rotation_due: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blacklisted_at: Option<DateTime<Utc>>,

    /// Number of rotations that led to this record
    pub rotation_count: u32,

    /// Predecessor in the rotation chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_token_id: Option<Uuid>,

    /// Successor in the rotation chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_token_id: Option<Uuid>,
}

impl TokenRecord {
    /// Creates an active record for a freshly signed credential
    pub fn new(
        claims: TokenClaims,
        signed_value: String,
        created_at: DateTime<Utc>,
        rotation_due: DateTime<Utc>,
    ) -> Self {
        Self {
            token_id: claims.token_id,
            rotation_count: claims.rotation_count,
            previous_token_id: claims.previous_token_id,
            claims,
            signed_value,
            status: TokenStatus::Active,
            created_at,
            rotation_due,
            rotated_at: None,
            blacklisted_at: None,
            new_token_id: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == TokenStatus::Active
    }

    pub fn is_rotated(&self) -> bool {
        self.status == TokenStatus::Rotated
    }

    pub fn is_blacklisted(&self) -> bool {
        self.status == TokenStatus::Blacklisted
    }

    /// Whether an active record has reached its rotation time
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && self.rotation_due <= now
    }

    /// When a rotated record's grace period ends
    pub fn grace_expires_at(&self, grace_period: Duration) -> Option<DateTime<Utc>> {
        self.rotated_at.map(|at| at + grace_period)
    }

    /// Whether a rotated record has outlived its grace period
    pub fn is_grace_expired(&self, now: DateTime<Utc>, grace_period: Duration) -> bool {
        self.is_rotated()
            && self
                .grace_expires_at(grace_period)
                .map(|expires| expires <= now)
                .unwrap_or(false)
    }

    /// Whether the record is older than the retention window
    pub fn is_past_retention(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        self.created_at + retention <= now
    }

    /// Applies a status transition, returning `false` if it would move backwards
    pub fn apply(&mut self, transition: StatusTransition) -> bool {
        if !self.status.can_transition_to(transition.target()) {
            return false;
        }
        match transition {
            StatusTransition::Rotated { at, new_token_id } => {
                self.status = TokenStatus::Rotated;
                // A second rotation of the same record keeps the original grace window
                self.rotated_at.get_or_insert(at);
                self.new_token_id = Some(new_token_id);
            }
            StatusTransition::Blacklisted { at } => {
                self.status = TokenStatus::Blacklisted;
                self.blacklisted_at = Some(at);
            }
        }
        true
    }
}
