use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use tr_core::{ClaimPatch, ClaimSet, IssueOptions, IssuedToken, TokenClaims};

/// Upper bound for caller-supplied durations (ten years)
const MAX_DURATION_SECS: i64 = 315_360_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IssueTokenRequest {
    /// Claims carried by the credential
    #[serde(default)]
    pub claims: ClaimSet,

    /// Credential lifetime; server default when absent
    #[validate(range(min = 1, max = 315_360_000))]
    pub ttl_secs: Option<i64>,

    /// Time until rotation; server default when absent
    #[validate(range(min = 0, max = 315_360_000))]
    pub rotation_interval_secs: Option<i64>,
}

impl IssueTokenRequest {
    pub fn options(&self) -> IssueOptions {
        let mut options = IssueOptions::default();
        if let Some(ttl) = self.ttl_secs {
            options = options.with_ttl(Duration::seconds(ttl.min(MAX_DURATION_SECS)));
        }
        if let Some(interval) = self.rotation_interval_secs {
            options = options.with_rotation_interval(Duration::seconds(interval.min(MAX_DURATION_SECS)));
        }
        options
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyTokenRequest {
    #[validate(length(min = 1))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotateTokenRequest {
    pub token_id: Uuid,

    /// Changes applied to the successor's claims
    #[serde(default)]
    pub claims: Option<ClaimPatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistTokenRequest {
    pub token_id: Uuid,
}

/// A newly issued or rotated credential
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub token_id: Uuid,
    pub rotation_due: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_token_id: Option<Uuid>,
    pub rotation_count: u32,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.signed_value,
            token_id: issued.token_id,
            rotation_due: issued.rotation_due,
            previous_token_id: issued.previous_token_id,
            rotation_count: issued.rotation_count,
        }
    }
}

/// The authenticated credential as seen by a protected endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenContextResponse {
    pub token_id: Uuid,
    pub claims: TokenClaims,
    pub needs_rotation: bool,
    pub in_grace_period: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_due: Option<DateTime<Utc>>,
}
