//! Claim sets carried inside signed credentials.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Version stamped into every credential minted by this manager
pub const TOKEN_FORMAT_VERSION: &str = "1.0";

/// Claim names injected by the manager; callers may not set them through the
/// extension map.
pub const RESERVED_CLAIMS: &[&str] = &[
    "tokenId",
    "issuedAt",
    "rotationDue",
    "version",
    "previousTokenId",
    "rotationCount",
    "iss",
    "aud",
    "exp",
    "sub",
    "role",
];

/// Caller-supplied claims: named identity fields plus an open extension map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Subject identity
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Role of the subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Arbitrary additional claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClaimSet {
    /// Creates an empty claim set
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Adds an extension claim
    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Returns the first extension key that collides with a manager-injected claim
    pub fn reserved_key(&self) -> Option<&str> {
        self.extra
            .keys()
            .map(String::as_str)
            .find(|key| RESERVED_CLAIMS.contains(key))
    }

    /// Applies a patch, producing the claim set of a successor credential.
    ///
    /// Named fields are replaced when the patch sets them. Extension keys are
    /// inserted or overwritten; a JSON `null` removes the key.
    pub fn apply(&mut self, patch: &ClaimPatch) {
        if let Some(subject) = &patch.subject {
            self.subject = Some(subject.clone());
        }
        if let Some(role) = &patch.role {
            self.role = Some(role.clone());
        }
        for (key, value) in &patch.extra {
            if value.is_null() {
                self.extra.remove(key);
            } else {
                self.extra.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Changes applied to the claims of a token when it is rotated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimPatch {
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClaimPatch {
    /// Creates an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Sets (or, with `Value::Null`, removes) an extension claim
    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.role.is_none() && self.extra.is_empty()
    }
}

/// The full claim set encoded into a credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Unique identifier of the token record
    pub token_id: Uuid,

    /// Issuance time (epoch seconds)
    pub issued_at: i64,

    /// Time the token becomes due for rotation (epoch seconds)
    pub rotation_due: i64,

    /// Credential format version
    pub version: String,

    /// Token this one replaced, if minted by rotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_token_id: Option<Uuid>,

    /// Number of rotations in this token's chain
    #[serde(default)]
    pub rotation_count: u32,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Expiration timestamp
    pub exp: i64,

    /// Caller-supplied claims
    #[serde(flatten)]
    pub custom: ClaimSet,
}
