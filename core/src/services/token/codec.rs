//! Signing and parsing of rotation-aware credentials
//!
//! Credentials are compact JWS (HMAC) tokens. The codec stamps `iss`, `aud`
//! and `exp` onto the claims, and tags the header with a `kid` derived from
//! the key so a credential minted under a different key is rejected before
//! its MAC is even checked.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use tr_shared::SigningConfig;

use crate::domain::entities::TokenClaims;
use crate::errors::{DomainError, TokenError};

/// Keys shorter than this are accepted but logged
const RECOMMENDED_KEY_LEN: usize = 32;

/// Length of generated development keys
const EPHEMERAL_KEY_LEN: usize = 64;

/// Resolved key material and credential parameters
#[derive(Clone)]
pub struct CodecConfig {
    key: Vec<u8>,
    pub algorithm: Algorithm,
    pub issuer: String,
    pub audience: String,
}

impl std::fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecConfig")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl CodecConfig {
    /// HS256 configuration with the default issuer and audience
    pub fn new(key: impl AsRef<[u8]>) -> Self {
        let defaults = SigningConfig::default();
        Self {
            key: key.as_ref().to_vec(),
            algorithm: Algorithm::HS256,
            issuer: defaults.issuer,
            audience: defaults.audience,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// Resolves the signing key from configuration
    ///
    /// The literal secret wins over the secret file. When neither is set a
    /// random key is generated; credentials signed with it do not survive a
    /// restart.
    ///
    /// # Returns
    /// * `Ok(CodecConfig)` - Key material resolved
    /// * `Err(DomainError::Validation)` - Unknown algorithm, unreadable file or undecodable key
    pub fn from_signing_config(config: &SigningConfig) -> Result<Self, DomainError> {
        let algorithm = parse_algorithm(&config.algorithm)?;

        let key = if let Some(secret) = &config.secret {
            decode_key(secret)?
        } else if let Some(path) = &config.secret_file {
            let raw = std::fs::read_to_string(path).map_err(|e| DomainError::Validation {
                message: format!("Cannot read signing key file {}: {}", path.display(), e),
            })?;
            decode_key(raw.trim())?
        } else {
            warn!("No signing key configured, generating an ephemeral key; issued credentials will not survive a restart");
            let mut key = vec![0u8; EPHEMERAL_KEY_LEN];
            rand::thread_rng().fill_bytes(&mut key);
            key
        };

        if key.len() < RECOMMENDED_KEY_LEN {
            warn!(
                key_len = key.len(),
                "Signing key is shorter than {} bytes", RECOMMENDED_KEY_LEN
            );
        }

        Ok(Self {
            key,
            algorithm,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        })
    }
}

fn parse_algorithm(name: &str) -> Result<Algorithm, DomainError> {
    match name.to_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(DomainError::Validation {
            message: format!("Unsupported signing algorithm: {}", other),
        }),
    }
}

fn decode_key(raw: &str) -> Result<Vec<u8>, DomainError> {
    let key = match raw.strip_prefix("base64:") {
        Some(encoded) => STANDARD
            .decode(encoded.trim())
            .map_err(|e| DomainError::Validation {
                message: format!("Signing key is not valid base64: {}", e),
            })?,
        None => raw.as_bytes().to_vec(),
    };
    if key.is_empty() {
        return Err(DomainError::Validation {
            message: "Signing key is empty".to_string(),
        });
    }
    Ok(key)
}

/// Short key fingerprint used as the `kid` header
fn key_fingerprint(key: &[u8]) -> String {
    let digest = Sha256::digest(key);
    hex::encode(&digest[..8])
}

/// A freshly signed credential and the claims it carries
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub value: String,
    pub claims: TokenClaims,
}

/// Signs and parses credentials with a single symmetric key
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    key_id: String,
    issuer: String,
    audience: String,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("key_id", &self.key_id)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&config.key),
            decoding_key: DecodingKey::from_secret(&config.key),
            algorithm: config.algorithm,
            key_id: key_fingerprint(&config.key),
            issuer: config.issuer,
            audience: config.audience,
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Signs `claims`, expiring the credential `ttl` after its issue time
    ///
    /// The returned claims are the ones actually encoded, with `iss`, `aud`
    /// and `exp` filled in.
    pub fn sign(&self, mut claims: TokenClaims, ttl: Duration) -> Result<SignedToken, TokenError> {
        claims.iss = self.issuer.clone();
        claims.aud = self.audience.clone();
        claims.exp = claims.issued_at + ttl.num_seconds();

        let mut header = Header::new(self.algorithm);
        header.kid = Some(self.key_id.clone());

        let value = encode(&header, &claims, &self.encoding_key).map_err(|e| {
            TokenError::SigningFailed {
                reason: e.to_string(),
            }
        })?;

        Ok(SignedToken { value, claims })
    }

    /// Verifies the MAC, issuer and audience, then checks expiry against `now`
    ///
    /// # Returns
    /// * `Ok(TokenClaims)` - Credential is authentic and unexpired
    /// * `Err(TokenError::MalformedToken)` - Not a decodable credential
    /// * `Err(TokenError::InvalidSignature)` - Wrong key, issuer or audience
    /// * `Err(TokenError::Expired)` - `exp` is not after `now`
    pub fn parse(&self, signed: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let header = decode_header(signed).map_err(|_| TokenError::MalformedToken)?;
        if let Some(kid) = &header.kid {
            if kid != &self.key_id {
                debug!(kid = %kid, "Credential signed with an unknown key");
                return Err(TokenError::InvalidSignature);
            }
        }

        let data = decode::<TokenClaims>(signed, &self.decoding_key, &self.validation())
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidIssuer
                | ErrorKind::InvalidAudience
                | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::MalformedToken,
            })?;

        if data.claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked against the injected clock instead of wall time
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation
    }
}
