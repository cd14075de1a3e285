//! Unit tests for credential signing and parsing

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Duration;
use jsonwebtoken::Algorithm;
use serde_json::json;
use uuid::Uuid;

use tr_shared::SigningConfig;

use super::{base_time, test_codec, TEST_KEY};
use crate::domain::entities::{ClaimSet, TokenClaims, TOKEN_FORMAT_VERSION};
use crate::errors::{DomainError, TokenError};
use crate::services::token::{CodecConfig, TokenCodec};

fn claims() -> TokenClaims {
    let issued = base_time();
    TokenClaims {
        token_id: Uuid::new_v4(),
        issued_at: issued.timestamp(),
        rotation_due: (issued + Duration::days(30)).timestamp(),
        version: TOKEN_FORMAT_VERSION.to_string(),
        previous_token_id: None,
        rotation_count: 0,
        iss: String::new(),
        aud: String::new(),
        exp: 0,
        custom: ClaimSet::new()
            .with_subject("user-42")
            .with_role("admin")
            .with_claim("tenant", "acme")
            .with_claim("scopes", json!(["read", "write"])),
    }
}

#[test]
fn test_sign_then_parse_preserves_claims() {
    let codec = test_codec();
    let original = claims();

    let signed = codec.sign(original.clone(), Duration::days(37)).unwrap();
    let parsed = codec.parse(&signed.value, base_time()).unwrap();

    assert_eq!(parsed, signed.claims);
    assert_eq!(parsed.token_id, original.token_id);
    assert_eq!(parsed.custom, original.custom);
    assert_eq!(parsed.iss, codec.issuer());
    assert_eq!(parsed.aud, codec.audience());
    assert_eq!(parsed.exp, original.issued_at + Duration::days(37).num_seconds());
}

#[test]
fn test_header_carries_key_id() {
    let codec = test_codec();
    let signed = codec.sign(claims(), Duration::hours(1)).unwrap();

    let header = jsonwebtoken::decode_header(&signed.value).unwrap();
    assert_eq!(header.kid.as_deref(), Some(codec.key_id()));
    assert_eq!(header.alg, Algorithm::HS256);
    assert_eq!(codec.key_id().len(), 16);
}

#[test]
fn test_parse_rejects_other_key() {
    let signer = TokenCodec::new(CodecConfig::new(b"another-signing-key-of-reasonable-size"));
    let signed = signer.sign(claims(), Duration::hours(1)).unwrap();

    let result = test_codec().parse(&signed.value, base_time());

    assert_eq!(result, Err(TokenError::InvalidSignature));
}

#[test]
fn test_parse_rejects_tampered_payload() {
    let codec = test_codec();
    let first = codec.sign(claims(), Duration::hours(1)).unwrap().value;
    let second = codec.sign(claims(), Duration::hours(1)).unwrap().value;

    let first_parts: Vec<&str> = first.split('.').collect();
    let second_parts: Vec<&str> = second.split('.').collect();
    let forged = format!("{}.{}.{}", first_parts[0], second_parts[1], first_parts[2]);

    assert_eq!(
        codec.parse(&forged, base_time()),
        Err(TokenError::InvalidSignature)
    );
}

#[test]
fn test_parse_rejects_garbage() {
    let codec = test_codec();

    assert_eq!(codec.parse("not-a-token", base_time()), Err(TokenError::MalformedToken));
    assert_eq!(codec.parse("", base_time()), Err(TokenError::MalformedToken));
}

#[test]
fn test_parse_checks_expiry_against_given_time() {
    let codec = test_codec();
    let signed = codec.sign(claims(), Duration::hours(1)).unwrap();

    assert!(codec
        .parse(&signed.value, base_time() + Duration::minutes(59))
        .is_ok());
    assert_eq!(
        codec.parse(&signed.value, base_time() + Duration::hours(1)),
        Err(TokenError::Expired)
    );
}

#[test]
fn test_parse_rejects_wrong_issuer_or_audience() {
    let other_issuer = TokenCodec::new(CodecConfig::new(TEST_KEY).with_issuer("someone-else"));
    let other_audience = TokenCodec::new(CodecConfig::new(TEST_KEY).with_audience("other-api"));
    let codec = test_codec();

    let signed = other_issuer.sign(claims(), Duration::hours(1)).unwrap();
    assert_eq!(codec.parse(&signed.value, base_time()), Err(TokenError::InvalidSignature));

    let signed = other_audience.sign(claims(), Duration::hours(1)).unwrap();
    assert_eq!(codec.parse(&signed.value, base_time()), Err(TokenError::InvalidSignature));
}

#[test]
fn test_hs512_round_trip() {
    let codec = TokenCodec::new(CodecConfig::new(TEST_KEY).with_algorithm(Algorithm::HS512));
    let signed = codec.sign(claims(), Duration::hours(1)).unwrap();

    assert!(codec.parse(&signed.value, base_time()).is_ok());
    // Same key, different algorithm
    assert_eq!(
        test_codec().parse(&signed.value, base_time()),
        Err(TokenError::InvalidSignature)
    );
}

#[test]
fn test_base64_secret_matches_raw_key() {
    let config = SigningConfig::with_secret(format!("base64:{}", STANDARD.encode(TEST_KEY)));

    let from_config = TokenCodec::new(CodecConfig::from_signing_config(&config).unwrap());

    assert_eq!(from_config.key_id(), test_codec().key_id());
    let signed = from_config.sign(claims(), Duration::hours(1)).unwrap();
    assert!(test_codec().parse(&signed.value, base_time()).is_ok());
}

#[test]
fn test_secret_file_is_read_and_trimmed() {
    let path = std::env::temp_dir().join(format!("signing-key-{}.txt", Uuid::new_v4()));
    std::fs::write(&path, format!("{}\n", std::str::from_utf8(TEST_KEY).unwrap())).unwrap();
    let config = SigningConfig {
        secret_file: Some(path.clone()),
        ..Default::default()
    };

    let codec = TokenCodec::new(CodecConfig::from_signing_config(&config).unwrap());
    std::fs::remove_file(&path).unwrap();

    assert_eq!(codec.key_id(), test_codec().key_id());
}

#[test]
fn test_missing_key_generates_ephemeral_key() {
    let config = SigningConfig::default();

    let first = TokenCodec::new(CodecConfig::from_signing_config(&config).unwrap());
    let second = TokenCodec::new(CodecConfig::from_signing_config(&config).unwrap());

    assert_ne!(first.key_id(), second.key_id());
    let signed = first.sign(claims(), Duration::hours(1)).unwrap();
    assert!(first.parse(&signed.value, base_time()).is_ok());
}

#[test]
fn test_invalid_key_configuration() {
    let unknown_algorithm = SigningConfig {
        algorithm: "RS256".to_string(),
        ..SigningConfig::with_secret("secret")
    };
    assert!(matches!(
        CodecConfig::from_signing_config(&unknown_algorithm),
        Err(DomainError::Validation { .. })
    ));

    let bad_base64 = SigningConfig::with_secret("base64:!!!");
    assert!(matches!(
        CodecConfig::from_signing_config(&bad_base64),
        Err(DomainError::Validation { .. })
    ));

    let missing_file = SigningConfig {
        secret_file: Some(std::env::temp_dir().join(format!("absent-{}", Uuid::new_v4()))),
        ..Default::default()
    };
    assert!(matches!(
        CodecConfig::from_signing_config(&missing_file),
        Err(DomainError::Validation { .. })
    ));
}
