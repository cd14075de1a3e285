pub mod auth;

pub use auth::{
    CredentialVerifier, RotationAwareAuth, TokenContext, ROTATION_DUE_HEADER,
    ROTATION_REQUIRED_HEADER,
};
