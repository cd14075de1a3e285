//! # Token Rotation Core
//!
//! Domain layer of the token rotation service: token records and claims,
//! storage traits with in-memory implementations, the rotation manager and
//! its background sweeper.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    ClaimPatch, ClaimSet, RevocationEntry, StateSnapshot, StatusTransition, TokenClaims,
    TokenRecord, TokenStatus,
};
pub use domain::value_objects::{
    ImportSummary, IssueOptions, IssuedToken, MassRotationReport, RotationOutcome,
    TokenStatistics, VerificationOutcome,
};
pub use errors::{DomainError, DomainResult, TokenError};
pub use repositories::{
    InMemoryRevocationSet, InMemorySnapshotRepository, InMemoryTokenStore, RevocationSet,
    SnapshotRepository, TokenStore, TransitionResult,
};
pub use services::{
    Clock, CodecConfig, ManualClock, RotationManager, RotationManagerConfig, Sweeper,
    SweeperConfig, SweeperHandle, SystemClock, TokenCodec,
};
