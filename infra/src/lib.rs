//! # Infrastructure Layer
//!
//! Concrete adapters for the token rotation core. The only external
//! resource the service touches is the snapshot file that carries token
//! state across restarts.

// Re-export core types for convenience
pub use tr_core::errors::{DomainError, DomainResult};

/// Persistence module - snapshot storage on the local filesystem
pub mod persistence;

pub use persistence::FileSnapshotRepository;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot encoding or decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        DomainError::Persistence {
            message: error.to_string(),
        }
    }
}
