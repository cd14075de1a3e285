//! Repository interfaces for token lifecycle state.

pub mod revocation;
pub mod snapshot;
pub mod token;

pub use revocation::{InMemoryRevocationSet, RevocationSet};
pub use snapshot::{InMemorySnapshotRepository, SnapshotRepository};
pub use token::{InMemoryTokenStore, TokenStore, TransitionResult};
