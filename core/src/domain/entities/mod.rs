//! Domain entities representing the token lifecycle.

pub mod claims;
pub mod revocation;
pub mod snapshot;
pub mod token;


// Re-export commonly used types
pub use claims::{ClaimPatch, ClaimSet, TokenClaims, RESERVED_CLAIMS, TOKEN_FORMAT_VERSION};
pub use revocation::RevocationEntry;
pub use snapshot::{StateSnapshot, SNAPSHOT_VERSION};
pub use token::{StatusTransition, TokenRecord, TokenStatus};
