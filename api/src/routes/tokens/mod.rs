//! Token lifecycle endpoints
//!
//! - Issuance of new credentials
//! - Verification with rotation advice
//! - Rotation with optional claim changes
//! - Immediate revocation
//! - Introspection of the bearer credential

pub mod blacklist;
pub mod current;
pub mod issue;
pub mod rotate;
pub mod verify;

pub use blacklist::blacklist_token;
pub use current::current_token;
pub use issue::issue_token;
pub use rotate::rotate_token;
pub use verify::verify_token;
