//! Revocation (blacklist) set module.

mod r#trait;
pub use r#trait::RevocationSet;

mod memory;
pub use memory::InMemoryRevocationSet;
