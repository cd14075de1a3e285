//! Token record store module.

mod r#trait;
pub use r#trait::{TokenStore, TransitionResult};

mod memory;
pub use memory::InMemoryTokenStore;
