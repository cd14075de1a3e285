//! Token lifecycle services
//!
//! This module handles:
//! - Signing and parsing of credentials
//! - Issuance, verification, rotation and revocation through the rotation manager
//! - Background sweeps for due rotations, grace period enforcement and cleanup

mod clock;
mod codec;
mod config;
mod manager;
mod schedule;
mod sweeper;
mod sweeps;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{CodecConfig, SignedToken, TokenCodec};
pub use config::{RotationManagerConfig, SweeperConfig};
pub use manager::RotationManager;
pub use schedule::RotationSchedule;
pub use sweeper::{Sweeper, SweeperHandle};
pub use sweeps::{CleanupResult, SweepReport};
