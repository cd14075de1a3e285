//! Business services containing domain logic and use cases.

pub mod token;

// Re-export commonly used types
pub use token::{
    CleanupResult, Clock, CodecConfig, ManualClock, RotationManager, RotationManagerConfig,
    RotationSchedule, SignedToken, SweepReport, Sweeper, SweeperConfig, SweeperHandle,
    SystemClock, TokenCodec,
};
