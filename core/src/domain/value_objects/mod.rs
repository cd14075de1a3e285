//! Value objects returned by the rotation manager.

pub mod rotation;

// Re-export commonly used types
pub use rotation::{
    ImportSummary, IssueOptions, IssuedToken, MassRotationReport, RotationOutcome,
    TokenStatistics, VerificationOutcome,
};
