//! Snapshot persistence configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::env_parse;

/// Where and how often manager state is written to disk
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PersistenceConfig {
    /// Snapshot file path; persistence is disabled when unset
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,

    /// Interval between periodic snapshots in seconds
    #[serde(default = "default_snapshot_interval")]
    pub snapshot_interval_secs: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            snapshot_interval_secs: default_snapshot_interval(),
        }
    }
}

impl PersistenceConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            snapshot_path: std::env::var("SNAPSHOT_PATH")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            snapshot_interval_secs: env_parse("SNAPSHOT_INTERVAL_SECS", default_snapshot_interval()),
        }
    }

    /// Check if persistence is enabled
    pub fn is_enabled(&self) -> bool {
        self.snapshot_path.is_some()
    }
}

fn default_snapshot_interval() -> u64 {
    900
}
