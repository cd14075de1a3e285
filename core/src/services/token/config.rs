//! Configuration for the rotation manager and its background sweeper

use chrono::Duration;
use std::time::Duration as StdDuration;

use tr_shared::{PersistenceConfig, RotationConfig, MAX_POLICY_SECS};

/// Lifecycle timings applied by the rotation manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationManagerConfig {
    /// Time from issue to scheduled rotation
    pub rotation_interval: Duration,
    /// How long a superseded credential keeps verifying
    pub grace_period: Duration,
    /// How long records and revocation entries are kept
    pub retention_window: Duration,
    /// Credential lifetime (`exp - iat`)
    pub token_ttl: Duration,
}

impl Default for RotationManagerConfig {
    fn default() -> Self {
        Self {
            rotation_interval: Duration::days(30),
            grace_period: Duration::days(7),
            retention_window: Duration::days(90),
            token_ttl: Duration::days(37),
        }
    }
}

impl From<&RotationConfig> for RotationManagerConfig {
    fn from(config: &RotationConfig) -> Self {
        Self {
            rotation_interval: secs(config.rotation_interval_secs),
            grace_period: secs(config.grace_period_secs),
            retention_window: secs(config.retention_window_secs),
            token_ttl: secs(config.effective_token_ttl_secs()),
        }
    }
}

/// Out-of-range values saturate at the policy bound instead of panicking
fn secs(value: u64) -> Duration {
    Duration::seconds(i64::try_from(value.min(MAX_POLICY_SECS)).unwrap_or(i64::MAX / 1_000))
}

/// Tick periods of the background sweeper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweeperConfig {
    /// Full scan of the store for due rotations
    pub rotation_sweep_interval: StdDuration,
    /// Schedule-driven rotation of individual records; `None` disables it
    pub fine_sweep_interval: Option<StdDuration>,
    /// Blacklisting of rotated records whose grace period ended
    pub grace_sweep_interval: StdDuration,
    /// Retention cleanup of records and revocation entries
    pub cleanup_interval: StdDuration,
    /// Periodic snapshot export; `None` disables it
    pub snapshot_interval: Option<StdDuration>,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            rotation_sweep_interval: StdDuration::from_secs(3600),
            fine_sweep_interval: Some(StdDuration::from_secs(300)),
            grace_sweep_interval: StdDuration::from_secs(3600),
            cleanup_interval: StdDuration::from_secs(86_400),
            snapshot_interval: None,
        }
    }
}

impl SweeperConfig {
    pub fn from_config(rotation: &RotationConfig, persistence: &PersistenceConfig) -> Self {
        let non_zero = |secs: u64| (secs > 0).then(|| StdDuration::from_secs(secs));
        Self {
            rotation_sweep_interval: StdDuration::from_secs(rotation.sweep_interval_secs),
            fine_sweep_interval: non_zero(rotation.fine_sweep_interval_secs),
            grace_sweep_interval: StdDuration::from_secs(rotation.sweep_interval_secs),
            cleanup_interval: StdDuration::from_secs(rotation.cleanup_interval_secs),
            snapshot_interval: if persistence.is_enabled() {
                non_zero(persistence.snapshot_interval_secs)
            } else {
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_config_from_rotation_config() {
        let config = RotationManagerConfig::from(&RotationConfig::default());
        assert_eq!(config, RotationManagerConfig::default());
    }

    #[test]
    fn test_out_of_range_durations_saturate() {
        let rotation = RotationConfig {
            rotation_interval_secs: u64::MAX,
            grace_period_secs: i64::MAX as u64 / 10,
            ..Default::default()
        };

        let config = RotationManagerConfig::from(&rotation);

        let bound = Duration::seconds(MAX_POLICY_SECS as i64);
        assert_eq!(config.rotation_interval, bound);
        assert_eq!(config.grace_period, bound);
        assert_eq!(config.token_ttl, bound);
    }
}
