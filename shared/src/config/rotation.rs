//! Rotation policy configuration

use serde::{Deserialize, Serialize};

use super::{env_parse, env_parse_opt, ConfigError};

const DAY_SECS: u64 = 24 * 60 * 60;

/// Largest accepted value for any duration in the policy (100 years)
pub const MAX_POLICY_SECS: u64 = 100 * 365 * DAY_SECS;

/// Rotation schedule, grace period and retention policy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RotationConfig {
    /// Time between issuance and the token becoming due for rotation (seconds)
    #[serde(default = "default_rotation_interval")]
    pub rotation_interval_secs: u64,

    /// Window after rotation during which the superseded token stays valid (seconds)
    #[serde(default = "default_grace_period")]
    pub grace_period_secs: u64,

    /// Age after which a record is deleted regardless of status (seconds)
    #[serde(default = "default_retention_window")]
    pub retention_window_secs: u64,

    /// Interval of the full rotation sweep (seconds)
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Interval of the fine-grained rotation sweep; `0` disables it
    #[serde(default = "default_fine_sweep_interval")]
    pub fine_sweep_interval_secs: u64,

    /// Interval of the retention cleanup sweep (seconds)
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,

    /// Lifetime of the signed credential (`exp`). Defaults to rotation interval + grace period.
    #[serde(default)]
    pub token_ttl_secs: Option<u64>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            rotation_interval_secs: default_rotation_interval(),
            grace_period_secs: default_grace_period(),
            retention_window_secs: default_retention_window(),
            sweep_interval_secs: default_sweep_interval(),
            fine_sweep_interval_secs: default_fine_sweep_interval(),
            cleanup_interval_secs: default_cleanup_interval(),
            token_ttl_secs: None,
        }
    }
}

impl RotationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            rotation_interval_secs: env_parse("ROTATION_INTERVAL_SECS", default_rotation_interval()),
            grace_period_secs: env_parse("ROTATION_GRACE_PERIOD_SECS", default_grace_period()),
            retention_window_secs: env_parse("ROTATION_RETENTION_SECS", default_retention_window()),
            sweep_interval_secs: env_parse("ROTATION_SWEEP_INTERVAL_SECS", default_sweep_interval()),
            fine_sweep_interval_secs: env_parse(
                "ROTATION_FINE_SWEEP_INTERVAL_SECS",
                default_fine_sweep_interval(),
            ),
            cleanup_interval_secs: env_parse(
                "ROTATION_CLEANUP_INTERVAL_SECS",
                default_cleanup_interval(),
            ),
            token_ttl_secs: env_parse_opt("ROTATION_TOKEN_TTL_SECS"),
        }
    }

    /// Set the rotation interval in days
    pub fn with_rotation_interval_days(mut self, days: u64) -> Self {
        self.rotation_interval_secs = days.saturating_mul(DAY_SECS);
        self
    }

    /// Set the grace period in days
    pub fn with_grace_period_days(mut self, days: u64) -> Self {
        self.grace_period_secs = days.saturating_mul(DAY_SECS);
        self
    }

    /// Set the retention window in days
    pub fn with_retention_days(mut self, days: u64) -> Self {
        self.retention_window_secs = days.saturating_mul(DAY_SECS);
        self
    }

    /// Effective credential lifetime in seconds
    pub fn effective_token_ttl_secs(&self) -> u64 {
        self.token_ttl_secs
            .unwrap_or_else(|| self.rotation_interval_secs.saturating_add(self.grace_period_secs))
    }

    /// Check the policy for internally inconsistent values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounded = [
            ("rotation_interval_secs", self.rotation_interval_secs),
            ("grace_period_secs", self.grace_period_secs),
            ("retention_window_secs", self.retention_window_secs),
            ("sweep_interval_secs", self.sweep_interval_secs),
            ("fine_sweep_interval_secs", self.fine_sweep_interval_secs),
            ("cleanup_interval_secs", self.cleanup_interval_secs),
            ("token_ttl_secs", self.effective_token_ttl_secs()),
        ];
        for (field, value) in bounded {
            if value > MAX_POLICY_SECS {
                return Err(ConfigError::invalid(
                    field,
                    format!("must not exceed {} seconds", MAX_POLICY_SECS),
                ));
            }
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::invalid(
                "sweep_interval_secs",
                "must be greater than zero",
            ));
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ConfigError::invalid(
                "cleanup_interval_secs",
                "must be greater than zero",
            ));
        }
        if self.retention_window_secs < self.grace_period_secs {
            return Err(ConfigError::invalid(
                "retention_window_secs",
                "must not be shorter than the grace period",
            ));
        }
        if self.effective_token_ttl_secs() == 0 {
            return Err(ConfigError::invalid("token_ttl_secs", "must be greater than zero"));
        }
        // Records and revocation entries are dropped after the retention window;
        // a credential outliving them would verify as untracked.
        if self.effective_token_ttl_secs() > self.retention_window_secs {
            return Err(ConfigError::invalid(
                "token_ttl_secs",
                "must not exceed the retention window",
            ));
        }
        Ok(())
    }
}

fn default_rotation_interval() -> u64 {
    30 * DAY_SECS
}

fn default_grace_period() -> u64 {
    7 * DAY_SECS
}

fn default_retention_window() -> u64 {
    90 * DAY_SECS
}

fn default_sweep_interval() -> u64 {
    3600
}

fn default_fine_sweep_interval() -> u64 {
    300
}

fn default_cleanup_interval() -> u64 {
    DAY_SECS
}
