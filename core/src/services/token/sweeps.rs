//! Single passes of the periodic maintenance jobs
//!
//! Each pass isolates per-token failures: one token that cannot be rotated
//! or blacklisted is recorded in the report and the pass moves on.

use tracing::{debug, info, warn};

use crate::errors::{DomainResult, TokenError};
use crate::repositories::{RevocationSet, TokenStore};

use super::manager::{RotationManager, AUTOMATIC_ROTATION_FROM};

/// Result of one sweep pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Tokens the pass looked at
    pub examined: usize,
    /// Tokens acted on successfully
    pub succeeded: usize,
    /// Tokens another path already handled
    pub skipped: usize,
    /// Tokens that could not be handled
    pub failed: usize,
    /// Any errors encountered during the pass
    pub errors: Vec<String>,
}

impl SweepReport {
    /// Check if the pass was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    fn record_failure(&mut self, token_id: uuid::Uuid, error: impl std::fmt::Display) {
        self.failed += 1;
        self.errors.push(format!("{}: {}", token_id, error));
    }
}

/// Result of a retention cleanup pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupResult {
    /// Records older than the retention window that were deleted
    pub records_deleted: usize,
    /// Revocation entries dropped along with their records
    pub revocations_removed: usize,
    /// Revocation entries past their own expiry
    pub revocations_purged: usize,
}

impl CleanupResult {
    /// Get total number of items cleaned up
    pub fn total_cleaned(&self) -> usize {
        self.records_deleted + self.revocations_removed + self.revocations_purged
    }
}

/// Whether an error means another path already took care of the token
fn handled_elsewhere(error: &crate::errors::DomainError) -> bool {
    matches!(
        error.token_error(),
        Some(
            TokenError::RotationConflict { .. }
                | TokenError::AlreadyRevoked { .. }
                | TokenError::TokenNotFound { .. }
        )
    )
}

impl<S: TokenStore, R: RevocationSet> RotationManager<S, R> {
    /// Scans the store and rotates every active token that is due
    ///
    /// Afterwards the rotation schedule is rebuilt from the store, which
    /// repairs any drift between the two.
    pub async fn run_rotation_sweep(&self) -> DomainResult<SweepReport> {
        let now = self.clock.now();
        let due: Vec<_> = self
            .store
            .list_active()
            .await?
            .into_iter()
            .filter(|record| record.is_due(now))
            .collect();

        let mut report = SweepReport {
            examined: due.len(),
            ..Default::default()
        };
        for record in due {
            match self
                .rotate_from(record.token_id, None, AUTOMATIC_ROTATION_FROM)
                .await
            {
                Ok(_) => report.succeeded += 1,
                Err(e) if handled_elsewhere(&e) => report.skipped += 1,
                Err(e) => {
                    warn!(token_id = %record.token_id, "Scheduled rotation failed: {}", e);
                    report.record_failure(record.token_id, e);
                }
            }
        }

        let upcoming = self
            .store
            .list_active()
            .await?
            .into_iter()
            .filter(|record| !record.is_due(now))
            .map(|record| (record.token_id, record.rotation_due));
        self.schedule.rebuild(upcoming);

        info!(
            "Rotation sweep completed - Due: {}, Rotated: {}, Skipped: {}, Failed: {}",
            report.examined, report.succeeded, report.skipped, report.failed
        );
        Ok(report)
    }

    /// Rotates the tokens whose scheduled time has passed
    ///
    /// Cheaper than a full sweep; only the schedule is consulted. Entries
    /// that fail are put back so the next pass retries them.
    pub async fn run_scheduled_rotations(&self) -> DomainResult<SweepReport> {
        let now = self.clock.now();
        let due = self.schedule.take_due(now);

        let mut report = SweepReport {
            examined: due.len(),
            ..Default::default()
        };
        for (token_id, due_at) in due {
            match self
                .rotate_from(token_id, None, AUTOMATIC_ROTATION_FROM)
                .await
            {
                Ok(_) => report.succeeded += 1,
                Err(e) if handled_elsewhere(&e) => report.skipped += 1,
                Err(e) => {
                    warn!(token_id = %token_id, "Scheduled rotation failed: {}", e);
                    self.schedule.schedule(token_id, due_at);
                    report.record_failure(token_id, e);
                }
            }
        }

        if report.examined > 0 {
            debug!(
                rotated = report.succeeded,
                skipped = report.skipped,
                failed = report.failed,
                "Scheduled rotations processed"
            );
        }
        Ok(report)
    }

    /// Blacklists rotated tokens whose grace period has ended
    pub async fn run_grace_period_sweep(&self) -> DomainResult<SweepReport> {
        let now = self.clock.now();
        let grace = self.config.grace_period;
        let expired: Vec<_> = self
            .store
            .list_all()
            .await?
            .into_iter()
            .filter(|record| record.is_grace_expired(now, grace))
            .collect();

        let mut report = SweepReport {
            examined: expired.len(),
            ..Default::default()
        };
        for record in expired {
            match self.blacklist_token(record.token_id).await {
                Ok(true) => report.succeeded += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    warn!(token_id = %record.token_id, "Grace period enforcement failed: {}", e);
                    report.record_failure(record.token_id, e);
                }
            }
        }

        info!(
            "Grace period sweep completed - Expired: {}, Blacklisted: {}, Failed: {}",
            report.examined, report.succeeded, report.failed
        );
        Ok(report)
    }

    /// Deletes records older than the retention window and expired revocation entries
    pub async fn run_cleanup(&self) -> DomainResult<CleanupResult> {
        let now = self.clock.now();
        let cutoff = now - self.config.retention_window;

        let mut result = CleanupResult::default();
        for token_id in self.store.delete_created_before(cutoff).await? {
            result.records_deleted += 1;
            self.schedule.cancel(token_id);
            if self.revocations.remove(token_id).await? {
                result.revocations_removed += 1;
            }
        }
        result.revocations_purged = self.revocations.purge_expired(now).await?;

        info!(
            "Token cleanup completed - Records: {}, Revocations removed: {}, Revocations expired: {}",
            result.records_deleted, result.revocations_removed, result.revocations_purged
        );
        Ok(result)
    }
}
