//! Rotation manager: the façade over issuance, verification, rotation and revocation

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::entities::{
    ClaimPatch, ClaimSet, StateSnapshot, StatusTransition, TokenClaims, TokenRecord, TokenStatus,
    RevocationEntry, TOKEN_FORMAT_VERSION,
};
use crate::domain::value_objects::{
    ImportSummary, IssueOptions, IssuedToken, MassRotationReport, RotationOutcome,
    TokenStatistics, VerificationOutcome,
};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::{RevocationSet, TokenStore, TransitionResult};

use super::clock::Clock;
use super::codec::TokenCodec;
use super::config::RotationManagerConfig;
use super::schedule::RotationSchedule;

/// Statuses a manual rotation may start from
const MANUAL_ROTATION_FROM: &[TokenStatus] = &[TokenStatus::Active, TokenStatus::Rotated];

/// Statuses sweeps and forced rotation may start from
pub(super) const AUTOMATIC_ROTATION_FROM: &[TokenStatus] = &[TokenStatus::Active];

/// Statuses that can still be blacklisted
const BLACKLISTABLE_FROM: &[TokenStatus] = &[TokenStatus::Active, TokenStatus::Rotated];

/// Owns the token lifecycle
///
/// All state changes go through [`TokenStore::transition`], so concurrent
/// callers (request handlers and the background sweeps) never move a record
/// backwards or supersede it twice.
pub struct RotationManager<S: TokenStore, R: RevocationSet> {
    pub(super) store: Arc<S>,
    pub(super) revocations: Arc<R>,
    pub(super) codec: TokenCodec,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) schedule: RotationSchedule,
    pub(super) config: RotationManagerConfig,
}

impl<S: TokenStore, R: RevocationSet> RotationManager<S, R> {
    /// Creates a new rotation manager
    ///
    /// # Arguments
    ///
    /// * `store` - Token record storage
    /// * `revocations` - Revocation set consulted on every verification
    /// * `codec` - Credential signer and parser
    /// * `clock` - Time source for every lifecycle decision
    /// * `config` - Rotation interval, grace period, retention and credential TTL
    pub fn new(
        store: Arc<S>,
        revocations: Arc<R>,
        codec: TokenCodec,
        clock: Arc<dyn Clock>,
        config: RotationManagerConfig,
    ) -> Self {
        Self {
            store,
            revocations,
            codec,
            clock,
            schedule: RotationSchedule::new(),
            config,
        }
    }

    pub fn config(&self) -> &RotationManagerConfig {
        &self.config
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn schedule(&self) -> &RotationSchedule {
        &self.schedule
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Issues a new credential for `claims`
    ///
    /// # Returns
    /// * `Ok(IssuedToken)` - Credential signed, recorded and scheduled for rotation
    /// * `Err(DomainError::Validation)` - Claims use a reserved key, or options are out of range
    /// * `Err(DomainError::Token(SigningFailed))` - Signing failed; nothing was stored
    pub async fn issue_token(
        &self,
        claims: ClaimSet,
        options: IssueOptions,
    ) -> DomainResult<IssuedToken> {
        ensure_no_reserved_claims(&claims)?;
        let record = self.mint(claims, options, None).await?;
        Ok(IssuedToken::from(&record))
    }

    /// Signs, stores and schedules a credential
    async fn mint(
        &self,
        custom: ClaimSet,
        options: IssueOptions,
        predecessor: Option<&TokenRecord>,
    ) -> DomainResult<TokenRecord> {
        let interval = options.rotation_interval.unwrap_or(self.config.rotation_interval);
        let ttl = options.ttl.unwrap_or(self.config.token_ttl);
        if interval < chrono::Duration::zero() {
            return Err(DomainError::Validation {
                message: "Rotation interval must not be negative".to_string(),
            });
        }
        if ttl <= chrono::Duration::zero() {
            return Err(DomainError::Validation {
                message: "Credential lifetime must be positive".to_string(),
            });
        }
        // The record and its revocation entry are dropped after the retention
        // window; the credential must have expired by then.
        if ttl > self.config.retention_window {
            return Err(DomainError::Validation {
                message: "Credential lifetime must not exceed the retention window".to_string(),
            });
        }

        let now = self.clock.now();
        let rotation_due = now
            .checked_add_signed(interval)
            .ok_or_else(|| DomainError::Validation {
                message: "Rotation interval is out of range".to_string(),
            })?;
        let claims = TokenClaims {
            token_id: Uuid::new_v4(),
            issued_at: now.timestamp(),
            rotation_due: rotation_due.timestamp(),
            version: TOKEN_FORMAT_VERSION.to_string(),
            previous_token_id: predecessor.map(|p| p.token_id),
            rotation_count: predecessor.map(|p| p.rotation_count + 1).unwrap_or(0),
            iss: String::new(),
            aud: String::new(),
            exp: 0,
            custom,
        };

        let signed = self.codec.sign(claims, ttl).map_err(|e| {
            error!("Failed to sign credential: {}", e);
            e
        })?;

        let record = TokenRecord::new(signed.claims, signed.value, now, rotation_due);
        self.store.put(record.clone()).await?;
        self.schedule.schedule(record.token_id, rotation_due);

        info!(
            token_id = %record.token_id,
            rotation_due = %rotation_due,
            rotation_count = record.rotation_count,
            "Issued credential"
        );
        Ok(record)
    }

    /// Verifies a credential and reports its rotation state
    ///
    /// Tokens without a record (for example, issued before a restart without
    /// persistence) are accepted as long as their signature and expiry hold;
    /// their rotation state is unknown.
    pub async fn verify_token(&self, signed: &str) -> DomainResult<VerificationOutcome> {
        let now = self.clock.now();
        let claims = self.codec.parse(signed, now)?;
        let token_id = claims.token_id;

        if self.revocations.contains(token_id).await? {
            debug!(token_id = %token_id, "Rejected revoked credential");
            return Err(TokenError::Revoked.into());
        }

        let Some(record) = self.store.get(token_id).await? else {
            debug!(token_id = %token_id, "Verified untracked credential");
            return Ok(VerificationOutcome {
                valid: true,
                claims: Some(claims),
                needs_rotation: false,
                in_grace_period: false,
                rotation_due: None,
            });
        };

        if record.is_blacklisted() || record.is_grace_expired(now, self.config.grace_period) {
            debug!(token_id = %token_id, status = %record.status, "Rejected superseded credential");
            return Err(TokenError::Revoked.into());
        }

        Ok(VerificationOutcome {
            valid: true,
            claims: Some(claims),
            needs_rotation: now > record.rotation_due,
            in_grace_period: now < record.rotation_due + self.config.grace_period,
            rotation_due: Some(record.rotation_due),
        })
    }

    /// Supersedes a token with a successor, optionally changing its claims
    ///
    /// The old credential keeps verifying until its grace period ends.
    ///
    /// # Returns
    /// * `Ok(IssuedToken)` - The successor
    /// * `Err(TokenError::TokenNotFound)` - No record for `token_id`
    /// * `Err(TokenError::AlreadyRevoked)` - The token is blacklisted
    /// * `Err(TokenError::RotationConflict)` - The record changed state during rotation
    pub async fn rotate_token(
        &self,
        token_id: Uuid,
        patch: Option<ClaimPatch>,
    ) -> DomainResult<IssuedToken> {
        let record = self
            .rotate_from(token_id, patch.as_ref(), MANUAL_ROTATION_FROM)
            .await?;
        Ok(IssuedToken::from(&record))
    }

    /// Rotates `token_id` if its status is one of `accepted`
    ///
    /// The successor is stored before the predecessor is marked rotated. If
    /// the compare-and-swap on the predecessor loses, the successor is
    /// deleted again so no orphan survives.
    pub(super) async fn rotate_from(
        &self,
        token_id: Uuid,
        patch: Option<&ClaimPatch>,
        accepted: &[TokenStatus],
    ) -> DomainResult<TokenRecord> {
        if self.revocations.contains(token_id).await? {
            return Err(already_revoked(token_id));
        }

        let old = self
            .store
            .get(token_id)
            .await?
            .ok_or_else(|| DomainError::from(TokenError::TokenNotFound {
                token_id: token_id.to_string(),
            }))?;

        if old.is_blacklisted() {
            return Err(already_revoked(token_id));
        }
        if !accepted.contains(&old.status) {
            return Err(rotation_conflict(token_id));
        }

        let mut claims = old.claims.custom.clone();
        if let Some(patch) = patch {
            claims.apply(patch);
            ensure_no_reserved_claims(&claims)?;
        }

        let mut options = IssueOptions::inherited_from(&old);
        options.ttl = options.ttl.map(|ttl| ttl.min(self.config.retention_window));
        let successor = self.mint(claims, options, Some(&old)).await?;

        let transition = StatusTransition::Rotated {
            at: self.clock.now(),
            new_token_id: successor.token_id,
        };
        let result = match self.store.transition(token_id, accepted, transition).await {
            Ok(result) => result,
            Err(e) => {
                self.discard(successor.token_id).await;
                return Err(e);
            }
        };

        match result {
            TransitionResult::Applied(rotated) => {
                self.schedule.cancel(token_id);
                info!(
                    old_token_id = %token_id,
                    new_token_id = %successor.token_id,
                    grace_expires_at = ?rotated.grace_expires_at(self.config.grace_period),
                    "Rotated credential"
                );
                Ok(successor)
            }
            TransitionResult::NotFound => {
                self.discard(successor.token_id).await;
                Err(TokenError::TokenNotFound {
                    token_id: token_id.to_string(),
                }
                .into())
            }
            TransitionResult::Conflict(status) => {
                self.discard(successor.token_id).await;
                warn!(token_id = %token_id, status = %status, "Rotation lost a concurrent state change");
                if status == TokenStatus::Blacklisted {
                    Err(already_revoked(token_id))
                } else {
                    Err(rotation_conflict(token_id))
                }
            }
        }
    }

    /// Removes a successor minted by a rotation that did not go through
    async fn discard(&self, token_id: Uuid) {
        self.schedule.cancel(token_id);
        if let Err(e) = self.store.delete(token_id).await {
            error!(token_id = %token_id, "Failed to discard orphaned successor: {}", e);
        }
    }

    /// Revokes a token immediately
    ///
    /// The revocation entry is written before the record changes state, so a
    /// verification running concurrently either sees the old state with the
    /// token still valid, or fails. Unknown ids are still added to the set.
    ///
    /// # Returns
    /// * `Ok(true)` - The token was newly blacklisted
    /// * `Ok(false)` - It already was
    pub async fn blacklist_token(&self, token_id: Uuid) -> DomainResult<bool> {
        let now = self.clock.now();
        let entry = RevocationEntry::new(token_id, now, now + self.config.retention_window);
        let added = self.revocations.add(entry).await?;

        let transition = StatusTransition::Blacklisted { at: now };
        match self.store.transition(token_id, BLACKLISTABLE_FROM, transition).await? {
            TransitionResult::Applied(_) | TransitionResult::Conflict(TokenStatus::Blacklisted) => {}
            TransitionResult::NotFound => {
                debug!(token_id = %token_id, "Blacklisted an untracked token");
            }
            TransitionResult::Conflict(status) => {
                warn!(token_id = %token_id, status = %status, "Unexpected status while blacklisting");
            }
        }
        self.schedule.cancel(token_id);

        if added {
            info!(token_id = %token_id, "Blacklisted credential");
        } else {
            debug!(token_id = %token_id, "Credential already blacklisted");
        }
        Ok(added)
    }

    /// Rotates every active token, continuing past individual failures
    pub async fn force_rotate_all(&self) -> DomainResult<MassRotationReport> {
        let active = self.store.list_active().await?;
        warn!("Forcing rotation of {} active credentials", active.len());

        let mut report = MassRotationReport::default();
        for record in active {
            let outcome = match self
                .rotate_from(record.token_id, None, AUTOMATIC_ROTATION_FROM)
                .await
            {
                Ok(successor) => RotationOutcome::succeeded(record.token_id, successor.token_id),
                Err(e) => {
                    warn!(token_id = %record.token_id, "Forced rotation failed: {}", e);
                    RotationOutcome::failed(record.token_id, e)
                }
            };
            report.push(outcome);
        }

        info!(
            "Forced rotation completed - Succeeded: {}, Failed: {}",
            report.succeeded, report.failed
        );
        Ok(report)
    }

    /// Counts records by status
    pub async fn get_statistics(&self) -> DomainResult<TokenStatistics> {
        let now = self.clock.now();
        let records = self.store.list_all().await?;

        let mut stats = TokenStatistics {
            total_count: records.len(),
            blacklisted_count: self.revocations.len().await?,
            ..Default::default()
        };
        for record in &records {
            match record.status {
                TokenStatus::Active => {
                    stats.active_count += 1;
                    if record.rotation_due < now {
                        stats.pending_rotation_count += 1;
                    }
                }
                TokenStatus::Rotated => stats.rotated_count += 1,
                TokenStatus::Blacklisted => {}
            }
        }
        Ok(stats)
    }

    /// Looks up the record for a token
    pub async fn get_token(&self, token_id: Uuid) -> DomainResult<Option<TokenRecord>> {
        self.store.get(token_id).await
    }

    /// Walks the rotation chain back from `token_id`, newest first
    ///
    /// The walk stops at the first predecessor no longer in the store.
    pub async fn lineage(&self, token_id: Uuid) -> DomainResult<Vec<TokenRecord>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(token_id);
        while let Some(id) = next {
            if !seen.insert(id) {
                break;
            }
            match self.store.get(id).await? {
                Some(record) => {
                    next = record.previous_token_id;
                    chain.push(record);
                }
                None => break,
            }
        }
        Ok(chain)
    }

    /// Snapshot of every record and revocation entry
    pub async fn export_state(&self) -> DomainResult<StateSnapshot> {
        let mut records = self.store.list_all().await?;
        records.sort_by_key(|r| (r.created_at, r.token_id));
        let mut entries = self.revocations.entries().await?;
        entries.sort_by_key(|e| (e.blacklisted_at, e.token_id));

        let snapshot = StateSnapshot::new(self.clock.now(), records, entries);
        debug!(
            records = snapshot.active_tokens.len(),
            revocations = snapshot.blacklisted_tokens.len(),
            "Exported state"
        );
        Ok(snapshot)
    }

    /// Replaces all state with a snapshot
    ///
    /// Active records whose rotation time already passed are not scheduled;
    /// the next full rotation sweep picks them up.
    pub async fn import_state(&self, snapshot: StateSnapshot) -> DomainResult<ImportSummary> {
        let version_mismatch = !snapshot.is_current_version();
        if version_mismatch {
            warn!(version = %snapshot.version, "Importing snapshot with a different format version");
        }

        let now = self.clock.now();
        let mut summary = ImportSummary {
            records_imported: snapshot.active_tokens.len(),
            revocations_imported: snapshot.blacklisted_tokens.len(),
            version_mismatch,
            ..Default::default()
        };

        let mut upcoming = Vec::new();
        for record in snapshot.active_tokens.iter().filter(|r| r.is_active()) {
            if record.rotation_due > now {
                upcoming.push((record.token_id, record.rotation_due));
            } else {
                summary.overdue_records += 1;
            }
        }
        summary.rotations_scheduled = upcoming.len();

        self.store.replace_all(snapshot.active_tokens).await?;
        self.revocations.replace_all(snapshot.blacklisted_tokens).await?;
        self.schedule.rebuild(upcoming);

        info!(
            "Imported state - Records: {}, Revocations: {}, Scheduled: {}, Overdue: {}",
            summary.records_imported,
            summary.revocations_imported,
            summary.rotations_scheduled,
            summary.overdue_records
        );
        Ok(summary)
    }
}

fn ensure_no_reserved_claims(claims: &ClaimSet) -> DomainResult<()> {
    match claims.reserved_key() {
        Some(key) => Err(DomainError::Validation {
            message: format!("Claim '{}' is reserved", key),
        }),
        None => Ok(()),
    }
}

fn already_revoked(token_id: Uuid) -> DomainError {
    TokenError::AlreadyRevoked {
        token_id: token_id.to_string(),
    }
    .into()
}

fn rotation_conflict(token_id: Uuid) -> DomainError {
    TokenError::RotationConflict {
        token_id: token_id.to_string(),
    }
    .into()
}
