//! Execution engine. Drives each admitted transaction through
//! `pending -> submitted -> {confirmed, failed}` across three stages:
//!
//! - **prepare**: re-checks the expiry deadline, reserves a submission
//!   identity and its next sequence slot, prices and signs the outbound
//!   payload;
//! - **submit**: re-checks the deadline immediately before dispatch, sends
//!   the raw bytes and moves the record to `submitted`;
//! - **watch**: polls the target for a receipt, resubmitting the identical
//!   payload on watch timeout until the attempt budget is spent.
//!
//! Retries reuse the same identity and the same sequence slot. A sequence
//! conflict ends the transaction and flags the identity for
//! resynchronization. Terminal records are never acted on again; a late
//! receipt for a failed transaction is informational only.

use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};

use crate::{
    constants::{
        CONFIRMATION_WATCH_TIMEOUT_SECONDS, DEFAULT_GAS_LIMIT, MAX_SUBMISSION_ATTEMPTS,
        STATUS_CHECK_DELAY_SECONDS, SUBMISSION_RETRY_BASE_DELAY_SECONDS,
    },
    jobs::{JobProducerTrait, TransactionRequest, TransactionSend, TransactionStatusCheck},
    models::{
        Address, FailureReason, OutboundTransaction, ProviderError, SubmissionError,
        TransactionRecord, TransactionStatus, TransactionUpdate,
    },
    repositories::TransactionRepository,
    services::{ExecutionTargetTrait, IdentityLease, LeaseOutcome, ReceiptState, SubmissionWalletPool},
    utils::{age_in_seconds, now_rfc3339, now_secs},
};

pub struct ExecutionEngine<P, TR, J>
where
    P: ExecutionTargetTrait,
    TR: TransactionRepository,
    J: JobProducerTrait,
{
    provider: Arc<P>,
    transaction_repository: Arc<TR>,
    job_producer: Arc<J>,
    wallet_pool: Arc<SubmissionWalletPool>,
    chain_id: u64,
}

impl<P, TR, J> ExecutionEngine<P, TR, J>
where
    P: ExecutionTargetTrait,
    TR: TransactionRepository,
    J: JobProducerTrait,
{
    pub fn new(
        provider: Arc<P>,
        transaction_repository: Arc<TR>,
        job_producer: Arc<J>,
        wallet_pool: Arc<SubmissionWalletPool>,
        chain_id: u64,
    ) -> Self {
        Self {
            provider,
            transaction_repository,
            job_producer,
            wallet_pool,
            chain_id,
        }
    }

    /// Stage one: deadline gate, identity reservation, pricing and signing.
    /// Leaves the record `pending`; dispatch happens in
    /// [`ExecutionEngine::submit_transaction`].
    pub async fn prepare_transaction(
        &self,
        tx: TransactionRecord,
    ) -> Result<TransactionRecord, SubmissionError> {
        if tx.status.is_terminal() {
            info!("transaction {} already terminal, skipping prepare", tx.id);
            return Ok(tx);
        }

        let now = now_secs();
        if tx.is_expired(now) {
            return self
                .fail_terminal(&tx, FailureReason::Expired, LeaseOutcome::Unused)
                .await;
        }

        // A crashed or retried prepare must reuse its reservation rather
        // than leak a second identity onto the same transaction.
        let lease = match self.wallet_pool.lease_for(&tx.id).await {
            Some(lease) => lease,
            None => match self.wallet_pool.acquire(&tx.id).await {
                Ok(lease) => lease,
                Err(SubmissionError::NoIdentityAvailable) => {
                    info!(
                        "no submission identity available for {}, rescheduling",
                        tx.id
                    );
                    self.job_producer
                        .produce_transaction_request_job(
                            TransactionRequest::new(&tx.id),
                            Some(Utc::now().timestamp() + SUBMISSION_RETRY_BASE_DELAY_SECONDS),
                        )
                        .await?;
                    return Ok(tx);
                }
                Err(e) => return Err(e),
            },
        };

        let signed = match self.price_and_sign(&tx, &lease).await {
            Ok(signed) => signed,
            Err(e) => {
                // Keep the reservation for the retried prepare.
                self.wallet_pool.end_attempt(&tx.id).await;
                return Err(e);
            }
        };

        let updated = self
            .transaction_repository
            .update(
                tx.id.clone(),
                TransactionUpdate::default()
                    .with_identity(lease.address, lease.sequence)
                    .with_raw(signed.raw),
            )
            .await?;

        self.job_producer
            .produce_submit_transaction_job(TransactionSend::submit(&tx.id), None)
            .await?;

        info!(
            "prepared transaction {} on identity {} slot {}",
            updated.id, lease.address, lease.sequence
        );
        Ok(updated)
    }

    async fn price_and_sign(
        &self,
        tx: &TransactionRecord,
        lease: &IdentityLease,
    ) -> Result<crate::services::SignedTransaction, SubmissionError> {
        let gas_limit = match self
            .provider
            .estimate_gas(lease.address, tx.to, tx.value, tx.calldata.clone())
            .await
        {
            Ok(gas) => gas,
            // The target refusing to estimate (e.g. currently reverting) is
            // not grounds to drop the intent; dispatch with the fallback
            // limit and let the target decide.
            Err(ProviderError::Rejected(reason)) => {
                warn!(
                    "gas estimation rejected for {} ({}), using fallback limit",
                    tx.id, reason
                );
                DEFAULT_GAS_LIMIT
            }
            Err(e) => return Err(e.into()),
        };
        let gas_price = self.provider.get_gas_price().await.map_err(SubmissionError::from)?;

        let outbound =
            OutboundTransaction::from_record(tx, lease.sequence, gas_limit, gas_price, self.chain_id);
        Ok(lease.signer.sign_transaction(outbound).await?)
    }

    /// Stage two: dispatch the signed payload. Re-checks the hard deadline
    /// immediately before sending; an expired transaction is failed and the
    /// identity released without consuming its slot.
    pub async fn submit_transaction(
        &self,
        tx: TransactionRecord,
    ) -> Result<TransactionRecord, SubmissionError> {
        if tx.status.is_terminal() {
            info!("transaction {} already terminal, skipping submit", tx.id);
            return Ok(tx);
        }

        let now = now_secs();
        if tx.is_expired(now) {
            return self
                .fail_terminal(&tx, FailureReason::Expired, self.slot_outcome(&tx))
                .await;
        }

        let raw = tx.raw.clone().ok_or_else(|| {
            SubmissionError::Internal(format!("transaction {} has no signed payload", tx.id))
        })?;
        let attempts = tx.attempts + 1;

        match self.provider.send_raw_transaction(raw).await {
            Ok(hash) => {
                self.wallet_pool.end_attempt(&tx.id).await;
                let updated = self.record_dispatch(&tx, hash, attempts).await?;
                self.job_producer
                    .produce_check_transaction_status_job(
                        TransactionStatusCheck::new(&tx.id),
                        Some(Utc::now().timestamp() + STATUS_CHECK_DELAY_SECONDS),
                    )
                    .await?;
                info!(
                    "dispatched transaction {} (attempt {}/{})",
                    updated.id, attempts, MAX_SUBMISSION_ATTEMPTS
                );
                Ok(updated)
            }
            Err(e) => self.handle_dispatch_error(tx, e.into(), attempts).await,
        }
    }

    async fn record_dispatch(
        &self,
        tx: &TransactionRecord,
        hash: String,
        attempts: u32,
    ) -> Result<TransactionRecord, SubmissionError> {
        let mut update = TransactionUpdate::default()
            .with_sent_at(now_rfc3339())
            .with_attempts(attempts);
        // Retries re-send identical bytes, so only a new hash is recorded.
        if tx.hash.as_deref() != Some(hash.as_str()) {
            update = update.with_hash(hash);
        }

        let updated = if tx.status == TransactionStatus::Pending {
            update.status = Some(TransactionStatus::Submitted);
            self.transaction_repository
                .transition_status(tx.id.clone(), vec![TransactionStatus::Pending], update)
                .await?
        } else {
            self.transaction_repository
                .update(tx.id.clone(), update)
                .await?
        };
        Ok(updated)
    }

    async fn handle_dispatch_error(
        &self,
        tx: TransactionRecord,
        error: SubmissionError,
        attempts: u32,
    ) -> Result<TransactionRecord, SubmissionError> {
        match error {
            SubmissionError::SequenceConflict(reason) => {
                warn!(
                    "sequence conflict dispatching {}: {}; resyncing identity",
                    tx.id, reason
                );
                let failed = self
                    .fail_terminal(&tx, FailureReason::SequenceConflict, LeaseOutcome::Unknown)
                    .await?;
                if let Some(identity) = tx.from {
                    self.resync_identity(identity).await;
                }
                Ok(failed)
            }
            e if e.is_retryable() => {
                if attempts >= MAX_SUBMISSION_ATTEMPTS {
                    warn!(
                        "transaction {} exhausted its {} submission attempts: {}",
                        tx.id, MAX_SUBMISSION_ATTEMPTS, e
                    );
                    return self
                        .fail_with_attempts(&tx, e.failure_reason(), self.slot_outcome(&tx), attempts)
                        .await;
                }
                self.transaction_repository
                    .update(
                        tx.id.clone(),
                        TransactionUpdate::default().with_attempts(attempts),
                    )
                    .await?;
                self.wallet_pool.end_attempt(&tx.id).await;
                let delay = submission_backoff_seconds(attempts);
                info!(
                    "dispatch of {} failed ({}), retrying in {}s (attempt {}/{})",
                    tx.id, e, delay, attempts, MAX_SUBMISSION_ATTEMPTS
                );
                self.job_producer
                    .produce_submit_transaction_job(
                        TransactionSend::resubmit(&tx.id),
                        Some(Utc::now().timestamp() + delay),
                    )
                    .await?;
                self.transaction_repository
                    .get_by_id(tx.id.clone())
                    .await
                    .map_err(SubmissionError::from)
            }
            e => Err(e),
        }
    }

    /// Stage three: confirmation watching. Keyed by the dispatched hash.
    pub async fn check_transaction_status(
        &self,
        tx: TransactionRecord,
    ) -> Result<TransactionRecord, SubmissionError> {
        if tx.status.is_terminal() {
            // A late, contradicting receipt is informational only.
            info!(
                "status check on terminal transaction {} ({}), ignoring",
                tx.id, tx.status
            );
            return Ok(tx);
        }
        if tx.status == TransactionStatus::Pending {
            self.reschedule_status_check(&tx.id).await?;
            return Ok(tx);
        }

        let hash = tx.hash.clone().ok_or_else(|| {
            SubmissionError::Internal(format!("submitted transaction {} has no hash", tx.id))
        })?;

        match self.provider.get_receipt(hash).await.map_err(SubmissionError::from)? {
            ReceiptState::Confirmed { success: true } => {
                let updated = self
                    .transaction_repository
                    .transition_status(
                        tx.id.clone(),
                        vec![TransactionStatus::Submitted],
                        TransactionUpdate::status(TransactionStatus::Confirmed)
                            .with_confirmed_at(now_rfc3339()),
                    )
                    .await?;
                self.wallet_pool.finalize(&tx.id, LeaseOutcome::Consumed).await;
                info!("transaction {} confirmed", updated.id);
                Ok(updated)
            }
            ReceiptState::Confirmed { success: false } => {
                // The slot was consumed on chain even though execution
                // reverted.
                self.fail_terminal(&tx, FailureReason::TargetReverted, LeaseOutcome::Consumed)
                    .await
            }
            ReceiptState::Pending | ReceiptState::NotFound => {
                self.handle_unconfirmed(tx).await
            }
        }
    }

    async fn handle_unconfirmed(
        &self,
        tx: TransactionRecord,
    ) -> Result<TransactionRecord, SubmissionError> {
        let now = now_secs();
        if tx.is_expired(now) {
            // Cooperative cancellation: the dispatch cannot be aborted, but
            // nothing further is done with it once the deadline passed.
            return self
                .fail_terminal(&tx, FailureReason::Expired, self.slot_outcome(&tx))
                .await;
        }

        let age = tx.sent_at.as_deref().and_then(age_in_seconds).unwrap_or(0);
        if age < CONFIRMATION_WATCH_TIMEOUT_SECONDS {
            self.reschedule_status_check(&tx.id).await?;
            return Ok(tx);
        }

        if tx.attempts >= MAX_SUBMISSION_ATTEMPTS {
            warn!(
                "transaction {} unconfirmed after {} attempts, giving up",
                tx.id, tx.attempts
            );
            return self
                .fail_terminal(&tx, FailureReason::WatchTimeout, LeaseOutcome::Unknown)
                .await;
        }

        info!(
            "watch timeout for {} (attempt {}/{}), resubmitting",
            tx.id, tx.attempts, MAX_SUBMISSION_ATTEMPTS
        );
        self.job_producer
            .produce_submit_transaction_job(TransactionSend::resubmit(&tx.id), None)
            .await?;
        Ok(tx)
    }

    async fn reschedule_status_check(&self, tx_id: &str) -> Result<(), SubmissionError> {
        self.job_producer
            .produce_check_transaction_status_job(
                TransactionStatusCheck::new(tx_id),
                Some(Utc::now().timestamp() + STATUS_CHECK_DELAY_SECONDS),
            )
            .await?;
        Ok(())
    }

    /// Re-reads the identity's authoritative sequence from the target. On
    /// read failure the identity stays flagged and out of rotation.
    pub async fn resync_identity(&self, identity: Address) {
        match self.provider.get_transaction_count(identity).await {
            Ok(sequence) => {
                self.wallet_pool.set_sequence(&identity, sequence).await;
                info!("resynced identity {} to sequence {}", identity, sequence);
            }
            Err(e) => {
                warn!("failed to resync identity {}: {}", identity, e);
                self.wallet_pool.mark_for_resync(&identity).await;
            }
        }
    }

    /// Whether the reserved slot can still be reused after this transaction:
    /// untouched if nothing was ever dispatched, unknown otherwise.
    fn slot_outcome(&self, tx: &TransactionRecord) -> LeaseOutcome {
        if tx.hashes.is_empty() {
            LeaseOutcome::Unused
        } else {
            LeaseOutcome::Unknown
        }
    }

    async fn fail_terminal(
        &self,
        tx: &TransactionRecord,
        reason: FailureReason,
        outcome: LeaseOutcome,
    ) -> Result<TransactionRecord, SubmissionError> {
        self.fail_with_attempts(tx, reason, outcome, tx.attempts).await
    }

    async fn fail_with_attempts(
        &self,
        tx: &TransactionRecord,
        reason: FailureReason,
        outcome: LeaseOutcome,
        attempts: u32,
    ) -> Result<TransactionRecord, SubmissionError> {
        let result = self
            .transaction_repository
            .transition_status(
                tx.id.clone(),
                vec![TransactionStatus::Pending, TransactionStatus::Submitted],
                TransactionUpdate::failed(reason).with_attempts(attempts),
            )
            .await;
        match result {
            Ok(updated) => {
                self.wallet_pool.finalize(&tx.id, outcome).await;
                warn!("transaction {} failed: {}", updated.id, reason);
                Ok(updated)
            }
            Err(crate::models::RepositoryError::StatusConflict(_)) => {
                // Lost the race against another transition; report what won.
                self.transaction_repository
                    .get_by_id(tx.id.clone())
                    .await
                    .map_err(SubmissionError::from)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Exponential backoff for engine-scheduled submission retries.
fn submission_backoff_seconds(attempts: u32) -> i64 {
    SUBMISSION_RETRY_BASE_DELAY_SECONDS << attempts.saturating_sub(1).min(6)
}
