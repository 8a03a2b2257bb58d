//! Intent admission. Checks run in order and fail fast: signature, window
//! shape, earliest-validity, expiry, then the exact-match nonce inside the
//! user's critical section. Sequence advancement and transaction creation
//! happen under that same critical section, so two concurrent admissions for
//! one user can never both pass the nonce check against a stale value.

use std::sync::Arc;

use log::{info, warn};

use crate::{
    jobs::{JobProducerTrait, TransactionRequest},
    models::{AdmissionError, FailureReason, Intent, TransactionRecord, TransactionStatus, TransactionUpdate},
    repositories::TransactionRepository,
    services::{verify_intent, NonceSequencer},
    utils::now_secs,
};

pub struct AdmissionController<TR, J>
where
    TR: TransactionRepository,
    J: JobProducerTrait,
{
    sequencer: NonceSequencer,
    transaction_repository: Arc<TR>,
    job_producer: Arc<J>,
}

impl<TR, J> AdmissionController<TR, J>
where
    TR: TransactionRepository,
    J: JobProducerTrait,
{
    pub fn new(
        sequencer: NonceSequencer,
        transaction_repository: Arc<TR>,
        job_producer: Arc<J>,
    ) -> Self {
        Self {
            sequencer,
            transaction_repository,
            job_producer,
        }
    }

    /// Admits a signed intent, returning the `pending` transaction record,
    /// or rejects it with the first failing check's reason.
    pub async fn admit(&self, intent: Intent) -> Result<TransactionRecord, AdmissionError> {
        verify_intent(&intent)?;
        intent.validate_window()?;

        let now = now_secs();
        if now < intent.execute_after {
            return Err(AdmissionError::NotYetValid {
                execute_after: intent.execute_after,
                now,
            });
        }
        if now >= intent.execute_before {
            return Err(AdmissionError::Expired {
                execute_before: intent.execute_before,
                now,
            });
        }

        let mut guard = self.sequencer.lock_user(&intent.user).await;
        guard.check(intent.nonce)?;

        let record = self
            .transaction_repository
            .create(TransactionRecord::from_intent(&intent))
            .await?;

        if let Err(e) = self
            .job_producer
            .produce_transaction_request_job(TransactionRequest::new(&record.id), None)
            .await
        {
            // The intent never entered the pipeline: record the failure but
            // leave the nonce unconsumed so the caller can resubmit it.
            warn!(
                "failed to enqueue request job for transaction {}: {}",
                record.id, e
            );
            let _ = self
                .transaction_repository
                .transition_status(
                    record.id.clone(),
                    vec![TransactionStatus::Pending],
                    TransactionUpdate::failed(FailureReason::Internal),
                )
                .await;
            return Err(e.into());
        }

        guard.advance();
        info!(
            "admitted intent from {} with nonce {} as transaction {}",
            record.user, record.user_nonce, record.id
        );
        Ok(record)
    }
}
