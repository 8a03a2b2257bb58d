//! Producer side of the job pipeline. The engine schedules its own
//! submission retries by enqueueing with an `scheduled_on` unix timestamp.

use apalis::prelude::Storage;
use apalis_redis::RedisError;
use async_trait::async_trait;
use log::info;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

use super::{Job, JobType, Queue, TransactionRequest, TransactionSend, TransactionStatusCheck};

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Error, Serialize)]
pub enum JobProducerError {
    #[error("Queue error: {0}")]
    QueueError(String),
}

impl From<RedisError> for JobProducerError {
    fn from(error: RedisError) -> Self {
        JobProducerError::QueueError(error.to_string())
    }
}

impl From<JobProducerError> for crate::models::AdmissionError {
    fn from(error: JobProducerError) -> Self {
        crate::models::AdmissionError::Internal(error.to_string())
    }
}

impl From<JobProducerError> for crate::models::SubmissionError {
    fn from(error: JobProducerError) -> Self {
        crate::models::SubmissionError::Internal(error.to_string())
    }
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait JobProducerTrait: Send + Sync {
    async fn produce_transaction_request_job(
        &self,
        transaction_request_job: TransactionRequest,
        scheduled_on: Option<i64>,
    ) -> Result<(), JobProducerError>;

    async fn produce_submit_transaction_job(
        &self,
        transaction_submit_job: TransactionSend,
        scheduled_on: Option<i64>,
    ) -> Result<(), JobProducerError>;

    async fn produce_check_transaction_status_job(
        &self,
        transaction_status_check_job: TransactionStatusCheck,
        scheduled_on: Option<i64>,
    ) -> Result<(), JobProducerError>;
}

#[derive(Debug)]
pub struct JobProducer {
    queue: Mutex<Queue>,
}

impl JobProducer {
    pub fn new(queue: Queue) -> Self {
        Self {
            queue: Mutex::new(queue),
        }
    }

    pub async fn get_queue(&self) -> Queue {
        self.queue.lock().await.clone()
    }
}

#[async_trait]
impl JobProducerTrait for JobProducer {
    async fn produce_transaction_request_job(
        &self,
        transaction_request_job: TransactionRequest,
        scheduled_on: Option<i64>,
    ) -> Result<(), JobProducerError> {
        info!(
            "Producing transaction request job: {:?}",
            transaction_request_job
        );
        let mut queue = self.queue.lock().await;
        let job = Job::new(JobType::TransactionRequest, transaction_request_job);

        match scheduled_on {
            Some(on) => {
                queue.transaction_request_queue.schedule(job, on).await?;
            }
            None => {
                queue.transaction_request_queue.push(job).await?;
            }
        }
        Ok(())
    }

    async fn produce_submit_transaction_job(
        &self,
        transaction_submit_job: TransactionSend,
        scheduled_on: Option<i64>,
    ) -> Result<(), JobProducerError> {
        info!(
            "Producing transaction submit job: {:?}",
            transaction_submit_job
        );
        let mut queue = self.queue.lock().await;
        let job = Job::new(JobType::TransactionSend, transaction_submit_job);

        match scheduled_on {
            Some(on) => {
                queue.transaction_submission_queue.schedule(job, on).await?;
            }
            None => {
                queue.transaction_submission_queue.push(job).await?;
            }
        }
        Ok(())
    }

    async fn produce_check_transaction_status_job(
        &self,
        transaction_status_check_job: TransactionStatusCheck,
        scheduled_on: Option<i64>,
    ) -> Result<(), JobProducerError> {
        info!(
            "Producing transaction status check job: {:?}",
            transaction_status_check_job
        );
        let mut queue = self.queue.lock().await;
        let job = Job::new(
            JobType::TransactionStatusCheck,
            transaction_status_check_job,
        );
        match scheduled_on {
            Some(on) => {
                queue.transaction_status_queue.schedule(job, on).await?;
            }
            None => {
                queue.transaction_status_queue.push(job).await?;
            }
        }
        Ok(())
    }
}
