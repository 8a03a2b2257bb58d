//! Job envelopes for the relayer's asynchronous pipeline: preparation,
//! submission and confirmation watching.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Job<T> {
    pub message_id: String,
    pub version: String,
    pub timestamp: String,
    pub job_type: JobType,
    pub data: T,
}

impl<T> Job<T> {
    pub fn new(job_type: JobType, data: T) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            version: "1.0".to_string(),
            timestamp: Utc::now().timestamp().to_string(),
            job_type,
            data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Display, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobType {
    TransactionRequest,
    TransactionSend,
    TransactionStatusCheck,
}

/// Prepare a freshly admitted transaction: expiry gate, identity
/// acquisition, signing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransactionRequest {
    pub transaction_id: String,
}

impl TransactionRequest {
    pub fn new(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum TransactionCommand {
    /// First dispatch of the signed payload.
    Submit,
    /// Re-dispatch of the same payload after a recoverable failure.
    Resubmit,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransactionSend {
    pub transaction_id: String,
    pub command: TransactionCommand,
}

impl TransactionSend {
    pub fn submit(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            command: TransactionCommand::Submit,
        }
    }

    pub fn resubmit(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            command: TransactionCommand::Resubmit,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransactionStatusCheck {
    pub transaction_id: String,
}

impl TransactionStatusCheck {
    pub fn new(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
        }
    }
}
