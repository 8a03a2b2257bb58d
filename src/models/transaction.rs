use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Address, Intent};
use crate::utils::now_rfc3339;

/// Lifecycle of a relayed transaction.
///
/// Transitions only move forward: `Pending -> Submitted -> {Confirmed,
/// Failed}` plus the short-circuit `Pending -> Failed` for expiry before
/// dispatch. `Confirmed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Submitted,
    Confirmed,
    Failed,
}

impl TransactionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Confirmed | TransactionStatus::Failed)
    }

    /// Legal forward transitions. Anything else is a construction-time error
    /// in the store, never a silent overwrite.
    pub fn can_transition_to(&self, next: &TransactionStatus) -> bool {
        matches!(
            (self, next),
            (TransactionStatus::Pending, TransactionStatus::Submitted)
                | (TransactionStatus::Pending, TransactionStatus::Failed)
                | (TransactionStatus::Submitted, TransactionStatus::Confirmed)
                | (TransactionStatus::Submitted, TransactionStatus::Failed)
        )
    }
}

/// Why a transaction ended up `Failed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureReason {
    Expired,
    SequenceConflict,
    TargetRejected,
    TargetReverted,
    WatchTimeout,
    Internal,
}

/// Durable record of a relayed transaction; the authoritative status lives
/// here and nowhere else. Records are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    /// User whose intent produced this transaction.
    pub user: Address,
    pub to: Address,
    #[serde(with = "crate::utils::hex_bytes")]
    pub calldata: Vec<u8>,
    pub value: U256,
    pub execute_after: u64,
    pub execute_before: u64,
    /// The user-level nonce consumed at admission.
    pub user_nonce: u64,
    pub status: TransactionStatus,
    pub status_reason: Option<FailureReason>,
    pub created_at: String,
    pub sent_at: Option<String>,
    pub confirmed_at: Option<String>,
    /// Submission identity servicing this transaction, set at preparation.
    pub from: Option<Address>,
    /// The identity's sequence slot reserved for this transaction.
    pub identity_sequence: Option<u64>,
    /// Latest dispatched transaction hash.
    pub hash: Option<String>,
    /// Every hash ever dispatched for this transaction, oldest first.
    pub hashes: Vec<String>,
    /// Signed raw payload; retries re-dispatch these exact bytes.
    #[serde(default)]
    pub raw: Option<Vec<u8>>,
    /// Dispatch attempts consumed from the retry budget.
    pub attempts: u32,
}

impl TransactionRecord {
    /// Creates the `pending` record for a freshly admitted intent.
    pub fn from_intent(intent: &Intent) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user: intent.user,
            to: intent.target,
            calldata: intent.calldata.clone(),
            value: intent.value,
            execute_after: intent.execute_after,
            execute_before: intent.execute_before,
            user_nonce: intent.nonce,
            status: TransactionStatus::Pending,
            status_reason: None,
            created_at: now_rfc3339(),
            sent_at: None,
            confirmed_at: None,
            from: None,
            identity_sequence: None,
            hash: None,
            hashes: Vec::new(),
            raw: None,
            attempts: 0,
        }
    }

    /// The hard deadline check. `execute_before` is exclusive.
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.execute_before
    }
}

/// Partial update applied by the store under its lock. `None` leaves the
/// field untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TransactionUpdate {
    pub status: Option<TransactionStatus>,
    pub status_reason: Option<FailureReason>,
    pub sent_at: Option<String>,
    pub confirmed_at: Option<String>,
    pub from: Option<Address>,
    pub identity_sequence: Option<u64>,
    /// Appended to the hash history and set as the latest hash.
    pub append_hash: Option<String>,
    pub raw: Option<Vec<u8>>,
    pub attempts: Option<u32>,
}

impl TransactionUpdate {
    pub fn status(status: TransactionStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn failed(reason: FailureReason) -> Self {
        Self {
            status: Some(TransactionStatus::Failed),
            status_reason: Some(reason),
            ..Default::default()
        }
    }

    pub fn with_sent_at(mut self, sent_at: String) -> Self {
        self.sent_at = Some(sent_at);
        self
    }

    pub fn with_confirmed_at(mut self, confirmed_at: String) -> Self {
        self.confirmed_at = Some(confirmed_at);
        self
    }

    pub fn with_hash(mut self, hash: String) -> Self {
        self.append_hash = Some(hash);
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    pub fn with_identity(mut self, from: Address, sequence: u64) -> Self {
        self.from = Some(from);
        self.identity_sequence = Some(sequence);
        self
    }

    pub fn with_raw(mut self, raw: Vec<u8>) -> Self {
        self.raw = Some(raw);
        self
    }
}

/// Fully priced outbound transaction, ready to sign and dispatch through a
/// submission identity.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundTransaction {
    pub to: Address,
    pub value: U256,
    pub calldata: Vec<u8>,
    /// The submission identity's sequence number (external-target nonce).
    pub sequence: u64,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub chain_id: u64,
}

impl OutboundTransaction {
    pub fn from_record(
        tx: &TransactionRecord,
        sequence: u64,
        gas_limit: u64,
        gas_price: u128,
        chain_id: u64,
    ) -> Self {
        Self {
            to: tx.to,
            value: tx.value,
            calldata: tx.calldata.clone(),
            sequence,
            gas_limit,
            gas_price,
            chain_id,
        }
    }
}

/// Read-only projection returned by the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub id: String,
    pub user: Address,
    pub to: Address,
    pub status: TransactionStatus,
    pub status_reason: Option<FailureReason>,
    pub user_nonce: u64,
    pub hash: Option<String>,
    pub attempts: u32,
    pub created_at: String,
    pub sent_at: Option<String>,
    pub confirmed_at: Option<String>,
}

impl From<TransactionRecord> for TransactionResponse {
    fn from(tx: TransactionRecord) -> Self {
        Self {
            id: tx.id,
            user: tx.user,
            to: tx.to,
            status: tx.status,
            status_reason: tx.status_reason,
            user_nonce: tx.user_nonce,
            hash: tx.hash,
            attempts: tx.attempts,
            created_at: tx.created_at,
            sent_at: tx.sent_at,
            confirmed_at: tx.confirmed_at,
        }
    }
}

/// Response body for a successfully admitted intent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitIntentResponse {
    pub transaction_id: String,
}
