//! Transaction store. A `Mutex`-protected `HashMap` gives every status
//! transition compare-and-set semantics: the expected-from check, the
//! legality check and the write happen under one lock acquisition, so a late
//! confirmation and a timeout-driven retry can never both act on the same
//! record.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};

#[cfg(test)]
use mockall::automock;

use crate::models::{
    RepositoryError, TransactionRecord, TransactionStatus, TransactionUpdate,
};

#[async_trait]
#[cfg_attr(test, automock)]
pub trait TransactionRepository: Send + Sync {
    async fn create(&self, tx: TransactionRecord) -> Result<TransactionRecord, RepositoryError>;

    async fn get_by_id(&self, id: String) -> Result<TransactionRecord, RepositoryError>;

    async fn list_all(&self) -> Result<Vec<TransactionRecord>, RepositoryError>;

    async fn count(&self) -> Result<usize, RepositoryError>;

    /// Merges non-status fields into the record. Status changes must go
    /// through [`TransactionRepository::transition_status`].
    async fn update(
        &self,
        id: String,
        update: TransactionUpdate,
    ) -> Result<TransactionRecord, RepositoryError>;

    /// Compare-and-set status transition: fails with `StatusConflict` when
    /// the current status is not in `expected_from`, and with
    /// `InvalidTransition` when the move is not a legal forward step.
    async fn transition_status(
        &self,
        id: String,
        expected_from: Vec<TransactionStatus>,
        update: TransactionUpdate,
    ) -> Result<TransactionRecord, RepositoryError>;
}

#[derive(Debug, Default)]
pub struct InMemoryTransactionRepository {
    store: Mutex<HashMap<String, TransactionRecord>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(HashMap::new()),
        }
    }

    async fn acquire_lock(&self) -> MutexGuard<'_, HashMap<String, TransactionRecord>> {
        self.store.lock().await
    }

    fn apply(tx: &mut TransactionRecord, update: TransactionUpdate) {
        if let Some(status) = update.status {
            tx.status = status;
        }
        if let Some(reason) = update.status_reason {
            tx.status_reason = Some(reason);
        }
        if let Some(sent_at) = update.sent_at {
            tx.sent_at = Some(sent_at);
        }
        if let Some(confirmed_at) = update.confirmed_at {
            tx.confirmed_at = Some(confirmed_at);
        }
        if let Some(from) = update.from {
            tx.from = Some(from);
        }
        if let Some(sequence) = update.identity_sequence {
            tx.identity_sequence = Some(sequence);
        }
        if let Some(hash) = update.append_hash {
            tx.hashes.push(hash.clone());
            tx.hash = Some(hash);
        }
        if let Some(raw) = update.raw {
            tx.raw = Some(raw);
        }
        if let Some(attempts) = update.attempts {
            tx.attempts = attempts;
        }
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn create(&self, tx: TransactionRecord) -> Result<TransactionRecord, RepositoryError> {
        let mut store = self.acquire_lock().await;
        if store.contains_key(&tx.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "Transaction with ID {} already exists",
                tx.id
            )));
        }
        store.insert(tx.id.clone(), tx.clone());
        Ok(tx)
    }

    async fn get_by_id(&self, id: String) -> Result<TransactionRecord, RepositoryError> {
        let store = self.acquire_lock().await;
        store.get(&id).cloned().ok_or_else(|| {
            RepositoryError::NotFound(format!("Transaction with ID {} not found", id))
        })
    }

    async fn list_all(&self) -> Result<Vec<TransactionRecord>, RepositoryError> {
        let store = self.acquire_lock().await;
        Ok(store.values().cloned().collect())
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        let store = self.acquire_lock().await;
        Ok(store.len())
    }

    async fn update(
        &self,
        id: String,
        update: TransactionUpdate,
    ) -> Result<TransactionRecord, RepositoryError> {
        if update.status.is_some() {
            return Err(RepositoryError::InvalidTransition(
                "status changes must use transition_status".to_string(),
            ));
        }
        let mut store = self.acquire_lock().await;
        let tx = store.get_mut(&id).ok_or_else(|| {
            RepositoryError::NotFound(format!("Transaction with ID {} not found", id))
        })?;
        Self::apply(tx, update);
        Ok(tx.clone())
    }

    async fn transition_status(
        &self,
        id: String,
        expected_from: Vec<TransactionStatus>,
        update: TransactionUpdate,
    ) -> Result<TransactionRecord, RepositoryError> {
        let next = update.status.ok_or_else(|| {
            RepositoryError::InvalidTransition("transition_status requires a status".to_string())
        })?;
        let mut store = self.acquire_lock().await;
        let tx = store.get_mut(&id).ok_or_else(|| {
            RepositoryError::NotFound(format!("Transaction with ID {} not found", id))
        })?;
        if !expected_from.contains(&tx.status) {
            return Err(RepositoryError::StatusConflict(format!(
                "Transaction {} is {}, expected one of {:?}",
                id, tx.status, expected_from
            )));
        }
        if !tx.status.can_transition_to(&next) {
            return Err(RepositoryError::InvalidTransition(format!(
                "Transaction {} cannot move {} -> {}",
                id, tx.status, next
            )));
        }
        Self::apply(tx, update);
        Ok(tx.clone())
    }
}
