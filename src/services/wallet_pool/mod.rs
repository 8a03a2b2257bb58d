//! Submission wallet pool: an arena of signing identities checked out and in
//! through an acquire/release contract.
//!
//! Two levels of ownership apply to an identity:
//! - a *reservation* binds it to one transaction for that transaction's whole
//!   lifetime, keeping its sequence slot stable across retries;
//! - the *busy* flag covers a single submission attempt inside that
//!   reservation.
//!
//! `acquire` is round-robin over unreserved, in-sync identities so no single
//! identity starves. An identity whose on-target sequence is in doubt is
//! flagged for resynchronization and skipped until `set_sequence` restores
//! ground truth.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    models::{Address, SubmissionError},
    services::SubmissionSigner,
};

/// An identity plus the sequence slot reserved for one transaction.
#[derive(Clone)]
pub struct IdentityLease {
    pub address: Address,
    pub sequence: u64,
    pub signer: Arc<dyn SubmissionSigner>,
}

/// How a reservation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseOutcome {
    /// The target consumed the sequence slot (confirmed, or reverted on
    /// chain). The identity moves to the next slot.
    Consumed,
    /// The slot was never dispatched; the identity reuses it as-is.
    Unused,
    /// Dispatches happened but the slot's fate is unknown (watch timeout,
    /// conflict). The identity must resync before reuse.
    Unknown,
}

struct IdentityEntry {
    address: Address,
    signer: Arc<dyn SubmissionSigner>,
    next_sequence: u64,
    busy: bool,
    needs_resync: bool,
    reserved_by: Option<String>,
}

struct PoolInner {
    entries: Vec<IdentityEntry>,
    cursor: usize,
}

pub struct SubmissionWalletPool {
    inner: Mutex<PoolInner>,
}

impl SubmissionWalletPool {
    pub fn new(identities: Vec<(Address, Arc<dyn SubmissionSigner>)>) -> Self {
        let entries = identities
            .into_iter()
            .map(|(address, signer)| IdentityEntry {
                address,
                signer,
                next_sequence: 0,
                busy: false,
                needs_resync: true,
                reserved_by: None,
            })
            .collect();
        Self {
            inner: Mutex::new(PoolInner { entries, cursor: 0 }),
        }
    }

    /// Reserves a free identity for `tx_id` and returns its lease. Fair:
    /// scanning starts one past the previously chosen entry.
    pub async fn acquire(&self, tx_id: &str) -> Result<IdentityLease, SubmissionError> {
        let mut inner = self.inner.lock().await;
        let len = inner.entries.len();
        for offset in 0..len {
            let index = (inner.cursor + offset) % len;
            let entry = &inner.entries[index];
            if entry.reserved_by.is_none() && !entry.busy && !entry.needs_resync {
                let entry = &mut inner.entries[index];
                entry.reserved_by = Some(tx_id.to_string());
                entry.busy = true;
                let lease = IdentityLease {
                    address: entry.address,
                    sequence: entry.next_sequence,
                    signer: entry.signer.clone(),
                };
                inner.cursor = (index + 1) % len;
                return Ok(lease);
            }
        }
        Err(SubmissionError::NoIdentityAvailable)
    }

    /// Re-enters the existing reservation for a retry of the same
    /// transaction: same identity, same sequence slot.
    pub async fn lease_for(&self, tx_id: &str) -> Option<IdentityLease> {
        let mut inner = self.inner.lock().await;
        let entry = inner
            .entries
            .iter_mut()
            .find(|e| e.reserved_by.as_deref() == Some(tx_id))?;
        entry.busy = true;
        Some(IdentityLease {
            address: entry.address,
            sequence: entry.next_sequence,
            signer: entry.signer.clone(),
        })
    }

    /// Ends one submission attempt without ending the reservation.
    pub async fn end_attempt(&self, tx_id: &str) {
        let mut inner = self.inner.lock().await;
        if let Some(entry) = inner
            .entries
            .iter_mut()
            .find(|e| e.reserved_by.as_deref() == Some(tx_id))
        {
            entry.busy = false;
        }
    }

    /// Ends the reservation once the transaction is terminal and settles the
    /// sequence slot according to `outcome`.
    pub async fn finalize(&self, tx_id: &str, outcome: LeaseOutcome) {
        let mut inner = self.inner.lock().await;
        if let Some(entry) = inner
            .entries
            .iter_mut()
            .find(|e| e.reserved_by.as_deref() == Some(tx_id))
        {
            match outcome {
                LeaseOutcome::Consumed => entry.next_sequence += 1,
                LeaseOutcome::Unused => {}
                LeaseOutcome::Unknown => entry.needs_resync = true,
            }
            entry.reserved_by = None;
            entry.busy = false;
        }
    }

    /// Writes the authoritative sequence read from the external target and
    /// clears the resync flag. Required after conflicts and on startup.
    pub async fn set_sequence(&self, address: &Address, sequence: u64) {
        let mut inner = self.inner.lock().await;
        if let Some(entry) = inner.entries.iter_mut().find(|e| e.address == *address) {
            entry.next_sequence = sequence;
            entry.needs_resync = false;
        }
    }

    pub async fn mark_for_resync(&self, address: &Address) {
        let mut inner = self.inner.lock().await;
        if let Some(entry) = inner.entries.iter_mut().find(|e| e.address == *address) {
            entry.needs_resync = true;
        }
    }

    /// Addresses currently flagged for resynchronization.
    pub async fn pending_resync(&self) -> Vec<Address> {
        let inner = self.inner.lock().await;
        inner
            .entries
            .iter()
            .filter(|e| e.needs_resync)
            .map(|e| e.address)
            .collect()
    }

    pub async fn addresses(&self) -> Vec<Address> {
        let inner = self.inner.lock().await;
        inner.entries.iter().map(|e| e.address).collect()
    }

    /// Identities free to acquire right now.
    pub async fn available(&self) -> usize {
        let inner = self.inner.lock().await;
        inner
            .entries
            .iter()
            .filter(|e| e.reserved_by.is_none() && !e.busy && !e.needs_resync)
            .count()
    }
}
