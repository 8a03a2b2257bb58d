//! Per-user sequence state. Each user gets an individually lockable entry so
//! admission for unrelated users never contends on a shared lock; the outer
//! map lock is held only for the entry lookup, never across an await.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex},
};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::Address;

/// Sequence state for one user. Advances by exactly one per admitted intent;
/// never decreases.
#[derive(Debug, Default)]
pub struct UserSequence {
    pub next_nonce: u64,
}

#[derive(Debug, Default)]
pub struct InMemoryUserSequenceStore {
    entries: StdMutex<HashMap<Address, Arc<Mutex<UserSequence>>>>,
}

impl InMemoryUserSequenceStore {
    pub fn new() -> Self {
        Self {
            entries: StdMutex::new(HashMap::new()),
        }
    }

    fn entry(&self, user: &Address) -> Arc<Mutex<UserSequence>> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .entry(*user)
            .or_insert_with(|| Arc::new(Mutex::new(UserSequence::default())))
            .clone()
    }

    /// Takes the user's exclusive critical section. The returned guard owns
    /// the lock and may be held across awaits.
    pub async fn lock_user(&self, user: &Address) -> OwnedMutexGuard<UserSequence> {
        self.entry(user).lock_owned().await
    }

    /// Snapshot of the next expected nonce, for reporting only.
    pub async fn peek(&self, user: &Address) -> u64 {
        self.entry(user).lock().await.next_nonce
    }
}
