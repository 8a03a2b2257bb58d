//! Nonce sequencer: the sole arbiter of per-user ordering. Admission takes a
//! user's exclusive guard, checks the provided nonce for an exact match and
//! advances only once the rest of admission has succeeded, which makes the
//! nonce check and the sequence advancement one indivisible operation.

use std::sync::Arc;

use tokio::sync::OwnedMutexGuard;

use crate::{
    models::{AdmissionError, Address},
    repositories::{InMemoryUserSequenceStore, UserSequence},
};

/// Exclusive hold on one user's sequence state.
pub struct UserSequenceGuard {
    guard: OwnedMutexGuard<UserSequence>,
}

impl UserSequenceGuard {
    pub fn next_expected(&self) -> u64 {
        self.guard.next_nonce
    }

    /// Exact-match check. A replayed nonce and a future nonce are both
    /// rejected; nothing is buffered or reordered.
    pub fn check(&self, provided: u64) -> Result<(), AdmissionError> {
        if provided != self.guard.next_nonce {
            return Err(AdmissionError::NonceMismatch {
                expected: self.guard.next_nonce,
                provided,
            });
        }
        Ok(())
    }

    /// Consumes the current nonce. Advances by exactly one; never skips.
    pub fn advance(&mut self) {
        self.guard.next_nonce += 1;
    }
}

#[derive(Clone)]
pub struct NonceSequencer {
    store: Arc<InMemoryUserSequenceStore>,
}

impl NonceSequencer {
    pub fn new(store: Arc<InMemoryUserSequenceStore>) -> Self {
        Self { store }
    }

    /// Enters the user's critical section. Unrelated users are unaffected.
    pub async fn lock_user(&self, user: &Address) -> UserSequenceGuard {
        UserSequenceGuard {
            guard: self.store.lock_user(user).await,
        }
    }

    /// One-shot check-and-advance for callers that need no other work inside
    /// the critical section.
    pub async fn check_and_advance(
        &self,
        user: &Address,
        provided: u64,
    ) -> Result<u64, AdmissionError> {
        let mut guard = self.lock_user(user).await;
        guard.check(provided)?;
        guard.advance();
        Ok(provided)
    }

    /// Next nonce the sequencer will accept for `user`.
    pub async fn next_expected(&self, user: &Address) -> u64 {
        self.store.peek(user).await
    }
}
