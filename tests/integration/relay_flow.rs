//! Drives admitted intents through the full pipeline — admission,
//! preparation, submission, confirmation watching — with scripted target
//! behavior.

use std::sync::Arc;

use chrono::{Duration, Utc};
use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use sha3::{Digest, Keccak256};

use intent_relayer::{
    constants::MAX_SUBMISSION_ATTEMPTS,
    domain::{AdmissionController, ExecutionEngine},
    models::{
        Address, AdmissionError, FailureReason, Intent, ProviderError, TransactionRecord,
        TransactionStatus, TransactionUpdate, U256,
    },
    repositories::{
        InMemoryTransactionRepository, InMemoryUserSequenceStore, TransactionRepository,
    },
    services::{
        LocalIdentitySigner, NonceSequencer, ReceiptState, SubmissionSigner, SubmissionWalletPool,
    },
};

use crate::stubs::{RecordingJobProducer, StubExecutionTarget};

const CHAIN_ID: u64 = 31337;

fn address_of_key(key: &SigningKey) -> Address {
    let point = key.verifying_key().to_encoded_point(false);
    let mut hasher = Keccak256::new();
    hasher.update(&point.as_bytes()[1..]);
    let hash = hasher.finalize();
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address(address)
}

fn signed_intent(key: &SigningKey, nonce: u64, window: (u64, u64)) -> Intent {
    let mut intent = Intent {
        user: address_of_key(key),
        target: "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".parse().unwrap(),
        calldata: vec![0xa9, 0x05, 0x9c, 0xbb],
        value: U256::from(1_000u64),
        execute_after: window.0,
        execute_before: window.1,
        nonce,
        signature: Vec::new(),
    };
    let digest = intent.signing_digest();
    let (sig, recovery_id) = key.sign_prehash_recoverable(digest.as_slice()).unwrap();
    let mut bytes = sig.to_bytes().to_vec();
    bytes.push(recovery_id.to_byte());
    intent.signature = bytes;
    intent
}

fn open_window() -> (u64, u64) {
    let now = Utc::now().timestamp() as u64;
    (now - 60, now + 3_600)
}

struct Pipeline {
    admission: AdmissionController<InMemoryTransactionRepository, RecordingJobProducer>,
    engine: ExecutionEngine<
        StubExecutionTarget,
        InMemoryTransactionRepository,
        RecordingJobProducer,
    >,
    repository: Arc<InMemoryTransactionRepository>,
    pool: Arc<SubmissionWalletPool>,
    sequencer: NonceSequencer,
    target: Arc<StubExecutionTarget>,
    producer: Arc<RecordingJobProducer>,
    identity: Address,
}

async fn pipeline() -> Pipeline {
    let repository = Arc::new(InMemoryTransactionRepository::new());
    let sequencer = NonceSequencer::new(Arc::new(InMemoryUserSequenceStore::new()));
    let producer = RecordingJobProducer::new();
    let target = StubExecutionTarget::new();

    let signer = LocalIdentitySigner::from_raw_key(&[0x11; 32]).unwrap();
    let identity = signer.address();
    let pool = Arc::new(SubmissionWalletPool::new(vec![(
        identity,
        Arc::new(signer) as Arc<dyn SubmissionSigner>,
    )]));
    pool.set_sequence(&identity, 0).await;

    Pipeline {
        admission: AdmissionController::new(
            sequencer.clone(),
            repository.clone(),
            producer.clone(),
        ),
        engine: ExecutionEngine::new(
            target.clone(),
            repository.clone(),
            producer.clone(),
            pool.clone(),
            CHAIN_ID,
        ),
        repository,
        pool,
        sequencer,
        target,
        producer,
        identity,
    }
}

#[tokio::test]
async fn test_intent_relays_to_confirmation() {
    let p = pipeline().await;
    let key = SigningKey::random(&mut OsRng);

    let admitted = p
        .admission
        .admit(signed_intent(&key, 0, open_window()))
        .await
        .unwrap();
    assert_eq!(admitted.status, TransactionStatus::Pending);
    assert_eq!(p.producer.jobs.lock().unwrap().requests.len(), 1);

    let prepared = p.engine.prepare_transaction(admitted).await.unwrap();
    assert_eq!(prepared.from, Some(p.identity));
    assert_eq!(prepared.identity_sequence, Some(0));
    assert_eq!(p.producer.submission_count(), 1);

    let submitted = p.engine.submit_transaction(prepared).await.unwrap();
    assert_eq!(submitted.status, TransactionStatus::Submitted);
    assert_eq!(p.target.dispatch_count(), 1);
    assert_eq!(p.producer.status_check_count(), 1);

    p.target.script_receipt(
        submitted.hash.as_deref().unwrap(),
        ReceiptState::Confirmed { success: true },
    );
    let confirmed = p.engine.check_transaction_status(submitted).await.unwrap();
    assert_eq!(confirmed.status, TransactionStatus::Confirmed);
    assert!(confirmed.confirmed_at.is_some());

    // The identity's slot was consumed and the user's sequence advanced.
    let lease = p.pool.acquire("next").await.unwrap();
    assert_eq!(lease.sequence, 1);
    assert_eq!(p.sequencer.next_expected(&address_of_key(&key)).await, 1);
}

#[tokio::test]
async fn test_admitted_nonce_cannot_be_replayed() {
    let p = pipeline().await;
    let key = SigningKey::random(&mut OsRng);

    p.admission
        .admit(signed_intent(&key, 0, open_window()))
        .await
        .unwrap();

    let replay = p.admission.admit(signed_intent(&key, 0, open_window())).await;
    assert!(matches!(
        replay,
        Err(AdmissionError::NonceMismatch {
            expected: 1,
            provided: 0
        })
    ));
    // Exactly one transaction exists for that user.
    assert_eq!(p.repository.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_users_do_not_block_each_other() {
    let p = pipeline().await;
    let key_a = SigningKey::random(&mut OsRng);
    let key_b = SigningKey::random(&mut OsRng);

    let (a, b) = tokio::join!(
        p.admission.admit(signed_intent(&key_a, 0, open_window())),
        p.admission.admit(signed_intent(&key_b, 0, open_window())),
    );
    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(p.repository.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_expired_before_preparation_never_submits() {
    let p = pipeline().await;

    // An admitted record whose deadline has since passed.
    let now = Utc::now().timestamp() as u64;
    let intent = Intent {
        user: Address([0xaa; 20]),
        target: "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".parse().unwrap(),
        calldata: vec![],
        value: U256::ZERO,
        execute_after: now - 200,
        execute_before: now - 100,
        nonce: 0,
        signature: vec![0u8; 65],
    };
    let record = p
        .repository
        .create(TransactionRecord::from_intent(&intent))
        .await
        .unwrap();

    let failed = p.engine.prepare_transaction(record).await.unwrap();
    assert_eq!(failed.status, TransactionStatus::Failed);
    assert_eq!(failed.status_reason, Some(FailureReason::Expired));
    assert_eq!(p.target.dispatch_count(), 0);
    // The identity never left rotation and kept its slot.
    let lease = p.pool.acquire("next").await.unwrap();
    assert_eq!(lease.sequence, 0);
}

#[tokio::test]
async fn test_unconfirmed_dispatch_exhausts_budget_and_fails() {
    let p = pipeline().await;
    let key = SigningKey::random(&mut OsRng);

    let admitted = p
        .admission
        .admit(signed_intent(&key, 0, open_window()))
        .await
        .unwrap();
    let prepared = p.engine.prepare_transaction(admitted).await.unwrap();
    let mut current = p.engine.submit_transaction(prepared).await.unwrap();

    // The target accepts every dispatch but never confirms. Each watch
    // timeout triggers a resubmission until the budget is spent.
    for round in 1..MAX_SUBMISSION_ATTEMPTS {
        assert_eq!(current.attempts, round);
        current = p
            .repository
            .update(
                current.id.clone(),
                TransactionUpdate::default()
                    .with_sent_at((Utc::now() - Duration::seconds(600)).to_rfc3339()),
            )
            .await
            .unwrap();
        current = p.engine.check_transaction_status(current).await.unwrap();
        assert_eq!(current.status, TransactionStatus::Submitted);
        current = p.engine.submit_transaction(current).await.unwrap();
    }

    assert_eq!(current.attempts, MAX_SUBMISSION_ATTEMPTS);
    current = p
        .repository
        .update(
            current.id.clone(),
            TransactionUpdate::default()
                .with_sent_at((Utc::now() - Duration::seconds(600)).to_rfc3339()),
        )
        .await
        .unwrap();
    let failed = p.engine.check_transaction_status(current).await.unwrap();

    assert_eq!(failed.status, TransactionStatus::Failed);
    assert_eq!(failed.status_reason, Some(FailureReason::WatchTimeout));
    assert_eq!(p.target.dispatch_count(), MAX_SUBMISSION_ATTEMPTS as u64);
    // The slot's fate is unknown; the identity waits for resync.
    assert_eq!(p.pool.pending_resync().await, vec![p.identity]);
}

#[tokio::test]
async fn test_sequence_conflict_fails_and_resyncs_from_target() {
    let p = pipeline().await;
    let key = SigningKey::random(&mut OsRng);

    p.target
        .script_dispatch_failure(ProviderError::SequenceConflict("nonce too low".into()));
    p.target.set_account_sequence(p.identity, 7);

    let admitted = p
        .admission
        .admit(signed_intent(&key, 0, open_window()))
        .await
        .unwrap();
    let prepared = p.engine.prepare_transaction(admitted).await.unwrap();
    let failed = p.engine.submit_transaction(prepared).await.unwrap();

    assert_eq!(failed.status, TransactionStatus::Failed);
    assert_eq!(failed.status_reason, Some(FailureReason::SequenceConflict));

    // Ground truth was re-read from the target before reuse.
    assert!(p.pool.pending_resync().await.is_empty());
    let lease = p.pool.acquire("next").await.unwrap();
    assert_eq!(lease.sequence, 7);
}

#[tokio::test]
async fn test_terminal_failure_requires_fresh_intent_to_retry() {
    let p = pipeline().await;
    let key = SigningKey::random(&mut OsRng);

    p.target
        .script_dispatch_failure(ProviderError::SequenceConflict("nonce too low".into()));

    let admitted = p
        .admission
        .admit(signed_intent(&key, 0, open_window()))
        .await
        .unwrap();
    let prepared = p.engine.prepare_transaction(admitted).await.unwrap();
    let failed = p.engine.submit_transaction(prepared).await.unwrap();
    assert_eq!(failed.status, TransactionStatus::Failed);

    // The terminal record is inert.
    let unchanged = p.engine.submit_transaction(failed.clone()).await.unwrap();
    assert_eq!(unchanged.status, TransactionStatus::Failed);

    // The application-level retry is a fresh intent with the next nonce.
    p.pool.set_sequence(&p.identity, 1).await;
    let fresh = p
        .admission
        .admit(signed_intent(&key, 1, open_window()))
        .await
        .unwrap();
    assert_eq!(fresh.user_nonce, 1);
    assert_ne!(fresh.id, failed.id);
}
