//! Shared builders for domain unit tests.

use k256::ecdsa::SigningKey;
use sha3::{Digest, Keccak256};

use crate::{
    models::{Address, Intent, TransactionRecord, U256},
    utils::now_secs,
};

pub struct IntentSpec {
    pub nonce: u64,
    pub window: (u64, u64),
    pub value: U256,
}

impl IntentSpec {
    pub fn new(nonce: u64, window: (u64, u64)) -> Self {
        Self {
            nonce,
            window,
            value: U256::from(1_000u64),
        }
    }
}

/// A window that is currently open.
pub fn valid_window() -> (u64, u64) {
    let now = now_secs();
    (now.saturating_sub(60), now + 3_600)
}

pub fn address_of_key(key: &SigningKey) -> Address {
    let point = key.verifying_key().to_encoded_point(false);
    let mut hasher = Keccak256::new();
    hasher.update(&point.as_bytes()[1..]);
    let hash = hasher.finalize();
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address(address)
}

/// Builds an intent correctly signed by `key`.
pub fn signed_intent(key: &SigningKey, spec: IntentSpec) -> Intent {
    let mut intent = Intent {
        user: address_of_key(key),
        target: "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".parse().unwrap(),
        calldata: vec![0xa9, 0x05, 0x9c, 0xbb],
        value: spec.value,
        execute_after: spec.window.0,
        execute_before: spec.window.1,
        nonce: spec.nonce,
        signature: Vec::new(),
    };
    let digest = intent.signing_digest();
    let (sig, recovery_id) = key.sign_prehash_recoverable(digest.as_slice()).unwrap();
    let mut bytes = sig.to_bytes().to_vec();
    bytes.push(recovery_id.to_byte());
    intent.signature = bytes;
    intent
}

/// A pending record with the given validity window, as admission would
/// create it.
pub fn pending_record(window: (u64, u64)) -> TransactionRecord {
    let intent = Intent {
        user: Address([0xaa; 20]),
        target: "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".parse().unwrap(),
        calldata: vec![0x01],
        value: U256::from(5u64),
        execute_after: window.0,
        execute_before: window.1,
        nonce: 0,
        signature: vec![0u8; 65],
    };
    TransactionRecord::from_intent(&intent)
}
