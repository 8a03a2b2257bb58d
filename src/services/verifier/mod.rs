//! Signature verifier. Pure functions over secp256k1 recovery: no I/O, no
//! shared state, safe to call concurrently.

use alloy::primitives::B256;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};

use crate::models::{Address, AuthError, Intent};

/// Recovers the signing address from a 65-byte `r || s || v` signature over
/// `digest`. Accepts recovery ids in both raw (0/1) and offset (27/28) form.
pub fn recover_signer(digest: &B256, signature: &[u8]) -> Result<Address, AuthError> {
    if signature.len() != 65 {
        return Err(AuthError::InvalidSignature(format!(
            "expected 65 bytes, got {}",
            signature.len()
        )));
    }

    let sig = Signature::try_from(&signature[..64])
        .map_err(|e| AuthError::InvalidSignature(format!("malformed r/s: {}", e)))?;

    let v = match signature[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        v => {
            return Err(AuthError::InvalidSignature(format!(
                "invalid recovery id: {}",
                v
            )))
        }
    };
    let recovery_id = RecoveryId::try_from(v)
        .map_err(|e| AuthError::InvalidSignature(format!("invalid recovery id: {}", e)))?;

    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &sig, recovery_id)
        .map_err(|e| AuthError::InvalidSignature(format!("recovery failed: {}", e)))?;

    Ok(address_of(&key))
}

/// Verifies that an intent's signature recovers to its declared user.
pub fn verify_intent(intent: &Intent) -> Result<Address, AuthError> {
    let recovered = recover_signer(&intent.signing_digest(), &intent.signature)?;
    if recovered != intent.user {
        return Err(AuthError::SignerMismatch {
            expected: intent.user.to_string(),
            recovered: recovered.to_string(),
        });
    }
    Ok(recovered)
}

/// Address of a secp256k1 public key: the low 20 bytes of the Keccak-256 hash
/// of the uncompressed point, tag byte excluded.
fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let mut hasher = Keccak256::new();
    hasher.update(&point.as_bytes()[1..]);
    let hash = hasher.finalize();
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address(address)
}
