use alloy::primitives::{keccak256, B256, U256};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AdmissionError, Address};

/// A signed transaction intent as submitted by an end user.
///
/// Read-only once received; consumed exactly once by admission (or rejected).
/// The signature covers [`Intent::signing_digest`] and must recover to `user`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct Intent {
    pub user: Address,
    pub target: Address,
    #[serde(with = "crate::utils::hex_bytes")]
    #[schema(value_type = String, example = "0xa9059cbb")]
    pub calldata: Vec<u8>,
    #[schema(value_type = String, example = "0x0")]
    pub value: U256,
    /// Earliest execution time, unix seconds (inclusive).
    pub execute_after: u64,
    /// Hard deadline, unix seconds (exclusive). Never submitted at or past it.
    pub execute_before: u64,
    /// Per-user sequence number; must exactly match the next expected value.
    pub nonce: u64,
    /// 65-byte secp256k1 signature (r || s || v) over the canonical digest.
    #[serde(with = "crate::utils::hex_bytes")]
    #[schema(value_type = String)]
    pub signature: Vec<u8>,
}

impl Intent {
    /// Canonical digest the user signs.
    ///
    /// Fixed-width field order: user || target || keccak256(calldata) ||
    /// value (32-byte BE) || execute_after (8-byte BE) || execute_before
    /// (8-byte BE) || nonce (8-byte BE). Any implementation that admits these
    /// intents must hash identically or cross-verification breaks.
    pub fn signing_digest(&self) -> B256 {
        let mut buf = Vec::with_capacity(128);
        buf.extend_from_slice(self.user.as_bytes());
        buf.extend_from_slice(self.target.as_bytes());
        buf.extend_from_slice(keccak256(&self.calldata).as_slice());
        buf.extend_from_slice(&self.value.to_be_bytes::<32>());
        buf.extend_from_slice(&self.execute_after.to_be_bytes());
        buf.extend_from_slice(&self.execute_before.to_be_bytes());
        buf.extend_from_slice(&self.nonce.to_be_bytes());
        keccak256(&buf)
    }

    /// Structural validity of the declared window.
    pub fn validate_window(&self) -> Result<(), AdmissionError> {
        if self.execute_after >= self.execute_before {
            return Err(AdmissionError::InvalidWindow {
                execute_after: self.execute_after,
                execute_before: self.execute_before,
            });
        }
        Ok(())
    }
}
