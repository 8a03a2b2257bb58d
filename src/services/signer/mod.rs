//! Transaction signing for submission identities.

use alloy::{
    consensus::{SignableTransaction, TxEnvelope, TxLegacy},
    eips::eip2718::Encodable2718,
    network::TxSigner,
    primitives::{Bytes, FixedBytes, TxKind},
    signers::{k256::ecdsa::SigningKey, local::LocalSigner as AlloyLocalSignerClient},
};
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::models::{Address, OutboundTransaction, SignerError};

/// A signed, wire-ready transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    /// Transaction hash the target will index the submission by.
    pub hash: String,
    /// Raw encoded bytes for `send_raw_transaction`.
    pub raw: Vec<u8>,
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait SubmissionSigner: Send + Sync {
    fn address(&self) -> Address;

    async fn sign_transaction(
        &self,
        tx: OutboundTransaction,
    ) -> Result<SignedTransaction, SignerError>;
}

/// Signs with an in-memory secp256k1 key.
pub struct LocalIdentitySigner {
    client: AlloyLocalSignerClient<SigningKey>,
}

impl LocalIdentitySigner {
    pub fn from_raw_key(raw_key: &[u8]) -> Result<Self, SignerError> {
        if raw_key.len() != 32 {
            return Err(SignerError::KeyError(format!(
                "expected 32-byte key, got {}",
                raw_key.len()
            )));
        }
        let key_bytes = FixedBytes::<32>::from_slice(raw_key);
        let client = AlloyLocalSignerClient::from_bytes(&key_bytes)
            .map_err(|e| SignerError::KeyError(format!("failed to load key: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SubmissionSigner for LocalIdentitySigner {
    fn address(&self) -> Address {
        self.client.address().into()
    }

    async fn sign_transaction(
        &self,
        tx: OutboundTransaction,
    ) -> Result<SignedTransaction, SignerError> {
        let mut unsigned = TxLegacy {
            chain_id: Some(tx.chain_id),
            nonce: tx.sequence,
            gas_price: tx.gas_price,
            gas_limit: tx.gas_limit,
            to: TxKind::Call(tx.to.into()),
            value: tx.value,
            input: Bytes::from(tx.calldata),
        };

        let signature = self
            .client
            .sign_transaction(&mut unsigned)
            .await
            .map_err(|e| SignerError::SigningError(format!("failed to sign transaction: {e}")))?;

        let signed = unsigned.into_signed(signature);
        let hash = signed.hash().to_string();
        let envelope = TxEnvelope::Legacy(signed);

        Ok(SignedTransaction {
            hash,
            raw: envelope.encoded_2718(),
        })
    }
}
