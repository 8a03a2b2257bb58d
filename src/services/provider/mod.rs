//! Client for the external execution target. Latency and availability are
//! not guaranteed; every call is fallible and errors are classified into
//! retryable and permanent families for the engine.

use alloy::{
    primitives::{Bytes, TxKind, B256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::{TransactionInput, TransactionRequest},
    transports::http::{Client, Http},
};
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::models::{Address, ProviderError, U256};

/// What the target knows about a dispatched transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptState {
    /// Included on the target; `success` is the execution outcome.
    Confirmed { success: bool },
    /// Known to the target but not yet included.
    Pending,
    /// The target has never seen it (dropped or still propagating).
    NotFound,
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait ExecutionTargetTrait: Send + Sync {
    async fn send_raw_transaction(&self, raw: Vec<u8>) -> Result<String, ProviderError>;

    async fn get_receipt(&self, hash: String) -> Result<ReceiptState, ProviderError>;

    /// The next sequence number the target expects for `address`; the
    /// pool's ground truth for resynchronization.
    async fn get_transaction_count(&self, address: Address) -> Result<u64, ProviderError>;

    async fn estimate_gas(
        &self,
        from: Address,
        to: Address,
        value: U256,
        calldata: Vec<u8>,
    ) -> Result<u64, ProviderError>;

    async fn get_gas_price(&self) -> Result<u128, ProviderError>;

    async fn health_check(&self) -> Result<bool, ProviderError>;
}

pub struct EvmProvider {
    provider: RootProvider<Http<Client>>,
}

impl EvmProvider {
    pub fn new(url: &str) -> Result<Self, ProviderError> {
        let rpc_url = url
            .parse()
            .map_err(|e| ProviderError::InvalidResponse(format!("invalid provider url: {}", e)))?;
        let provider = ProviderBuilder::new().on_http(rpc_url);
        Ok(Self { provider })
    }
}

#[async_trait]
impl ExecutionTargetTrait for EvmProvider {
    async fn send_raw_transaction(&self, raw: Vec<u8>) -> Result<String, ProviderError> {
        let pending = self
            .provider
            .send_raw_transaction(&raw)
            .await
            .map_err(|e| classify_send_error(&e.to_string()))?;
        Ok(pending.tx_hash().to_string())
    }

    async fn get_receipt(&self, hash: String) -> Result<ReceiptState, ProviderError> {
        let hash: B256 = hash
            .parse()
            .map_err(|e| ProviderError::InvalidResponse(format!("invalid tx hash: {}", e)))?;

        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| ProviderError::Transient(format!("failed to get receipt: {}", e)))?;
        if let Some(receipt) = receipt {
            return Ok(ReceiptState::Confirmed {
                success: receipt.status(),
            });
        }

        let known = self
            .provider
            .get_transaction_by_hash(hash)
            .await
            .map_err(|e| ProviderError::Transient(format!("failed to look up tx: {}", e)))?;
        Ok(match known {
            Some(_) => ReceiptState::Pending,
            None => ReceiptState::NotFound,
        })
    }

    async fn get_transaction_count(&self, address: Address) -> Result<u64, ProviderError> {
        self.provider
            .get_transaction_count(address.into())
            .await
            .map_err(|e| ProviderError::Transient(format!("failed to get sequence: {}", e)))
    }

    async fn estimate_gas(
        &self,
        from: Address,
        to: Address,
        value: U256,
        calldata: Vec<u8>,
    ) -> Result<u64, ProviderError> {
        let request = TransactionRequest {
            from: Some(from.into()),
            to: Some(TxKind::Call(to.into())),
            value: Some(value),
            input: TransactionInput::from(Bytes::from(calldata)),
            ..Default::default()
        };
        let gas = self
            .provider
            .estimate_gas(&request)
            .await
            .map_err(|e| classify_send_error(&e.to_string()))?;
        Ok(gas.try_into().unwrap_or(u64::MAX))
    }

    async fn get_gas_price(&self) -> Result<u128, ProviderError> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| ProviderError::Transient(format!("failed to get gas price: {}", e)))
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        self.provider
            .get_block_number()
            .await
            .map(|_| true)
            .map_err(|e| ProviderError::Transient(format!("health check failed: {}", e)))
    }
}

/// Sorts a dispatch error into the retry taxonomy. Sequence conflicts get
/// their own family because they require identity resynchronization, not a
/// plain retry.
pub fn classify_send_error(message: &str) -> ProviderError {
    let lower = message.to_lowercase();
    if lower.contains("nonce too low")
        || lower.contains("nonce too high")
        || lower.contains("invalid nonce")
        || lower.contains("replacement transaction")
    {
        ProviderError::SequenceConflict(message.to_string())
    } else if lower.contains("insufficient funds")
        || lower.contains("underpriced")
        || lower.contains("exceeds block gas limit")
        || lower.contains("intrinsic gas too low")
        || lower.contains("execution reverted")
        || lower.contains("malformed")
    {
        ProviderError::Rejected(message.to_string())
    } else {
        ProviderError::Transient(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_conflicts_are_classified() {
        assert!(matches!(
            classify_send_error("nonce too low: next nonce 5, tx nonce 3"),
            ProviderError::SequenceConflict(_)
        ));
        assert!(matches!(
            classify_send_error("replacement transaction underpriced"),
            ProviderError::SequenceConflict(_)
        ));
    }

    #[test]
    fn test_permanent_rejections_are_classified() {
        assert!(matches!(
            classify_send_error("insufficient funds for gas * price + value"),
            ProviderError::Rejected(_)
        ));
        assert!(matches!(
            classify_send_error("intrinsic gas too low"),
            ProviderError::Rejected(_)
        ));
    }

    #[test]
    fn test_unknown_errors_default_to_transient() {
        assert!(matches!(
            classify_send_error("connection reset by peer"),
            ProviderError::Transient(_)
        ));
        assert!(matches!(
            classify_send_error("503 Service Unavailable"),
            ProviderError::Transient(_)
        ));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(EvmProvider::new("not a url").is_err());
        assert!(EvmProvider::new("http://localhost:8545").is_ok());
    }
}
