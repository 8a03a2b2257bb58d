use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Address;

/// Static token metadata served by the boundary lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct TokenInfo {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

/// Per-chain token tables, loaded once from the config file at startup.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens_by_chain: HashMap<u64, Vec<TokenInfo>>,
}

impl TokenRegistry {
    pub fn new(tokens_by_chain: HashMap<u64, Vec<TokenInfo>>) -> Self {
        Self { tokens_by_chain }
    }

    pub fn tokens_for_chain(&self, chain_id: u64) -> Option<&[TokenInfo]> {
        self.tokens_by_chain.get(&chain_id).map(|v| v.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_chain() {
        let token = TokenInfo {
            address: "0x6b175474e89094c44da98b954eedeac495271d0f".parse().unwrap(),
            symbol: "DAI".to_string(),
            decimals: 18,
        };
        let registry = TokenRegistry::new(HashMap::from([(1u64, vec![token.clone()])]));

        assert_eq!(registry.tokens_for_chain(1), Some(&[token][..]));
        assert_eq!(registry.tokens_for_chain(42), None);
    }
}
