use std::{collections::HashSet, env, fs};

use serde::{Deserialize, Serialize};

use super::ConfigFileError;
use crate::models::{Address, TokenInfo};

/// The execution target the relayer submits to. Read once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkFileConfig {
    pub chain_id: u64,
    pub provider_url: String,
}

impl NetworkFileConfig {
    fn validate(&self) -> Result<(), ConfigFileError> {
        if self.chain_id == 0 {
            return Err(ConfigFileError::InvalidNetwork(
                "chain_id must be non-zero".to_string(),
            ));
        }
        if !self.provider_url.starts_with("http://") && !self.provider_url.starts_with("https://") {
            return Err(ConfigFileError::InvalidNetwork(format!(
                "provider_url must be an http(s) endpoint, got {}",
                self.provider_url
            )));
        }
        Ok(())
    }
}

/// Where a signing key comes from: inline hex (development only) or an
/// environment variable holding the hex.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeySource {
    Env { env: String },
    Plain { value: String },
}

impl KeySource {
    /// Resolves the 32-byte raw key.
    pub fn load(&self) -> Result<Vec<u8>, ConfigFileError> {
        let hex_key = match self {
            KeySource::Env { env: name } => {
                env::var(name).map_err(|_| ConfigFileError::MissingEnvVar(name.clone()))?
            }
            KeySource::Plain { value } => value.clone(),
        };
        let stripped = hex_key.strip_prefix("0x").unwrap_or(&hex_key);
        let raw = hex::decode(stripped)
            .map_err(|e| ConfigFileError::InvalidFormat(format!("invalid key hex: {}", e)))?;
        if raw.len() != 32 {
            return Err(ConfigFileError::InvalidFormat(format!(
                "expected 32-byte key, got {}",
                raw.len()
            )));
        }
        Ok(raw)
    }
}

/// One submission identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityFileConfig {
    pub id: String,
    pub key: KeySource,
}

/// Token table for one chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainTokensFileConfig {
    pub chain_id: u64,
    pub tokens: Vec<TokenFileConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenFileConfig {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl From<TokenFileConfig> for TokenInfo {
    fn from(token: TokenFileConfig) -> Self {
        TokenInfo {
            address: token.address,
            symbol: token.symbol,
            decimals: token.decimals,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkFileConfig,
    pub identities: Vec<IdentityFileConfig>,
    #[serde(default)]
    pub tokens: Vec<ChainTokensFileConfig>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigFileError> {
        self.network.validate()?;

        if self.identities.is_empty() {
            return Err(ConfigFileError::MissingField("identities".into()));
        }
        let mut seen_ids = HashSet::new();
        for identity in &self.identities {
            if identity.id.is_empty() {
                return Err(ConfigFileError::MissingField("identity id".into()));
            }
            if !seen_ids.insert(&identity.id) {
                return Err(ConfigFileError::DuplicateId(format!(
                    "Duplicate identity ID found: {}",
                    identity.id
                )));
            }
        }

        let mut seen_chains = HashSet::new();
        for chain in &self.tokens {
            if !seen_chains.insert(chain.chain_id) {
                return Err(ConfigFileError::DuplicateId(format!(
                    "Duplicate token chain id found: {}",
                    chain.chain_id
                )));
            }
        }
        Ok(())
    }
}

/// Loads and validates the config file.
pub fn load_config(config_file_path: &str) -> Result<Config, ConfigFileError> {
    let config_str = fs::read_to_string(config_file_path)?;
    let config: Config = serde_json::from_str(&config_str)?;
    config.validate()?;
    Ok(config)
}
