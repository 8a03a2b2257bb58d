//! Configuration system for the intent relayer.
//!
//! This module handles:
//! - Loading and parsing the JSON config file
//! - Environment variable integration
//! - Configuration validation
//!
//! Configuration is organized into sections:
//! - Network: the execution target (chain id + provider endpoint)
//! - Identities: submission signing keys (inline or via env indirection)
//! - Tokens: per-chain token tables for the boundary lookup

mod server_config;
pub use server_config::*;

mod config_file;
pub use config_file::*;

mod rate_limit;
pub use rate_limit::*;

mod error;
pub use error::*;
