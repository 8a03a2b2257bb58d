//! # Models Module
//!
//! Core data structures and type definitions for the intent relayer.

mod address;
pub use address::*;

mod intent;
pub use intent::*;

mod transaction;
pub use transaction::*;

mod token;
pub use token::*;

mod app_state;
pub use app_state::*;

mod api_response;
pub use api_response::*;

mod error;
pub use error::*;

pub use alloy::primitives::U256;
