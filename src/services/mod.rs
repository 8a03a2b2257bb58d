//! # Services Module
//!
//! Core business logic: signature verification, per-user sequencing, the
//! submission identity pool, target-chain access and transaction signing.

mod verifier;
pub use verifier::*;

mod sequencer;
pub use sequencer::*;

mod wallet_pool;
pub use wallet_pool::*;

mod provider;
pub use provider::*;

mod signer;
pub use signer::*;
