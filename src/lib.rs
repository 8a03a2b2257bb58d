//! Intent Relayer Library
//!
//! Accepts cryptographically signed transaction intents, validates their
//! authorization and timing constraints, sequences them per user and submits
//! the resulting transactions to an execution target through a pool of
//! submission identities. It includes:
//!
//! - Signature-based authorization over a canonical intent digest
//! - Admission control on time-bounded intents
//! - Strict per-user nonce sequencing
//! - Retryable submission with a bounded attempt budget
//! - A forward-only transaction status state machine
//!
//! # Module Structure
//!
//! - `api`: HTTP boundary (routes and controllers)
//! - `config`: Configuration management
//! - `constants`: Engine and worker tuning values
//! - `domain`: Admission controller and execution engine
//! - `init`: Startup wiring (state, identity sync, workers)
//! - `jobs`: Redis-backed job pipeline
//! - `logging`: Logging setup
//! - `models`: Core data structures
//! - `repositories`: Transaction store and user sequence state
//! - `services`: Verifier, sequencer, wallet pool, provider, signer
//! - `utils`: Common helpers

pub mod api;
pub mod config;
pub mod constants;
pub mod domain;
pub mod init;
pub mod jobs;
pub mod logging;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

pub use models::{ApiError, AppState};
