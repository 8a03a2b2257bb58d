use serde::Serialize;
use thiserror::Error;

/// Signature-authorization failures. Permanent: never retried.
#[derive(Error, Debug, Serialize)]
pub enum AuthError {
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Signature recovered to {recovered}, expected {expected}")]
    SignerMismatch { expected: String, recovered: String },
}
