//! Constant values used across the relayer.

mod execution;
pub use execution::*;

mod worker;
pub use worker::*;
