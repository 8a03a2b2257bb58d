//! # Repository Module
//!
//! In-memory persistence for the relayer. The transaction store is the only
//! component that mutates transaction status; everything else goes through it.

mod transaction;
pub use transaction::*;

mod user_sequence;
pub use user_sequence::*;
