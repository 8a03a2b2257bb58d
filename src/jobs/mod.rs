//! # Jobs Module
//!
//! The asynchronous pipeline behind admission: Redis-backed queues, the job
//! envelopes that travel through them, producers, worker-level retry policy
//! and the stage handlers.

mod job;
pub use job::*;

mod job_producer;
pub use job_producer::*;

mod queue;
pub use queue::*;

mod retry_backoff;
pub use retry_backoff::*;

mod handlers;
pub use handlers::*;
