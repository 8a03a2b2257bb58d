//! Property-based suites for the relayer's core invariants.

mod digest;
mod logging;
mod sequencing;
