//! Execution-engine tuning.

/// Dispatch attempts per transaction before it fails terminally.
pub const MAX_SUBMISSION_ATTEMPTS: u32 = 3;

/// Base delay for engine-scheduled submission retries; doubles per attempt.
pub const SUBMISSION_RETRY_BASE_DELAY_SECONDS: i64 = 2;

/// How long a dispatched transaction may sit unconfirmed before the attempt
/// is written off and the retry budget consulted.
pub const CONFIRMATION_WATCH_TIMEOUT_SECONDS: u64 = 120;

/// Delay before the first confirmation check of a fresh dispatch.
pub const STATUS_CHECK_DELAY_SECONDS: i64 = 5;

/// Fallback gas limit when the target cannot estimate (e.g. because the call
/// would currently revert); the dispatch then carries the decision to the
/// target rather than failing locally.
pub const DEFAULT_GAS_LIMIT: u64 = 500_000;
