use std::sync::Arc;

use apalis::prelude::{Attempt, Error};
use eyre::Report;
use log::info;

mod transaction_request_handler;
pub use transaction_request_handler::*;

mod transaction_submission_handler;
pub use transaction_submission_handler::*;

mod transaction_status_handler;
pub use transaction_status_handler::*;

/// Translates a handler outcome into the queue's retry protocol: worker-level
/// retries until `max_attempts`, then an abort that parks the job.
pub fn handle_result(
    result: Result<(), Report>,
    attempt: Attempt,
    job_type: &str,
    max_attempts: usize,
) -> Result<(), Error> {
    if result.is_ok() {
        info!("{} request handled successfully", job_type);
        return Ok(());
    }
    info!("{} request failed: {:?}", job_type, result);

    if attempt.current() >= max_attempts {
        info!("Max attempts ({}) reached, failing job", max_attempts);
        Err(Error::Abort(Arc::new("Failed to handle request".into())))?
    }

    Err(Error::Failed(Arc::new(
        "Failed to handle request. Retrying".into(),
    )))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_result_success() {
        let result: Result<(), Report> = Ok(());
        let handled = handle_result(result, Attempt::default(), "test_job", 3);
        assert!(handled.is_ok());
    }

    #[test]
    fn test_handle_result_retries_below_budget() {
        let result: Result<(), Report> = Err(Report::msg("boom"));
        let handled = handle_result(result, Attempt::default(), "test_job", 3);
        assert!(matches!(handled, Err(Error::Failed(_))));
    }

    #[test]
    fn test_handle_result_aborts_at_budget() {
        let result: Result<(), Report> = Err(Report::msg("boom"));
        let attempt = Attempt::default();
        for _ in 0..3 {
            attempt.increment();
        }
        let handled = handle_result(result, attempt, "test_job", 3);
        assert!(matches!(handled, Err(Error::Abort(_))));
    }
}
