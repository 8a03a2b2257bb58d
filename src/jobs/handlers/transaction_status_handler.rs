//! Confirmation watcher: polls the target for a receipt and lets the engine
//! confirm, resubmit or fail the transaction.

use actix_web::web::ThinData;
use apalis::prelude::{Attempt, Data, *};
use eyre::Result;
use log::info;

use crate::{
    constants::WORKER_DEFAULT_MAXIMUM_RETRIES,
    domain::{get_execution_engine, get_transaction_by_id},
    jobs::{handle_result, Job, TransactionStatusCheck},
    models::AppState,
};

pub async fn transaction_status_handler(
    job: Job<TransactionStatusCheck>,
    state: Data<ThinData<AppState>>,
    attempt: Attempt,
) -> Result<(), Error> {
    info!("Handling transaction status job: {:?}", job.data);

    let result = handle_request(job.data, state).await;

    handle_result(
        result,
        attempt,
        "Transaction Status",
        WORKER_DEFAULT_MAXIMUM_RETRIES,
    )
}

async fn handle_request(
    status_request: TransactionStatusCheck,
    state: Data<ThinData<AppState>>,
) -> Result<()> {
    let engine = get_execution_engine(&state);
    let transaction = get_transaction_by_id(status_request.transaction_id, &state).await?;

    engine.check_transaction_status(transaction).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_check_job_data() {
        let check_job = TransactionStatusCheck::new("tx123");
        let job = Job::new(crate::jobs::JobType::TransactionStatusCheck, check_job);
        assert_eq!(job.data.transaction_id, "tx123");
    }
}
