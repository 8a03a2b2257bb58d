//! Handles freshly admitted transactions: expiry gate, identity
//! reservation, pricing and signing, then hands off to the submission queue.

use actix_web::web::ThinData;
use apalis::prelude::{Attempt, Data, *};
use eyre::Result;
use log::info;

use crate::{
    constants::WORKER_DEFAULT_MAXIMUM_RETRIES,
    domain::{get_execution_engine, get_transaction_by_id},
    jobs::{handle_result, Job, TransactionRequest},
    models::AppState,
};

pub async fn transaction_request_handler(
    job: Job<TransactionRequest>,
    state: Data<ThinData<AppState>>,
    attempt: Attempt,
) -> Result<(), Error> {
    info!("Handling transaction request: {:?}", job.data);

    let result = handle_request(job.data, state).await;

    handle_result(
        result,
        attempt,
        "Transaction Request",
        WORKER_DEFAULT_MAXIMUM_RETRIES,
    )
}

async fn handle_request(
    request: TransactionRequest,
    state: Data<ThinData<AppState>>,
) -> Result<()> {
    let engine = get_execution_engine(&state);
    let transaction = get_transaction_by_id(request.transaction_id, &state).await?;

    engine.prepare_transaction(transaction).await?;

    Ok(())
}
