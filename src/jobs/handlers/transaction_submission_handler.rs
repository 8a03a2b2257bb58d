//! Dispatches prepared transactions to the execution target. Both first
//! submissions and engine-scheduled resubmissions land here; the engine
//! treats them identically, re-dispatching the same signed payload.

use actix_web::web::ThinData;
use apalis::prelude::{Attempt, Data, *};
use eyre::Result;
use log::info;

use crate::{
    constants::WORKER_DEFAULT_MAXIMUM_RETRIES,
    domain::{get_execution_engine, get_transaction_by_id},
    jobs::{handle_result, Job, TransactionCommand, TransactionSend},
    models::AppState,
};

pub async fn transaction_submission_handler(
    job: Job<TransactionSend>,
    state: Data<ThinData<AppState>>,
    attempt: Attempt,
) -> Result<(), Error> {
    info!("Handling transaction submission: {:?}", job.data);

    let result = handle_request(job.data, state).await;

    handle_result(
        result,
        attempt,
        "Transaction Sender",
        WORKER_DEFAULT_MAXIMUM_RETRIES,
    )
}

async fn handle_request(request: TransactionSend, state: Data<ThinData<AppState>>) -> Result<()> {
    let engine = get_execution_engine(&state);
    let transaction = get_transaction_by_id(request.transaction_id, &state).await?;

    match request.command {
        TransactionCommand::Submit => {
            engine.submit_transaction(transaction).await?;
        }
        TransactionCommand::Resubmit => {
            info!("Resubmitting transaction {}", transaction.id);
            engine.submit_transaction(transaction).await?;
        }
    };

    Ok(())
}
