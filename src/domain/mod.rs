//! # Domain Module
//!
//! Orchestration of the relay pipeline: admission of signed intents and the
//! execution engine that drives each transaction's status state machine.

use actix_web::web::ThinData;
use eyre::Result;

mod admission;
pub use admission::*;

mod execution;
pub use execution::*;

#[cfg(test)]
pub(crate) mod test_helpers;

use crate::{
    jobs::JobProducer,
    models::{AppState, TransactionRecord},
    repositories::{InMemoryTransactionRepository, TransactionRepository},
    services::EvmProvider,
};

pub type DefaultAdmissionController =
    AdmissionController<InMemoryTransactionRepository, JobProducer>;

pub type DefaultExecutionEngine =
    ExecutionEngine<EvmProvider, InMemoryTransactionRepository, JobProducer>;

pub fn get_admission_controller(state: &ThinData<AppState>) -> DefaultAdmissionController {
    AdmissionController::new(
        (*state.sequencer).clone(),
        state.transaction_repository(),
        state.job_producer(),
    )
}

pub fn get_execution_engine(state: &ThinData<AppState>) -> DefaultExecutionEngine {
    ExecutionEngine::new(
        state.provider.clone(),
        state.transaction_repository(),
        state.job_producer(),
        state.wallet_pool(),
        state.chain_id,
    )
}

pub async fn get_transaction_by_id(
    transaction_id: String,
    state: &ThinData<AppState>,
) -> Result<TransactionRecord> {
    let transaction = state
        .transaction_repository
        .get_by_id(transaction_id)
        .await?;
    Ok(transaction)
}
