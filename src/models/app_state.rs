use std::sync::Arc;

use crate::{
    jobs::JobProducer,
    models::TokenRegistry,
    repositories::{InMemoryTransactionRepository, InMemoryUserSequenceStore},
    services::{EvmProvider, NonceSequencer, SubmissionWalletPool},
};

/// Shared application state handed to every route handler and worker.
#[derive(Clone)]
pub struct AppState {
    pub transaction_repository: Arc<InMemoryTransactionRepository>,
    pub user_sequence_store: Arc<InMemoryUserSequenceStore>,
    pub sequencer: Arc<NonceSequencer>,
    pub wallet_pool: Arc<SubmissionWalletPool>,
    pub provider: Arc<EvmProvider>,
    pub job_producer: Arc<JobProducer>,
    pub token_registry: Arc<TokenRegistry>,
    pub chain_id: u64,
}

impl AppState {
    pub fn transaction_repository(&self) -> Arc<InMemoryTransactionRepository> {
        self.transaction_repository.clone()
    }

    pub fn wallet_pool(&self) -> Arc<SubmissionWalletPool> {
        self.wallet_pool.clone()
    }

    pub fn job_producer(&self) -> Arc<JobProducer> {
        self.job_producer.clone()
    }
}
