//! Builds the shared application state from the validated config file:
//! repositories, job queues, the provider, the submission wallet pool and
//! the token registry.

use std::{collections::HashMap, sync::Arc};

use actix_web::web;
use color_eyre::{eyre::WrapErr, Result};

use crate::{
    config::Config,
    jobs::{JobProducer, Queue},
    models::{AppState, TokenInfo, TokenRegistry},
    repositories::{InMemoryTransactionRepository, InMemoryUserSequenceStore},
    services::{
        EvmProvider, LocalIdentitySigner, NonceSequencer, SubmissionSigner, SubmissionWalletPool,
    },
};

pub async fn initialize_app_state(config_file: &Config) -> Result<web::ThinData<AppState>> {
    let transaction_repository = Arc::new(InMemoryTransactionRepository::new());
    let user_sequence_store = Arc::new(InMemoryUserSequenceStore::new());
    let sequencer = Arc::new(NonceSequencer::new(user_sequence_store.clone()));

    let provider = Arc::new(
        EvmProvider::new(&config_file.network.provider_url)
            .wrap_err("Failed to create provider for the execution target")?,
    );

    let mut identities: Vec<(crate::models::Address, Arc<dyn SubmissionSigner>)> = Vec::new();
    for identity in &config_file.identities {
        let raw_key = identity
            .key
            .load()
            .wrap_err_with(|| format!("Failed to load key for identity {}", identity.id))?;
        let signer = LocalIdentitySigner::from_raw_key(&raw_key)
            .wrap_err_with(|| format!("Failed to create signer for identity {}", identity.id))?;
        let address = signer.address();
        identities.push((address, Arc::new(signer)));
    }
    let wallet_pool = Arc::new(SubmissionWalletPool::new(identities));

    let tokens_by_chain: HashMap<u64, Vec<TokenInfo>> = config_file
        .tokens
        .iter()
        .map(|chain| {
            (
                chain.chain_id,
                chain.tokens.iter().cloned().map(TokenInfo::from).collect(),
            )
        })
        .collect();
    let token_registry = Arc::new(TokenRegistry::new(tokens_by_chain));

    let queue = Queue::setup().await?;
    let job_producer = Arc::new(JobProducer::new(queue));

    let app_state = web::ThinData(AppState {
        transaction_repository,
        user_sequence_store,
        sequencer,
        wallet_pool,
        provider,
        job_producer,
        token_registry,
        chain_id: config_file.network.chain_id,
    });

    Ok(app_state)
}
