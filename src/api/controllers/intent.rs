//! # Intent Controller
//!
//! Handles the boundary operations:
//! - Submitting signed intents
//! - Reading a transaction's status
//! - Per-chain token lookups

use actix_web::{web, HttpResponse};
use log::info;

use crate::{
    domain::get_admission_controller,
    models::{
        ApiError, ApiResponse, AppState, Intent, SubmitIntentResponse, TransactionResponse,
    },
    repositories::TransactionRepository,
};

/// Synchronous admission: returns the transaction id on success, a typed
/// admission error otherwise. Execution continues asynchronously; progress is
/// observable through the status endpoint.
pub async fn submit_intent(
    intent: Intent,
    state: web::ThinData<AppState>,
) -> Result<HttpResponse, ApiError> {
    let controller = get_admission_controller(&state);
    let record = controller.admit(intent).await?;

    info!("admitted transaction {}", record.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(SubmitIntentResponse {
        transaction_id: record.id,
    })))
}

pub async fn get_transaction_status(
    transaction_id: String,
    state: web::ThinData<AppState>,
) -> Result<HttpResponse, ApiError> {
    let transaction = state
        .transaction_repository
        .get_by_id(transaction_id)
        .await?;

    let response: TransactionResponse = transaction.into();

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

pub async fn get_tokens_for_chain(
    chain_id: u64,
    state: web::ThinData<AppState>,
) -> Result<HttpResponse, ApiError> {
    let tokens = state
        .token_registry
        .tokens_for_chain(chain_id)
        .ok_or_else(|| ApiError::NotFound(format!("No tokens configured for chain {}", chain_id)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(tokens.to_vec())))
}
