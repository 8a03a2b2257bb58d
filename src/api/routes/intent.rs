//! HTTP routes for intent submission and transaction observation.

use actix_web::{get, post, web, Responder};

use crate::{
    api::controllers::intent,
    models::{
        ApiResponse, AppState, Intent, SubmitIntentResponse, TokenInfo, TransactionResponse,
    },
};

/// Submits a signed intent for admission.
#[utoipa::path(
    post,
    path = "/api/v1/intents",
    tag = "Intents",
    operation_id = "submitIntent",
    security(("bearer_auth" = [])),
    request_body = Intent,
    responses(
        (status = 200, description = "Intent admitted", body = ApiResponse<SubmitIntentResponse>),
        (status = 400, description = "Invalid signature, window or timing", body = ApiResponse<String>),
        (status = 409, description = "Nonce mismatch", body = ApiResponse<String>),
        (status = 401, description = "Unauthorized", body = ApiResponse<String>)
    )
)]
#[post("/intents")]
async fn submit_intent(
    intent: web::Json<Intent>,
    state: web::ThinData<AppState>,
) -> impl Responder {
    intent::submit_intent(intent.into_inner(), state).await
}

/// Reads a transaction's current status from the store.
#[utoipa::path(
    get,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "Transactions",
    operation_id = "getTransactionStatus",
    security(("bearer_auth" = [])),
    params(("transaction_id" = String, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Transaction found", body = ApiResponse<TransactionResponse>),
        (status = 404, description = "Unknown transaction id", body = ApiResponse<String>)
    )
)]
#[get("/transactions/{transaction_id}")]
async fn get_transaction_status(
    transaction_id: web::Path<String>,
    state: web::ThinData<AppState>,
) -> impl Responder {
    intent::get_transaction_status(transaction_id.into_inner(), state).await
}

/// Lists the configured tokens for a chain.
#[utoipa::path(
    get,
    path = "/api/v1/tokens/{chain_id}",
    tag = "Tokens",
    operation_id = "getTokensForChain",
    security(("bearer_auth" = [])),
    params(("chain_id" = u64, Path, description = "Chain id")),
    responses(
        (status = 200, description = "Token list", body = ApiResponse<Vec<TokenInfo>>),
        (status = 404, description = "No tokens for chain", body = ApiResponse<String>)
    )
)]
#[get("/tokens/{chain_id}")]
async fn get_tokens_for_chain(
    chain_id: web::Path<u64>,
    state: web::ThinData<AppState>,
) -> impl Responder {
    intent::get_tokens_for_chain(chain_id.into_inner(), state).await
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_intent);
    cfg.service(get_transaction_status);
    cfg.service(get_tokens_for_chain);
}
