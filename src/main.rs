//! # Intent Relayer
//!
//! A service that accepts signed transaction intents, validates their
//! authorization and timing, sequences them per user and relays them to an
//! execution target through a pool of submission identities.
//!
//! ## Features
//!
//! - Signature-verified admission with strict per-user nonce sequencing
//! - Pooled submission identities with sequence tracking and resync
//! - Bounded, backoff-scheduled submission retries
//! - REST API
//!
//! ## Architecture
//!
//! The service is built using Actix-web and provides:
//! - HTTP endpoints for intent submission and status observation
//! - In-memory repository implementations
//! - Redis-backed workers for preparation, submission and confirmation
//!
//! ## Usage
//!
//! ```bash
//! cargo run
//! ```

use std::sync::Arc;

use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{
    dev::Service,
    middleware::{self, Logger},
    web, App, HttpResponse, HttpServer,
};
use color_eyre::{eyre::WrapErr, Result};
use dotenvy::dotenv;
use log::info;

use intent_relayer::{
    api,
    config::{self, ApiKeyRateLimit, Config, ServerConfig},
    init::{initialize_app_state, initialize_workers, resync_submission_identities},
    logging::setup_logging,
};

fn load_config_file(config_file_path: &str) -> Result<Config> {
    config::load_config(config_file_path).wrap_err("Failed to load config file")
}

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install().wrap_err("Failed to initialize error reporting")?;

    dotenv().ok();
    setup_logging();

    let config = Arc::new(ServerConfig::from_env());
    let config_file = load_config_file(&config.config_file_path)?;

    let app_state = initialize_app_state(&config_file).await?;

    // Identities enter rotation only with a target-verified sequence.
    resync_submission_identities(&app_state).await?;

    initialize_workers(app_state.clone()).await?;

    let rate_limit_config = GovernorConfigBuilder::default()
        .requests_per_second(config.rate_limit_requests_per_second)
        .key_extractor(ApiKeyRateLimit)
        .burst_size(config.rate_limit_burst_size)
        .finish()
        .unwrap();

    let moved_config = Arc::clone(&config);
    info!("Starting server on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        let config = Arc::clone(&moved_config);
        App::new()
            .wrap_fn(move |req, srv| {
                if req.path() == "/health" {
                    return srv.call(req);
                }
                let expected_key = config.api_key.clone();
                if let Some(header_value) = req.headers().get("x-api-key") {
                    if let Ok(key) = header_value.to_str() {
                        if key == expected_key {
                            return srv.call(req);
                        }
                    }
                }

                Box::pin(async move {
                    Ok(req.into_response(
                        HttpResponse::Unauthorized().body(
                            r#"{"success": false, "code":401, "error": "Unauthorized", "message": "Unauthorized"}"#.to_string(),
                        ),
                    ))
                })
            })
            .wrap(Governor::new(&rate_limit_config))
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(api::routes::health::init)
            .service(web::scope("/api/v1").configure(api::routes::configure_routes))
    })
    .bind((config.host.as_str(), config.port))
    .wrap_err_with(|| format!("Failed to bind server to {}:{}", config.host, config.port))?
    .shutdown_timeout(5)
    .run()
    .await
    .wrap_err("Server runtime error")
}
