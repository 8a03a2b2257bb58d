//! Redis-backed queues for the three job stages.

use apalis_redis::{Config, RedisStorage};
use color_eyre::{eyre, Result};
use log::error;
use serde::{Deserialize, Serialize};
use tokio::time::{timeout, Duration};

use crate::config::ServerConfig;

use super::{Job, TransactionRequest, TransactionSend, TransactionStatusCheck};

#[derive(Clone, Debug)]
pub struct Queue {
    pub transaction_request_queue: RedisStorage<Job<TransactionRequest>>,
    pub transaction_submission_queue: RedisStorage<Job<TransactionSend>>,
    pub transaction_status_queue: RedisStorage<Job<TransactionStatusCheck>>,
}

impl Queue {
    async fn storage<T: Serialize + for<'de> Deserialize<'de>>(
        namespace: &str,
    ) -> Result<RedisStorage<T>> {
        let server_config = ServerConfig::from_env();
        let redis_url = server_config.redis_url.clone();
        let connection_timeout_ms = server_config.redis_connection_timeout_ms;
        let conn = match timeout(
            Duration::from_millis(connection_timeout_ms),
            apalis_redis::connect(redis_url.clone()),
        )
        .await
        {
            Ok(result) => result.map_err(|e| {
                error!("Failed to connect to Redis at {}: {}", redis_url, e);
                eyre::eyre!(
                    "Failed to connect to Redis at {}. Ensure Redis is running. Error: {}",
                    redis_url,
                    e
                )
            })?,
            Err(_) => {
                error!("Timeout connecting to Redis at {}", redis_url);
                return Err(eyre::eyre!(
                    "Timed out after {} ms while connecting to Redis at {}",
                    connection_timeout_ms,
                    redis_url
                ));
            }
        };
        let config = Config::default()
            .set_namespace(namespace)
            .set_max_retries(5);

        Ok(RedisStorage::new_with_config(conn, config))
    }

    pub async fn setup() -> Result<Self> {
        Ok(Self {
            transaction_request_queue: Self::storage("transaction_request_queue").await?,
            transaction_submission_queue: Self::storage("transaction_submission_queue").await?,
            transaction_status_queue: Self::storage("transaction_status_queue").await?,
        })
    }
}
