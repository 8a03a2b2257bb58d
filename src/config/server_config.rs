/// Server configuration read from environment variables.
use std::env;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address the server will bind to.
    pub host: String,
    /// The port number the server will listen on.
    pub port: u16,
    /// The URL for the Redis instance backing the job queues.
    pub redis_url: String,
    /// Milliseconds to wait for the initial Redis connection.
    pub redis_connection_timeout_ms: u64,
    /// The file path to the relayer's configuration file.
    pub config_file_path: String,
    /// The API key required on every request.
    pub api_key: String,
    /// The number of requests allowed per second per API key.
    pub rate_limit_requests_per_second: u64,
    /// The maximum burst size for rate limiting.
    pub rate_limit_burst_size: u32,
}

impl ServerConfig {
    /// Creates a `ServerConfig` from environment variables.
    ///
    /// # Panics
    ///
    /// Panics if `REDIS_URL` or `API_KEY` is not set; both are required for
    /// the server to function.
    pub fn from_env() -> Self {
        let conf_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "./config".to_string());
        let conf_dir = format!("{}/", conf_dir.trim_end_matches('/'));
        let config_file_name =
            env::var("CONFIG_FILE_NAME").unwrap_or_else(|_| "config.json".to_string());
        let config_file_path = format!("{}{}", conf_dir, config_file_name);

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("APP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            redis_url: env::var("REDIS_URL").expect("REDIS_URL must be set"),
            redis_connection_timeout_ms: env::var("REDIS_CONNECTION_TIMEOUT_MS")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .unwrap_or(10000),
            config_file_path,
            api_key: env::var("API_KEY").expect("API_KEY must be set"),
            rate_limit_requests_per_second: env::var("RATE_LIMIT_REQUESTS_PER_SECOND")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
            rate_limit_burst_size: env::var("RATE_LIMIT_BURST_SIZE")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap_or(300),
        }
    }
}
