//! Sets up logging from environment variables.
//!
//! - `LOG_MODE`: "stdout" (default) or "file"
//! - `LOG_LEVEL`: "trace", "debug", "info" (default), "warn" or "error"
//! - `LOG_DATA_DIR`: directory for file mode (default "logs/")
//!
//! File mode rolls by date and, past `MAX_LOG_FILE_SIZE`, by sequence index.

use chrono::Utc;
use log::info;
use simplelog::{Config, LevelFilter, SimpleLogger, WriteLogger};
use std::{
    env,
    fs::{create_dir_all, metadata, OpenOptions},
    path::Path,
};

const MAX_LOG_FILE_SIZE: u64 = 1_073_741_824;

/// Path of the log file for `date_str` with a rolling `index`.
pub fn rolled_log_path(base_file_path: &str, date_str: &str, index: u32) -> String {
    match base_file_path.strip_suffix(".log") {
        Some(trimmed) => format!("{}-{}.{}.log", trimmed, date_str, index),
        None => format!("{}-{}.{}.log", base_file_path, date_str, index),
    }
}

/// Steps the index forward until the candidate file is under `max_size`.
pub fn next_available_log_path(
    file_path: &str,
    base_file_path: &str,
    date_str: &str,
    max_size: u64,
) -> String {
    let mut final_path = file_path.to_string();
    let mut index = 1;
    while let Ok(meta) = metadata(&final_path) {
        if meta.len() > max_size {
            final_path = rolled_log_path(base_file_path, date_str, index);
            index += 1;
        } else {
            break;
        }
    }
    final_path
}

pub fn setup_logging() {
    let log_mode = env::var("LOG_MODE").unwrap_or_else(|_| "stdout".to_string());
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let level_filter = match log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    };

    if log_mode.to_lowercase() == "file" {
        let log_dir = env::var("LOG_DATA_DIR").unwrap_or_else(|_| "logs/".to_string());
        let log_dir = format!("{}/", log_dir.trim_end_matches('/'));
        if !Path::new(&log_dir).exists() {
            create_dir_all(&log_dir).expect("Failed to create log directory");
        }
        let base_file_path = format!("{}relayer.log", log_dir);

        let date_str = Utc::now().format("%Y-%m-%d").to_string();
        let time_based_path = rolled_log_path(&base_file_path, &date_str, 0);
        let final_path = next_available_log_path(
            &time_based_path,
            &base_file_path,
            &date_str,
            MAX_LOG_FILE_SIZE,
        );

        let log_file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&final_path)
            .expect("Failed to open log file");

        WriteLogger::init(level_filter, Config::default(), log_file)
            .expect("Failed to initialize file logger");
        info!("Logging to file: {}", final_path);
    } else {
        SimpleLogger::init(level_filter, Config::default())
            .expect("Failed to initialize stdout logger");
    }
}
