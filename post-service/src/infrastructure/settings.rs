use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use crate::infrastructure::uploads::ReferenceStyle;

#[derive(Debug, Clone)]
pub struct Settings {
    /// `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_update_tx_timeout_ms: u64,
    pub db_delete_tx_timeout_ms: u64,
    pub db_tx_max_attempts: u32,
    pub db_tx_retry_delay_ms: u64,
    pub http_addr: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub http_request_body_limit_bytes: usize,
    pub http_concurrency_limit: usize,
    pub http_request_timeout_secs: u64,
    pub upload_dir: PathBuf,
    pub upload_public_prefix: String,
    pub upload_reference_style: ReferenceStyle,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let database_url = get_optional("DATABASE_URL");
        let db_max_connections = u32::try_from(parse_usize_env("DB_MAX_CONNECTIONS", 10)?)
            .context("DB_MAX_CONNECTIONS is too large")?;
        let db_update_tx_timeout_ms = parse_u64_env("DB_UPDATE_TX_TIMEOUT_MS", 10_000)?;
        let db_delete_tx_timeout_ms = parse_u64_env("DB_DELETE_TX_TIMEOUT_MS", 5_000)?;
        let db_tx_max_attempts = u32::try_from(parse_usize_env("DB_TX_MAX_ATTEMPTS", 3)?)
            .context("DB_TX_MAX_ATTEMPTS is too large")?;
        let db_tx_retry_delay_ms = parse_u64_env("DB_TX_RETRY_DELAY_MS", 500)?;

        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let cors_origins = parse_cors_origins(
            std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:4321,http://localhost:5173".to_string()),
        );
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let http_request_body_limit_bytes =
            parse_usize_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 10 * 1024 * 1024)?;
        let http_concurrency_limit = parse_usize_env("HTTP_CONCURRENCY_LIMIT", 256)?;
        let http_request_timeout_secs = parse_u64_env("HTTP_REQUEST_TIMEOUT_SECS", 30)?;

        let upload_dir =
            PathBuf::from(get_optional("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()));
        let upload_public_prefix =
            get_optional("UPLOAD_PUBLIC_PREFIX").unwrap_or_else(|| "/uploads".to_string());
        if upload_public_prefix.trim_matches('/').is_empty() {
            return Err(anyhow!("UPLOAD_PUBLIC_PREFIX must not be empty or '/'"));
        }
        let upload_reference_style = get_optional("UPLOAD_REFERENCE_STYLE")
            .unwrap_or_else(|| "path".to_string())
            .parse::<ReferenceStyle>()
            .context("Failed to parse UPLOAD_REFERENCE_STYLE")?;

        Ok(Self {
            database_url,
            db_max_connections,
            db_update_tx_timeout_ms,
            db_delete_tx_timeout_ms,
            db_tx_max_attempts,
            db_tx_retry_delay_ms,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_concurrency_limit,
            http_request_timeout_secs,
            upload_dir,
            upload_public_prefix,
            upload_reference_style,
        })
    }
}

fn get_optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_usize_env(key: &str, default: usize) -> Result<usize> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
