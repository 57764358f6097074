//! Typed configuration from environment variables.
//!
//! Loads once at startup, fails fast if required vars are missing.
//! Sensitive values wrapped in secrecy::SecretString to prevent log leaks.

pub mod secrets;

use crate::error::{Error, Result};
use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CISCO_API_BASE_URL: &str = "https://api.cisco.com";
pub const DEFAULT_CISCO_TOKEN_URL: &str = "https://cloudsso.cisco.com/as/token.oauth2";
pub const DEFAULT_CREDENTIALS_FILE: &str = "conf/product_database.config";

#[derive(Debug)]
pub struct Config {
    pub database_url: SecretString,
    pub bind_addr: String,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
    /// TOML file holding the Cisco API client credentials.
    pub credentials_file: PathBuf,
    pub cisco_api_base_url: String,
    pub cisco_token_url: String,
    /// A worker whose last heartbeat is older than this counts as offline.
    pub worker_liveness: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        let worker_liveness = match std::env::var("WORKER_LIVENESS_SECS") {
            Ok(raw) => Duration::from_secs(raw.parse().map_err(|_| {
                Error::Config(format!("WORKER_LIVENESS_SECS is not a number: {raw}"))
            })?),
            Err(_) => Duration::from_secs(60),
        };

        let credentials_file = PathBuf::from(
            std::env::var("PDB_CONFIG_FILE")
                .unwrap_or_else(|_| DEFAULT_CREDENTIALS_FILE.to_string()),
        );

        Ok(Self {
            database_url: SecretString::from(required_var("DATABASE_URL")?),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            otel_endpoint: std::env::var("OTEL_ENDPOINT").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            credentials_file,
            cisco_api_base_url: std::env::var("CISCO_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_CISCO_API_BASE_URL.to_string()),
            cisco_token_url: std::env::var("CISCO_TOKEN_URL")
                .unwrap_or_else(|_| DEFAULT_CISCO_TOKEN_URL.to_string()),
            worker_liveness,
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("required environment variable {name} is not set")))
}
