//! Cisco API console access: client credentials, the Hello API used to
//! verify them, and the EoX API that feeds product lifecycle dates.

pub mod client;
pub mod credentials;
pub mod eox;
pub mod sync;

pub use client::{ApiEndpoints, CiscoApiClient};
pub use credentials::{CiscoApiCredentials, CredentialStore};
pub use eox::EoxRecord;
pub use sync::update_cisco_eox_database;

use thiserror::Error;

/// Failures talking to the Cisco API.
#[derive(Debug, Error)]
pub enum CiscoApiError {
    /// The API could not be reached at all.
    #[error("cannot contact Cisco API: {0}")]
    ConnectionFailed(String),

    #[error("invalid client credentials: {0}")]
    InvalidClientCredentials(String),

    /// The API answered, but not with something usable.
    #[error("Cisco API call failed: {0}")]
    ApiCallFailed(String),

    #[error("credential store error: {0}")]
    CredentialStore(String),
}

impl CiscoApiError {
    /// Short label used in metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CiscoApiError::ConnectionFailed(_) => "connection_failed",
            CiscoApiError::InvalidClientCredentials(_) => "invalid_credentials",
            CiscoApiError::ApiCallFailed(_) => "failed",
            CiscoApiError::CredentialStore(_) => "credential_store",
        }
    }
}

impl From<reqwest::Error> for CiscoApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            CiscoApiError::ConnectionFailed(e.to_string())
        } else {
            CiscoApiError::ApiCallFailed(e.to_string())
        }
    }
}
