//! Client credential storage.
//!
//! Credentials live in a small TOML file next to the deployment rather than
//! in the database:
//!
//! ```toml
//! [cisco_api]
//! client_id = "..."
//! client_secret = "..."
//! ```

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::CiscoApiError;
use crate::config::secrets::secrets_equal;

/// Value stored when no real credentials are configured.
pub const PLACEHOLDER_CREDENTIAL: &str = "PlsChgMe";

#[derive(Debug)]
pub struct CiscoApiCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
}

impl CiscoApiCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
        }
    }

    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_CREDENTIAL, PLACEHOLDER_CREDENTIAL)
    }

    pub fn same_as(&self, other: &CiscoApiCredentials) -> bool {
        self.client_id == other.client_id && secrets_equal(&self.client_secret, &other.client_secret)
    }
}

#[derive(Deserialize)]
struct CredentialFile {
    cisco_api: StoredCredentials,
}

#[derive(Deserialize)]
struct StoredCredentials {
    client_id: String,
    client_secret: String,
}

/// Serialized form; the secret is exposed only while writing the file.
#[derive(Serialize)]
struct CredentialFileOut<'a> {
    cisco_api: CredentialsOut<'a>,
}

#[derive(Serialize)]
struct CredentialsOut<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

/// TOML file holding the Cisco API client credentials.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load stored credentials. A missing file yields the placeholder pair.
    pub fn load(&self) -> Result<CiscoApiCredentials, CiscoApiError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CiscoApiCredentials::placeholder());
            }
            Err(e) => {
                return Err(CiscoApiError::CredentialStore(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )));
            }
        };
        let file: CredentialFile = toml::from_str(&content).map_err(|e| {
            CiscoApiError::CredentialStore(format!("bad credential file {}: {e}", self.path.display()))
        })?;
        Ok(CiscoApiCredentials::new(
            file.cisco_api.client_id,
            file.cisco_api.client_secret,
        ))
    }

    pub fn save(&self, credentials: &CiscoApiCredentials) -> Result<(), CiscoApiError> {
        let out = CredentialFileOut {
            cisco_api: CredentialsOut {
                client_id: &credentials.client_id,
                client_secret: credentials.client_secret.expose_secret(),
            },
        };
        let content = toml::to_string(&out)
            .map_err(|e| CiscoApiError::CredentialStore(format!("cannot encode credentials: {e}")))?;

        let io_error = |e: std::io::Error| {
            CiscoApiError::CredentialStore(format!("cannot write {}: {e}", self.path.display()))
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(&self.path, content).map_err(io_error)?;
        tracing::info!(path = %self.path.display(), "cisco api credentials saved");
        Ok(())
    }

    /// Replace stored credentials with the placeholder pair.
    pub fn reset(&self) -> Result<(), CiscoApiError> {
        self.save(&CiscoApiCredentials::placeholder())
    }
}
