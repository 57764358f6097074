//! Application-wide settings record.
//!
//! Exactly one row exists (id 0). It is created with these defaults the
//! first time anything reads it.

use serde::{Deserialize, Serialize};

pub const SETTINGS_ID: i32 = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub id: i32,
    pub cisco_api_enabled: bool,
    pub cisco_eox_api_auto_sync_enabled: bool,
    pub cisco_eox_api_auto_sync_auto_create_elements: bool,
    /// Whitespace separated EoX queries run by the sync task.
    pub cisco_eox_api_auto_sync_queries: String,
    /// Product ids the sync must never touch, separated by `;` or newlines.
    pub eox_api_blacklist: String,
    pub cisco_api_credentials_successful_tested: bool,
    pub cisco_api_credentials_last_message: String,
    pub eox_api_sync_task_id: Option<String>,
    pub demo_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id: SETTINGS_ID,
            cisco_api_enabled: false,
            cisco_eox_api_auto_sync_enabled: false,
            cisco_eox_api_auto_sync_auto_create_elements: false,
            cisco_eox_api_auto_sync_queries: String::new(),
            eox_api_blacklist: String::new(),
            cisco_api_credentials_successful_tested: false,
            cisco_api_credentials_last_message: "not tested".to_string(),
            eox_api_sync_task_id: None,
            demo_mode: false,
        }
    }
}

impl Settings {
    /// Turn the Cisco API off and forget everything configured for it.
    ///
    /// Stored client credentials are reset separately by the caller.
    pub fn disable_cisco_api(&mut self) {
        self.cisco_api_enabled = false;
        self.cisco_eox_api_auto_sync_enabled = false;
        self.eox_api_blacklist.clear();
        self.cisco_eox_api_auto_sync_queries.clear();
        self.cisco_api_credentials_last_message = "not tested".to_string();
        self.cisco_api_credentials_successful_tested = false;
    }

    /// Configured auto-sync queries, one per whitespace separated token.
    pub fn auto_sync_queries(&self) -> Vec<String> {
        self.cisco_eox_api_auto_sync_queries
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    pub fn is_blacklisted(&self, product_id: &str) -> bool {
        self.eox_api_blacklist
            .split([';', '\n', '\r', ','])
            .map(str::trim)
            .any(|entry| !entry.is_empty() && entry == product_id)
    }
}
