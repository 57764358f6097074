//! Common settings and Cisco API settings.

use axum::extract::{Form, State};
use axum::response::Redirect;
use axum::Json;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::{AppState, BASE_PATH};
use crate::cisco::{CiscoApiClient, CiscoApiCredentials, CiscoApiError};
use crate::error::Result;
use crate::model::Settings;

#[derive(Debug, Deserialize)]
pub struct CommonSettingsForm {
    /// Checkbox: present when ticked.
    pub cisco_api_enabled: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CiscoApiSettingsForm {
    pub eox_auto_sync_auto_create_elements: Option<String>,
    pub eox_api_auto_sync_enabled: Option<String>,
    #[serde(default)]
    pub eox_api_queries: String,
    #[serde(default)]
    pub eox_api_blacklist: String,
    #[serde(default)]
    pub cisco_api_client_id: String,
    #[serde(default)]
    pub cisco_api_client_secret: String,
}

#[derive(Serialize)]
pub struct SettingsPage {
    pub settings: Settings,
}

#[derive(Serialize)]
pub struct CiscoApiSettingsPage {
    pub settings: Settings,
    /// Only shown while the API is enabled.
    pub cisco_api_client_id: Option<String>,
    pub cisco_api_client_secret: Option<String>,
}

fn checked(field: &Option<String>) -> bool {
    field.is_some()
}

pub async fn common(State(state): State<AppState>) -> Result<Json<SettingsPage>> {
    let settings = state.db.get_or_create_settings().await?;
    Ok(Json(SettingsPage { settings }))
}

pub async fn common_post(
    State(state): State<AppState>,
    Form(form): Form<CommonSettingsForm>,
) -> Result<Redirect> {
    let mut settings = state.db.get_or_create_settings().await?;
    settings.cisco_api_enabled = checked(&form.cisco_api_enabled);
    if !settings.cisco_api_enabled {
        state.credentials.reset()?;
        settings.disable_cisco_api();
    }
    state.db.save_settings(&settings).await?;
    tracing::info!(cisco_api_enabled = settings.cisco_api_enabled, "common settings saved");
    Ok(Redirect::to(&format!("{BASE_PATH}/settings/")))
}

pub async fn cisco_api(State(state): State<AppState>) -> Result<Json<CiscoApiSettingsPage>> {
    let settings = state.db.get_or_create_settings().await?;
    let (client_id, client_secret) = if settings.cisco_api_enabled {
        let credentials = state.credentials.load()?;
        (
            Some(credentials.client_id.clone()),
            Some(credentials.client_secret.expose_secret().to_string()),
        )
    } else {
        (None, None)
    };
    Ok(Json(CiscoApiSettingsPage {
        settings,
        cisco_api_client_id: client_id,
        cisco_api_client_secret: client_secret,
    }))
}

pub async fn cisco_api_post(
    State(state): State<AppState>,
    Form(form): Form<CiscoApiSettingsForm>,
) -> Result<Redirect> {
    let mut settings = state.db.get_or_create_settings().await?;
    settings.cisco_eox_api_auto_sync_auto_create_elements =
        checked(&form.eox_auto_sync_auto_create_elements);
    settings.cisco_eox_api_auto_sync_enabled = checked(&form.eox_api_auto_sync_enabled);
    settings.cisco_eox_api_auto_sync_queries = form.eox_api_queries;
    settings.eox_api_blacklist = form.eox_api_blacklist;

    let stored = state.credentials.load()?;
    let posted = CiscoApiCredentials::new(form.cisco_api_client_id, form.cisco_api_client_secret);

    // Verification only runs when the credentials changed.
    if !posted.same_as(&stored) {
        state.credentials.save(&posted)?;
        let outcome = if settings.demo_mode {
            tracing::warn!("demo mode enabled, skipping Hello API verification");
            Ok("Demo Mode".to_string())
        } else {
            verify_credentials(&state, posted).await
        };
        apply_verification(&mut settings, outcome);
    }

    state.db.save_settings(&settings).await?;
    Ok(Redirect::to(&format!("{BASE_PATH}/settings/cisco_api/")))
}

async fn verify_credentials(
    state: &AppState,
    credentials: CiscoApiCredentials,
) -> std::result::Result<String, CiscoApiError> {
    let client = CiscoApiClient::new(state.endpoints.clone(), credentials)?;
    client.hello().await?;
    Ok("successful connected".to_string())
}

/// Record the result of a credential check on the settings.
pub fn apply_verification(
    settings: &mut Settings,
    outcome: std::result::Result<String, CiscoApiError>,
) {
    match outcome {
        Ok(message) => {
            settings.cisco_api_credentials_successful_tested = true;
            settings.cisco_api_credentials_last_message = message;
        }
        Err(e) => {
            tracing::warn!(error = %e, "verification of client credentials failed");
            settings.cisco_api_credentials_successful_tested = false;
            settings.cisco_api_credentials_last_message = e.to_string();
        }
    }
}
