//! The single settings row.

use crate::error::Result;
use crate::model::Settings;
use crate::model::settings::SETTINGS_ID;

const SETTINGS_COLUMNS: &str = "id, cisco_api_enabled, cisco_eox_api_auto_sync_enabled, \
     cisco_eox_api_auto_sync_auto_create_elements, cisco_eox_api_auto_sync_queries, \
     eox_api_blacklist, cisco_api_credentials_successful_tested, \
     cisco_api_credentials_last_message, eox_api_sync_task_id, demo_mode";

impl super::Db {
    /// Fetch the settings row, creating it with defaults if missing.
    pub async fn get_or_create_settings(&self) -> Result<Settings> {
        let defaults = Settings::default();
        sqlx::query(
            "INSERT INTO settings (id, cisco_api_credentials_last_message)
             VALUES ($1, $2)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(SETTINGS_ID)
        .bind(&defaults.cisco_api_credentials_last_message)
        .execute(self.pool())
        .await?;

        let row: SettingsRow = sqlx::query_as(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM settings WHERE id = $1"
        ))
        .bind(SETTINGS_ID)
        .fetch_one(self.pool())
        .await?;
        Ok(row.into())
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        sqlx::query(
            "UPDATE settings SET
                cisco_api_enabled = $2,
                cisco_eox_api_auto_sync_enabled = $3,
                cisco_eox_api_auto_sync_auto_create_elements = $4,
                cisco_eox_api_auto_sync_queries = $5,
                eox_api_blacklist = $6,
                cisco_api_credentials_successful_tested = $7,
                cisco_api_credentials_last_message = $8,
                eox_api_sync_task_id = $9,
                demo_mode = $10
             WHERE id = $1",
        )
        .bind(settings.id)
        .bind(settings.cisco_api_enabled)
        .bind(settings.cisco_eox_api_auto_sync_enabled)
        .bind(settings.cisco_eox_api_auto_sync_auto_create_elements)
        .bind(&settings.cisco_eox_api_auto_sync_queries)
        .bind(&settings.eox_api_blacklist)
        .bind(settings.cisco_api_credentials_successful_tested)
        .bind(&settings.cisco_api_credentials_last_message)
        .bind(&settings.eox_api_sync_task_id)
        .bind(settings.demo_mode)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Remember the task handle of the most recently queued sync.
    pub async fn record_sync_task(&self, task_id: i64) -> Result<()> {
        self.get_or_create_settings().await?;
        sqlx::query("UPDATE settings SET eox_api_sync_task_id = $2 WHERE id = $1")
            .bind(SETTINGS_ID)
            .bind(task_id.to_string())
            .execute(self.pool())
            .await?;
        Ok(())
    }
}

/// Internal row type for sqlx::FromRow.
#[derive(sqlx::FromRow)]
struct SettingsRow {
    id: i32,
    cisco_api_enabled: bool,
    cisco_eox_api_auto_sync_enabled: bool,
    cisco_eox_api_auto_sync_auto_create_elements: bool,
    cisco_eox_api_auto_sync_queries: String,
    eox_api_blacklist: String,
    cisco_api_credentials_successful_tested: bool,
    cisco_api_credentials_last_message: String,
    eox_api_sync_task_id: Option<String>,
    demo_mode: bool,
}

impl From<SettingsRow> for Settings {
    fn from(row: SettingsRow) -> Self {
        Self {
            id: row.id,
            cisco_api_enabled: row.cisco_api_enabled,
            cisco_eox_api_auto_sync_enabled: row.cisco_eox_api_auto_sync_enabled,
            cisco_eox_api_auto_sync_auto_create_elements: row
                .cisco_eox_api_auto_sync_auto_create_elements,
            cisco_eox_api_auto_sync_queries: row.cisco_eox_api_auto_sync_queries,
            eox_api_blacklist: row.eox_api_blacklist,
            cisco_api_credentials_successful_tested: row.cisco_api_credentials_successful_tested,
            cisco_api_credentials_last_message: row.cisco_api_credentials_last_message,
            eox_api_sync_task_id: row.eox_api_sync_task_id,
            demo_mode: row.demo_mode,
        }
    }
}
