//! Applies EoX API records to the product table.

use super::CiscoApiClient;
use crate::db::Db;
use crate::db::products::CISCO_VENDOR_ID;
use crate::error::{Error, Result};
use crate::model::{LifecycleUpdate, ProductRecord, Settings};
use crate::telemetry::metrics;
use opentelemetry::KeyValue;

/// What to do with one EoX record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Blacklisted,
    Update(i64),
    Create,
    /// Unknown product and auto-create is off.
    Skip,
}

impl SyncAction {
    fn label(self) -> &'static str {
        match self {
            SyncAction::Blacklisted => "blacklisted",
            SyncAction::Update(_) => "updated",
            SyncAction::Create => "created",
            SyncAction::Skip => "skipped",
        }
    }
}

/// Decide how a record is applied given the current settings and the
/// matching product, if one exists.
pub fn plan_sync_action(
    settings: &Settings,
    update: &LifecycleUpdate,
    existing: Option<&ProductRecord>,
) -> SyncAction {
    if settings.is_blacklisted(&update.product_id) {
        SyncAction::Blacklisted
    } else if let Some(product) = existing {
        SyncAction::Update(product.id)
    } else if settings.cisco_eox_api_auto_sync_auto_create_elements {
        SyncAction::Create
    } else {
        SyncAction::Skip
    }
}

fn status_line(product_id: &str, action: SyncAction) -> String {
    match action {
        SyncAction::Blacklisted => format!("{product_id}: blacklisted, not updated"),
        SyncAction::Update(_) => format!("{product_id}: lifecycle data updated"),
        SyncAction::Create => format!("{product_id}: product created"),
        SyncAction::Skip => format!("{product_id}: not in database, skipped"),
    }
}

/// Run the given EoX queries and write the results to the database.
///
/// Returns one human readable line per processed record. Fails if the Cisco
/// API is disabled or any API call fails.
pub async fn update_cisco_eox_database(
    db: &Db,
    client: &CiscoApiClient,
    settings: &Settings,
    queries: &[String],
) -> Result<Vec<String>> {
    if !settings.cisco_api_enabled {
        return Err(Error::Other("Cisco API access not enabled".to_string()));
    }

    let mut lines = Vec::new();
    for query in queries {
        let records = client.query_eox(query).await?;

        for record in &records {
            let Some(update) = record.to_lifecycle_update() else {
                if let Some(err) = &record.error {
                    lines.push(format!("{query}: {}", err.error_description));
                }
                continue;
            };

            let existing = db
                .find_vendor_product(CISCO_VENDOR_ID, &update.product_id)
                .await?;
            let action = plan_sync_action(settings, &update, existing.as_ref());

            match action {
                SyncAction::Update(id) => db.apply_lifecycle_update(id, &update).await?,
                SyncAction::Create => {
                    db.create_product_from_lifecycle(CISCO_VENDOR_ID, &update)
                        .await?;
                }
                SyncAction::Blacklisted | SyncAction::Skip => {}
            }

            metrics::eox_records().add(1, &[KeyValue::new("action", action.label())]);
            tracing::debug!(product_id = %update.product_id, action = action.label(), "eox record applied");
            lines.push(status_line(&update.product_id, action));
        }
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(product_id: &str) -> LifecycleUpdate {
        LifecycleUpdate {
            product_id: product_id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn blacklist_wins_over_everything() {
        let settings = Settings {
            eox_api_blacklist: "A-1".to_string(),
            cisco_eox_api_auto_sync_auto_create_elements: true,
            ..Settings::default()
        };
        let existing = ProductRecord::new(4, "A-1");
        assert_eq!(
            plan_sync_action(&settings, &update("A-1"), Some(&existing)),
            SyncAction::Blacklisted
        );
    }

    #[test]
    fn unknown_products_need_auto_create() {
        let mut settings = Settings::default();
        assert_eq!(plan_sync_action(&settings, &update("B-2"), None), SyncAction::Skip);

        settings.cisco_eox_api_auto_sync_auto_create_elements = true;
        assert_eq!(plan_sync_action(&settings, &update("B-2"), None), SyncAction::Create);
    }

    #[test]
    fn known_products_are_updated() {
        let existing = ProductRecord::new(9, "C-3");
        assert_eq!(
            plan_sync_action(&Settings::default(), &update("C-3"), Some(&existing)),
            SyncAction::Update(9)
        );
        assert_eq!(
            status_line("C-3", SyncAction::Update(9)),
            "C-3: lifecycle data updated"
        );
    }
}
