use axum::extract::{Form, State};
use axum::Json;
use serde::Deserialize;

use super::AppState;
use crate::error::Result;
use crate::lifecycle::{self, BulkCheckReport, normalize_queries};

#[derive(Debug, Deserialize)]
pub struct BulkCheckForm {
    #[serde(default)]
    pub db_query: String,
}

/// Empty form: nothing checked yet.
pub async fn bulk_eol_check() -> Json<BulkCheckReport> {
    Json(BulkCheckReport::default())
}

pub async fn bulk_eol_check_post(
    State(state): State<AppState>,
    Form(form): Form<BulkCheckForm>,
) -> Result<Json<BulkCheckReport>> {
    let queries = normalize_queries(&form.db_query);
    let catalog = state.db.catalog_snapshot(&queries).await?;
    tracing::debug!(
        queries = queries.len(),
        products = catalog.record_count(),
        "catalog snapshot loaded"
    );
    Ok(Json(lifecycle::bulk_check(&catalog, &queries)))
}
