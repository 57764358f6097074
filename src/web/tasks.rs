//! Crawler overview, test tools and manual sync scheduling.

use axum::extract::{Form, Query, State};
use axum::response::Redirect;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{AppState, BASE_PATH};
use crate::cisco::CiscoApiError;
use crate::error::{Error, Result};
use crate::model::{Settings, WorkerStatus};
use crate::worker;

#[derive(Serialize)]
pub struct CrawlerPage {
    pub settings: Settings,
    pub worker_status: WorkerStatus,
    pub worker_status_message: &'static str,
}

#[derive(Serialize)]
pub struct TestToolsPage {
    pub settings: Settings,
    pub worker_status: WorkerStatus,
    pub worker_status_message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_executed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eox_api_update_records: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct TestToolsForm {
    pub sync_cisco_eox_states_now: Option<String>,
    pub sync_cisco_eox_states_query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SyncNowParams {
    pub redirect_url: Option<String>,
}

/// A test tools query after validation.
#[derive(Debug, PartialEq, Eq)]
pub enum TestQuery<'a> {
    Run(&'a str),
    /// Not executed; the message is shown instead of results.
    Rejected(String),
}

/// Only single-token queries are sent to the EoX API.
pub fn validate_test_query(query: &str) -> TestQuery<'_> {
    if query.is_empty() {
        TestQuery::Rejected("Please specify a valid query".to_string())
    } else if query.contains(' ') {
        TestQuery::Rejected(format!("Invalid query '{query}': not executed"))
    } else {
        TestQuery::Run(query)
    }
}

/// Turn a failed one-off sync into the line shown on the page.
fn execution_failure(e: &Error) -> String {
    match e {
        Error::CiscoApi(CiscoApiError::ConnectionFailed(msg)) => {
            format!("Cannot contact Cisco API, error message:\n{msg}")
        }
        Error::CiscoApi(api @ CiscoApiError::ApiCallFailed(_)) => api.to_string(),
        other => format!("execution failed: {other}"),
    }
}

async fn worker_status(state: &AppState) -> Result<WorkerStatus> {
    let workers = state.db.list_workers().await?;
    Ok(WorkerStatus::classify(
        &workers,
        Utc::now(),
        state.worker_liveness,
    ))
}

pub async fn crawler_overview(State(state): State<AppState>) -> Result<Json<CrawlerPage>> {
    let settings = state.db.get_or_create_settings().await?;
    let status = worker_status(&state).await?;
    Ok(Json(CrawlerPage {
        settings,
        worker_status: status,
        worker_status_message: status.message(),
    }))
}

async fn test_tools_page(
    state: &AppState,
    query_executed: Option<String>,
    records: Option<Vec<String>>,
) -> Result<TestToolsPage> {
    let settings = state.db.get_or_create_settings().await?;
    let status = worker_status(state).await?;
    Ok(TestToolsPage {
        settings,
        worker_status: status,
        worker_status_message: status.message(),
        query_executed,
        eox_api_update_records: records,
    })
}

pub async fn test_tools(State(state): State<AppState>) -> Result<Json<TestToolsPage>> {
    Ok(Json(test_tools_page(&state, None, None).await?))
}

pub async fn test_tools_post(
    State(state): State<AppState>,
    Form(form): Form<TestToolsForm>,
) -> Result<Json<TestToolsPage>> {
    let (Some(_), Some(query)) = (form.sync_cisco_eox_states_now, form.sync_cisco_eox_states_query)
    else {
        return Ok(Json(test_tools_page(&state, None, None).await?));
    };

    let (executed, records) = match validate_test_query(&query) {
        TestQuery::Rejected(message) => (None, vec![message]),
        TestQuery::Run(q) => {
            let records =
                match worker::run_single_query(&state.db, &state.endpoints, &state.credentials, q)
                    .await
                {
                    Ok(lines) => lines,
                    Err(e) => {
                        tracing::debug!(error = %e, query = q, "test tools sync failed");
                        vec![execution_failure(&e)]
                    }
                };
            (Some(q.to_string()), records)
        }
    };

    Ok(Json(test_tools_page(&state, executed, Some(records)).await?))
}

/// Only same-site paths are followed; anything else falls back to the
/// settings page.
pub fn redirect_target(requested: Option<&str>) -> String {
    match requested {
        Some(url) if url.starts_with('/') && !url.starts_with("//") => url.to_string(),
        _ => format!("{BASE_PATH}/settings/"),
    }
}

pub async fn schedule_sync_now(
    State(state): State<AppState>,
    Query(params): Query<SyncNowParams>,
) -> Result<Redirect> {
    let task_id = state.db.enqueue_sync_task("web").await?;
    state.db.record_sync_task(task_id).await?;
    Ok(Redirect::to(&redirect_target(params.redirect_url.as_deref())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_lines_follow_error_kind() {
        let e = Error::CiscoApi(CiscoApiError::ConnectionFailed("refused".to_string()));
        assert_eq!(
            execution_failure(&e),
            "Cannot contact Cisco API, error message:\nrefused"
        );

        let e = Error::CiscoApi(CiscoApiError::ApiCallFailed("500".to_string()));
        assert_eq!(execution_failure(&e), "Cisco API call failed: 500");

        let e = Error::Other("Cisco API access not enabled".to_string());
        assert_eq!(
            execution_failure(&e),
            "execution failed: Cisco API access not enabled"
        );
    }

    #[test]
    fn redirects_stay_on_site() {
        assert_eq!(redirect_target(None), "/productdb/settings/");
        assert_eq!(
            redirect_target(Some("/productdb/settings/crawler/")),
            "/productdb/settings/crawler/"
        );
        assert_eq!(
            redirect_target(Some("https://evil.example/")),
            "/productdb/settings/"
        );
        assert_eq!(redirect_target(Some("//evil.example/")), "/productdb/settings/");
    }
}
