//! HTTP layer. Every view answers with a JSON page model; rendering is left
//! to whatever sits in front of it.

mod browse;
mod bulk;
mod error;
mod health;
mod pages;
mod settings;
mod tasks;

pub use tasks::{TestQuery, validate_test_query};

use axum::Router;
use axum::routing::get;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::cisco::{ApiEndpoints, CredentialStore};
use crate::config::Config;
use crate::db::Db;

/// Prefix every view is mounted under.
pub const BASE_PATH: &str = "/productdb";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub endpoints: ApiEndpoints,
    pub credentials: CredentialStore,
    pub worker_liveness: Duration,
}

impl AppState {
    pub fn new(db: Db, config: &Config) -> Self {
        Self {
            db,
            endpoints: ApiEndpoints::from(config),
            credentials: CredentialStore::new(config.credentials_file.clone()),
            worker_liveness: config.worker_liveness,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let views = Router::new()
        .route("/about/", get(pages::about))
        .route(
            "/browse/product_lists/",
            get(browse::product_lists).post(browse::product_lists_post),
        )
        .route(
            "/browse/vendor_products/",
            get(browse::vendor_products).post(browse::vendor_products_post),
        )
        .route(
            "/lifecycle/",
            get(browse::lifecycle).post(browse::lifecycle_post),
        )
        .route(
            "/bulk_eol_check/",
            get(bulk::bulk_eol_check).post(bulk::bulk_eol_check_post),
        )
        .route(
            "/settings/",
            get(settings::common).post(settings::common_post),
        )
        .route(
            "/settings/cisco_api/",
            get(settings::cisco_api).post(settings::cisco_api_post),
        )
        .route("/settings/crawler/", get(tasks::crawler_overview))
        .route(
            "/settings/crawler/sync_now/",
            get(tasks::schedule_sync_now),
        )
        .route(
            "/settings/testtools/",
            get(tasks::test_tools).post(tasks::test_tools_post),
        );

    Router::new()
        .route(&format!("{BASE_PATH}/"), get(pages::home))
        .nest(BASE_PATH, views)
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(state: AppState, bind_addr: &str) -> crate::error::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %bind_addr, "http server listening");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("http server shutting down");
        })
        .await?;
    Ok(())
}
