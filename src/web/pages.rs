use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct StaticPage {
    pub page: &'static str,
    pub title: &'static str,
    pub version: &'static str,
}

pub async fn home() -> Json<StaticPage> {
    Json(StaticPage {
        page: "home",
        title: "Product Database",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn about() -> Json<StaticPage> {
    Json(StaticPage {
        page: "about",
        title: "About the Product Database",
        version: env!("CARGO_PKG_VERSION"),
    })
}
