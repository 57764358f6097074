//! Product browsing by list, by vendor and by lifecycle data.

use axum::extract::{Form, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::{Error, Result};
use crate::model::{DisplayProduct, ProductList, Vendor};

/// Product list preselected when nothing was posted.
pub const DEFAULT_PRODUCT_LIST: &str = "Cisco Catalyst 2960X";
/// Vendor preselected when nothing was posted.
pub const DEFAULT_VENDOR: &str = "Cisco Systems";

#[derive(Debug, Deserialize)]
pub struct ProductListForm {
    #[serde(default)]
    pub product_list_selection: String,
}

#[derive(Debug, Deserialize)]
pub struct VendorForm {
    #[serde(default)]
    pub vendor_selection: String,
}

#[derive(Serialize)]
pub struct ProductListPage {
    pub product_lists: Vec<ProductList>,
    pub selected_product_list: Option<i64>,
    pub products: Vec<DisplayProduct>,
}

#[derive(Serialize)]
pub struct VendorProductsPage {
    pub vendors: Vec<Vendor>,
    pub vendor_selection: Option<i64>,
    pub products: Vec<DisplayProduct>,
}

/// Parse a posted selection. Empty means "nothing selected".
pub fn parse_selection(raw: &str) -> Result<Option<i64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| Error::InvalidInput(format!("selection is not an id: {raw}")))
}

pub fn default_product_list(lists: &[ProductList]) -> Option<i64> {
    lists
        .iter()
        .find(|l| l.product_list_name == DEFAULT_PRODUCT_LIST)
        .map(|l| l.id)
}

pub fn default_vendor(vendors: &[Vendor]) -> Option<i64> {
    vendors
        .iter()
        .find(|v| v.name == DEFAULT_VENDOR)
        .map(|v| v.id)
}

async fn product_list_page(state: &AppState, posted: Option<&str>) -> Result<ProductListPage> {
    let product_lists = state.db.list_product_lists().await?;
    let selected = match posted {
        Some(raw) => parse_selection(raw)?,
        None => default_product_list(&product_lists),
    };
    let products = match selected {
        Some(id) => display(state.db.products_for_list(id).await?),
        None => Vec::new(),
    };
    Ok(ProductListPage {
        product_lists,
        selected_product_list: selected,
        products,
    })
}

pub async fn product_lists(State(state): State<AppState>) -> Result<Json<ProductListPage>> {
    Ok(Json(product_list_page(&state, None).await?))
}

pub async fn product_lists_post(
    State(state): State<AppState>,
    Form(form): Form<ProductListForm>,
) -> Result<Json<ProductListPage>> {
    Ok(Json(
        product_list_page(&state, Some(&form.product_list_selection)).await?,
    ))
}

async fn vendor_page(
    state: &AppState,
    posted: Option<&str>,
    lifecycle_only: bool,
) -> Result<VendorProductsPage> {
    let vendors = state.db.list_vendors().await?;
    let selected = match posted {
        Some(raw) => parse_selection(raw)?,
        // The lifecycle view never preselects a vendor.
        None if lifecycle_only => None,
        None => default_vendor(&vendors),
    };
    let products = match (selected, lifecycle_only) {
        (Some(id), true) => display(state.db.lifecycle_products_for_vendor(id).await?),
        (Some(id), false) => display(state.db.products_for_vendor(id).await?),
        (None, _) => Vec::new(),
    };
    Ok(VendorProductsPage {
        vendors,
        vendor_selection: selected,
        products,
    })
}

pub async fn vendor_products(State(state): State<AppState>) -> Result<Json<VendorProductsPage>> {
    Ok(Json(vendor_page(&state, None, false).await?))
}

pub async fn vendor_products_post(
    State(state): State<AppState>,
    Form(form): Form<VendorForm>,
) -> Result<Json<VendorProductsPage>> {
    Ok(Json(
        vendor_page(&state, Some(&form.vendor_selection), false).await?,
    ))
}

pub async fn lifecycle(State(state): State<AppState>) -> Result<Json<VendorProductsPage>> {
    Ok(Json(vendor_page(&state, None, true).await?))
}

pub async fn lifecycle_post(
    State(state): State<AppState>,
    Form(form): Form<VendorForm>,
) -> Result<Json<VendorProductsPage>> {
    Ok(Json(
        vendor_page(&state, Some(&form.vendor_selection), true).await?,
    ))
}

fn display(records: Vec<crate::model::ProductRecord>) -> Vec<DisplayProduct> {
    records.iter().map(|r| r.normalize_dates()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(id: i64, name: &str) -> ProductList {
        ProductList {
            id,
            product_list_name: name.to_string(),
            description: String::new(),
            product_ids: Vec::new(),
        }
    }

    #[test]
    fn preselects_known_defaults() {
        let lists = vec![list(3, "Nexus 9k"), list(5, "Cisco Catalyst 2960X")];
        assert_eq!(default_product_list(&lists), Some(5));
        assert_eq!(default_product_list(&lists[..1]), None);

        let vendors = vec![
            Vendor { id: 0, name: "unassigned".to_string() },
            Vendor { id: 1, name: "Cisco Systems".to_string() },
        ];
        assert_eq!(default_vendor(&vendors), Some(1));
    }

    #[test]
    fn selection_parsing() {
        assert_eq!(parse_selection("").unwrap(), None);
        assert_eq!(parse_selection(" 12 ").unwrap(), Some(12));
        assert!(matches!(parse_selection("abc"), Err(Error::InvalidInput(_))));
    }
}
