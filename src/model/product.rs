//! Product, vendor and product list types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Display format for every lifecycle date shown to users.
pub const DISPLAY_DATE_FORMAT: &str = "%Y-%m-%d";

/// A product row as stored in the database.
///
/// `product_id` is not unique: the same identifier can exist once per vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
    pub product_id: String,
    pub description: String,
    pub list_price: Option<f64>,
    pub currency: String,
    pub vendor_id: Option<i64>,

    /// Date the vendor announced end-of-life. Presence alone decides
    /// whether a product is classified as EoL.
    pub eol_ext_announcement_date: Option<NaiveDate>,
    pub end_of_sale_date: Option<NaiveDate>,
    pub end_of_support_date: Option<NaiveDate>,
    pub eol_reference_number: Option<String>,
    pub eol_reference_url: Option<String>,

    /// Set once the lifecycle dates were written by the EoX sync.
    pub lc_state_sync: bool,
    pub last_modified: DateTime<Utc>,
}

impl ProductRecord {
    /// Minimal record for a product id, everything else empty.
    pub fn new(id: i64, product_id: impl Into<String>) -> Self {
        Self {
            id,
            product_id: product_id.into(),
            description: String::new(),
            list_price: None,
            currency: "USD".to_string(),
            vendor_id: None,
            eol_ext_announcement_date: None,
            end_of_sale_date: None,
            end_of_support_date: None,
            eol_reference_number: None,
            eol_reference_url: None,
            lc_state_sync: false,
            last_modified: Utc::now(),
        }
    }

    pub fn announced(mut self, date: NaiveDate) -> Self {
        self.eol_ext_announcement_date = Some(date);
        self
    }

    pub fn has_eol_announcement(&self) -> bool {
        self.eol_ext_announcement_date.is_some()
    }

    /// Display-ready copy with all dates rendered as `YYYY-MM-DD`.
    pub fn normalize_dates(&self) -> DisplayProduct {
        DisplayProduct {
            id: Some(self.id),
            product_id: self.product_id.clone(),
            description: self.description.clone(),
            list_price: self.list_price,
            currency: Some(self.currency.clone()),
            vendor_id: self.vendor_id,
            eol_ext_announcement_date: format_date(self.eol_ext_announcement_date),
            end_of_sale_date: format_date(self.end_of_sale_date),
            end_of_support_date: format_date(self.end_of_support_date),
            eol_reference_number: self.eol_reference_number.clone(),
            eol_reference_url: self.eol_reference_url.clone(),
            last_modified: Some(self.last_modified.format(DISPLAY_DATE_FORMAT).to_string()),
        }
    }
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
}

/// A product prepared for display. Dates are strings; every field other
/// than `product_id` may be absent (placeholders for unknown queries).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayProduct {
    pub id: Option<i64>,
    pub product_id: String,
    pub description: String,
    pub list_price: Option<f64>,
    pub currency: Option<String>,
    pub vendor_id: Option<i64>,
    pub eol_ext_announcement_date: Option<String>,
    pub end_of_sale_date: Option<String>,
    pub end_of_support_date: Option<String>,
    pub eol_reference_number: Option<String>,
    pub eol_reference_url: Option<String>,
    pub last_modified: Option<String>,
}

impl DisplayProduct {
    /// Stand-in for a query that matched nothing.
    pub fn placeholder(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            ..Default::default()
        }
    }
}

/// Lifecycle data for one product as reported by the vendor API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifecycleUpdate {
    pub product_id: String,
    pub description: Option<String>,
    pub eol_ext_announcement_date: Option<NaiveDate>,
    pub end_of_sale_date: Option<NaiveDate>,
    pub end_of_support_date: Option<NaiveDate>,
    pub eol_reference_number: Option<String>,
    pub eol_reference_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: i64,
    pub name: String,
}

/// A named, curated set of product ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductList {
    pub id: i64,
    pub product_list_name: String,
    pub description: String,
    pub product_ids: Vec<String>,
}
