//! Product, vendor and product list queries.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::lifecycle::CatalogSnapshot;
use crate::model::{LifecycleUpdate, ProductList, ProductRecord, Vendor};

const PRODUCT_COLUMNS: &str = "id, product_id, description, list_price, currency, vendor_id, \
     eol_ext_announcement_date, end_of_sale_date, end_of_support_date, \
     eol_reference_number, eol_reference_url, lc_state_sync, last_modified";

/// Vendor id every EoX API record is attributed to.
pub const CISCO_VENDOR_ID: i64 = 1;

impl super::Db {
    /// Load every product matching one of `product_ids` into a catalog.
    ///
    /// Records are ordered by primary key so repeated checks classify
    /// duplicate product ids the same way.
    pub async fn catalog_snapshot(&self, product_ids: &[String]) -> Result<CatalogSnapshot> {
        if product_ids.is_empty() {
            return Ok(CatalogSnapshot::default());
        }
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = ANY($1) ORDER BY id"
        ))
        .bind(product_ids)
        .fetch_all(self.pool())
        .await?;

        Ok(CatalogSnapshot::from_records(
            rows.into_iter().map(ProductRecord::from),
        ))
    }

    pub async fn find_vendor_product(
        &self,
        vendor_id: i64,
        product_id: &str,
    ) -> Result<Option<ProductRecord>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE vendor_id = $1 AND product_id = $2"
        ))
        .bind(vendor_id)
        .bind(product_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(ProductRecord::from))
    }

    pub async fn products_for_vendor(&self, vendor_id: i64) -> Result<Vec<ProductRecord>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE vendor_id = $1 ORDER BY product_id, id"
        ))
        .bind(vendor_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    /// Products of a vendor that carry at least one lifecycle date.
    pub async fn lifecycle_products_for_vendor(
        &self,
        vendor_id: i64,
    ) -> Result<Vec<ProductRecord>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE vendor_id = $1
             AND (eol_ext_announcement_date IS NOT NULL
                  OR end_of_sale_date IS NOT NULL
                  OR end_of_support_date IS NOT NULL)
             ORDER BY product_id, id"
        ))
        .bind(vendor_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    pub async fn products_for_list(&self, list_id: i64) -> Result<Vec<ProductRecord>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE product_id = ANY((SELECT product_ids FROM product_lists WHERE id = $1))
             ORDER BY product_id, id"
        ))
        .bind(list_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    /// Write vendor lifecycle dates onto an existing product.
    pub async fn apply_lifecycle_update(&self, id: i64, update: &LifecycleUpdate) -> Result<()> {
        let rows_affected = sqlx::query(
            "UPDATE products SET
                description = COALESCE($2, description),
                eol_ext_announcement_date = $3,
                end_of_sale_date = $4,
                end_of_support_date = $5,
                eol_reference_number = $6,
                eol_reference_url = $7,
                lc_state_sync = TRUE,
                last_modified = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&update.description)
        .bind(update.eol_ext_announcement_date)
        .bind(update.end_of_sale_date)
        .bind(update.end_of_support_date)
        .bind(&update.eol_reference_number)
        .bind(&update.eol_reference_url)
        .execute(self.pool())
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(Error::NotFound(format!("product {id}")));
        }
        Ok(())
    }

    /// Create a product from vendor lifecycle data. Returns the new row id.
    pub async fn create_product_from_lifecycle(
        &self,
        vendor_id: i64,
        update: &LifecycleUpdate,
    ) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO products (product_id, description, vendor_id,
                eol_ext_announcement_date, end_of_sale_date, end_of_support_date,
                eol_reference_number, eol_reference_url, lc_state_sync)
             VALUES ($1, COALESCE($2, ''), $3, $4, $5, $6, $7, $8, TRUE)
             RETURNING id",
        )
        .bind(&update.product_id)
        .bind(&update.description)
        .bind(vendor_id)
        .bind(update.eol_ext_announcement_date)
        .bind(update.end_of_sale_date)
        .bind(update.end_of_support_date)
        .bind(&update.eol_reference_number)
        .bind(&update.eol_reference_url)
        .fetch_one(self.pool())
        .await?;
        Ok(row.0)
    }

    pub async fn list_vendors(&self) -> Result<Vec<Vendor>> {
        let rows: Vec<(i64, String)> = sqlx::query_as("SELECT id, name FROM vendors ORDER BY id")
            .fetch_all(self.pool())
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| Vendor { id, name })
            .collect())
    }

    pub async fn list_product_lists(&self) -> Result<Vec<ProductList>> {
        let rows: Vec<(i64, String, String, Vec<String>)> = sqlx::query_as(
            "SELECT id, product_list_name, description, product_ids
             FROM product_lists ORDER BY product_list_name",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows
            .into_iter()
            .map(
                |(id, product_list_name, description, product_ids)| ProductList {
                    id,
                    product_list_name,
                    description,
                    product_ids,
                },
            )
            .collect())
    }
}

/// Internal row type for sqlx::FromRow.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    product_id: String,
    description: String,
    list_price: Option<f64>,
    currency: String,
    vendor_id: Option<i64>,
    eol_ext_announcement_date: Option<NaiveDate>,
    end_of_sale_date: Option<NaiveDate>,
    end_of_support_date: Option<NaiveDate>,
    eol_reference_number: Option<String>,
    eol_reference_url: Option<String>,
    lc_state_sync: bool,
    last_modified: DateTime<Utc>,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            description: row.description,
            list_price: row.list_price,
            currency: row.currency,
            vendor_id: row.vendor_id,
            eol_ext_announcement_date: row.eol_ext_announcement_date,
            end_of_sale_date: row.end_of_sale_date,
            end_of_support_date: row.end_of_support_date,
            eol_reference_number: row.eol_reference_number,
            eol_reference_url: row.eol_reference_url,
            lc_state_sync: row.lc_state_sync,
            last_modified: row.last_modified,
        }
    }
}
