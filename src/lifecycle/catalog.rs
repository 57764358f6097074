//! Product catalog lookup.

use std::collections::HashMap;

use crate::model::ProductRecord;

/// Exact-match lookup of products by `product_id`.
///
/// Implementations must return matches in a stable order: the first record
/// returned decides the lifecycle state of a product id in a bulk check.
pub trait Catalog {
    fn lookup(&self, product_id: &str) -> &[ProductRecord];
}

/// In-memory catalog, usually loaded from the database for one bulk check.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    by_product_id: HashMap<String, Vec<ProductRecord>>,
}

impl CatalogSnapshot {
    /// Build a snapshot. Records sharing a `product_id` keep their input order.
    pub fn from_records(records: impl IntoIterator<Item = ProductRecord>) -> Self {
        let mut by_product_id: HashMap<String, Vec<ProductRecord>> = HashMap::new();
        for record in records {
            by_product_id
                .entry(record.product_id.clone())
                .or_default()
                .push(record);
        }
        Self { by_product_id }
    }

    /// Number of product records held.
    pub fn record_count(&self) -> usize {
        self.by_product_id.values().map(Vec::len).sum()
    }
}

impl Catalog for CatalogSnapshot {
    fn lookup(&self, product_id: &str) -> &[ProductRecord] {
        self.by_product_id
            .get(product_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
