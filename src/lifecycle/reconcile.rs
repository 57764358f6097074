//! Classification of bulk-check queries against the catalog.
//!
//! Each query either contributes matched products to the statistics, is
//! recorded as skipped, or both: a query whose matches include at least one
//! product without an EoL announcement is reported as skipped even though
//! its products are still classified.
//!
//! The lifecycle state of a product id is fixed by the first matching record
//! seen in a run. Later records with the same product id only bump the
//! count, even if their announcement status differs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::catalog::Catalog;
use crate::model::DisplayProduct;

/// Lifecycle classification of a product id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    #[serde(rename = "EoS/EoL")]
    EndOfLife,
    #[serde(rename = "Not EoL")]
    NotEndOfLife,
    /// Synthetic entry for a query without any match.
    #[serde(rename = "Not found")]
    NotFound,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LifecycleState::EndOfLife => "EoS/EoL",
            LifecycleState::NotEndOfLife => "Not EoL",
            LifecycleState::NotFound => "Not found",
        };
        write!(f, "{s}")
    }
}

/// Per product id statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Date-normalized copy of the first record seen for this product id.
    pub product: DisplayProduct,
    /// Number of matched records sharing this product id.
    pub count: u32,
    pub state: LifecycleState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    #[serde(rename = "no EoL announcement found")]
    NoEolAnnouncement,
    #[serde(rename = "Not found in database")]
    NotFoundInDatabase,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SkipReason::NoEolAnnouncement => "no EoL announcement found",
            SkipReason::NotFoundInDatabase => "Not found in database",
        };
        write!(f, "{s}")
    }
}

/// A query that produced no (fully announced) result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedQuery {
    pub query: String,
    #[serde(rename = "result")]
    pub reason: SkipReason,
    /// Times this exact query text was skipped.
    pub count: u32,
}

/// Accumulated outcome of one bulk check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Matched products in first-seen order.
    pub results: Vec<DisplayProduct>,
    /// Keyed by product id; also holds `NotFound` entries keyed by query.
    pub statistics: IndexMap<String, ClassificationResult>,
    /// Keyed by query text.
    pub skipped: IndexMap<String, SkippedQuery>,
}

impl Reconciliation {
    fn skip(&mut self, query: &str, reason: SkipReason) {
        self.skipped
            .entry(query.to_string())
            .and_modify(|entry| entry.count += 1)
            .or_insert_with(|| SkippedQuery {
                query: query.to_string(),
                reason,
                count: 1,
            });
    }
}

/// Classify every query against the catalog.
///
/// `queries` should already be normalized; see
/// [`normalize_queries`](super::normalize_queries).
pub fn reconcile<C, Q>(catalog: &C, queries: &[Q]) -> Reconciliation
where
    C: Catalog + ?Sized,
    Q: AsRef<str>,
{
    let mut out = Reconciliation::default();

    for query in queries {
        let query = query.as_ref();
        let matches = catalog.lookup(query);

        if matches.is_empty() {
            tracing::debug!(query, "query not found in catalog");
            out.statistics
                .entry(query.to_string())
                .and_modify(|entry| entry.count += 1)
                .or_insert_with(|| ClassificationResult {
                    product: DisplayProduct::placeholder(query),
                    count: 1,
                    state: LifecycleState::NotFound,
                });
            out.skip(query, SkipReason::NotFoundInDatabase);
            continue;
        }

        let mut found_but_no_eol_announcement = false;

        for record in matches {
            if !record.has_eol_announcement() {
                found_but_no_eol_announcement = true;
            }

            match out.statistics.get_mut(&record.product_id) {
                Some(entry) => entry.count += 1,
                None => {
                    let product = record.normalize_dates();
                    let state = if record.has_eol_announcement() {
                        LifecycleState::EndOfLife
                    } else {
                        LifecycleState::NotEndOfLife
                    };
                    out.results.push(product.clone());
                    out.statistics.insert(
                        record.product_id.clone(),
                        ClassificationResult {
                            product,
                            count: 1,
                            state,
                        },
                    );
                }
            }
        }

        tracing::debug!(
            query,
            matches = matches.len(),
            found_but_no_eol_announcement,
            "query classified"
        );

        if found_but_no_eol_announcement {
            out.skip(query, SkipReason::NoEolAnnouncement);
        }
    }

    out
}
