//! Page model handed to the bulk-check view.

use indexmap::IndexMap;
use serde::Serialize;

use super::reconcile::{ClassificationResult, Reconciliation, SkippedQuery};
use crate::model::DisplayProduct;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkCheckReport {
    /// Matched products, first-seen order.
    pub query_result: Vec<DisplayProduct>,
    pub result_stats: IndexMap<String, ClassificationResult>,
    pub skipped_queries: IndexMap<String, SkippedQuery>,
    /// True when nothing matched; the view shows an empty state instead of a table.
    pub query_no_result: bool,
}

impl BulkCheckReport {
    /// Number of matched products whose first record carries an announcement.
    pub fn eol_count(&self) -> usize {
        self.result_stats
            .values()
            .filter(|s| s.state == super::LifecycleState::EndOfLife)
            .count()
    }
}

impl From<Reconciliation> for BulkCheckReport {
    fn from(r: Reconciliation) -> Self {
        let query_no_result = r.results.is_empty();
        Self {
            query_result: r.results,
            result_stats: r.statistics,
            skipped_queries: r.skipped,
            query_no_result,
        }
    }
}
