//! Bulk end-of-life check.
//!
//! Raw user input is normalized into queries, each query is looked up in a
//! [`Catalog`], and the matches are folded into per-product statistics and
//! per-query skip reasons. [`bulk_check`] runs the whole pipeline.

pub mod catalog;
pub mod normalize;
pub mod reconcile;
pub mod report;

pub use catalog::{Catalog, CatalogSnapshot};
pub use normalize::normalize_queries;
pub use reconcile::{
    ClassificationResult, LifecycleState, Reconciliation, SkipReason, SkippedQuery, reconcile,
};
pub use report::BulkCheckReport;

use crate::telemetry::{lifecycle as spans, metrics};
use opentelemetry::KeyValue;

/// Reconcile already-normalized queries and assemble the report.
pub fn bulk_check<C, Q>(catalog: &C, queries: &[Q]) -> BulkCheckReport
where
    C: Catalog + ?Sized,
    Q: AsRef<str>,
{
    let span = spans::start_bulk_check_span(queries.len());
    let started = std::time::Instant::now();

    let report = span.in_scope(|| BulkCheckReport::from(reconcile(catalog, queries)));

    spans::record_bulk_check_outcome(
        &span,
        report.query_result.len(),
        report.skipped_queries.len(),
    );
    metrics::bulk_checks().add(
        1,
        &[KeyValue::new(
            "result",
            if report.query_no_result { "empty" } else { "ok" },
        )],
    );
    metrics::bulk_check_queries().add(queries.len() as u64, &[]);
    metrics::operation_duration_ms().record(
        started.elapsed().as_secs_f64() * 1000.0,
        &[KeyValue::new("operation", "bulk_check")],
    );

    report
}
