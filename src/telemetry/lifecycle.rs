//! Span helpers for bulk checks and EoX sync tasks.

use tracing::Span;

/// Start a span for one bulk EoL check.
///
/// Outcome fields are declared empty and filled by
/// [`record_bulk_check_outcome`].
pub fn start_bulk_check_span(queries: usize) -> Span {
    tracing::info_span!(
        "lifecycle.bulk_check",
        "bulk_check.queries" = queries,
        "bulk_check.results" = tracing::field::Empty,
        "bulk_check.skipped" = tracing::field::Empty,
    )
}

pub fn record_bulk_check_outcome(span: &Span, results: usize, skipped: usize) {
    span.record("bulk_check.results", results);
    span.record("bulk_check.skipped", skipped);
}

/// Start a span for an EoX sync task taken from the queue.
pub fn start_sync_span(task_id: i64, queries: usize) -> Span {
    tracing::info_span!(
        "eox.sync",
        "sync.task_id" = task_id,
        "sync.queries" = queries,
        "sync.records" = tracing::field::Empty,
    )
}

pub fn record_sync_outcome(span: &Span, records: usize) {
    span.record("sync.records", records);
    span.in_scope(|| {
        tracing::info!(records, "sync_finished");
    });
}
