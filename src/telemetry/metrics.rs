//! Metric instrument factories for productdb-rs.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"productdb-rs"` meter.

use opentelemetry::metrics::{Counter, Histogram, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("productdb-rs")
}

/// Counter: bulk EoL checks executed.
/// Labels: `result` ("ok" | "empty").
pub fn bulk_checks() -> Counter<u64> {
    meter()
        .u64_counter("productdb.bulk_check.runs")
        .with_description("Number of bulk EoL checks")
        .build()
}

/// Counter: normalized queries submitted to bulk checks.
pub fn bulk_check_queries() -> Counter<u64> {
    meter()
        .u64_counter("productdb.bulk_check.queries")
        .with_description("Number of queries evaluated by bulk EoL checks")
        .build()
}

/// Counter: queue-level operations (create, send, read, archive, delete).
/// Labels: `queue`, `operation`.
pub fn queue_operations() -> Counter<u64> {
    meter()
        .u64_counter("productdb.queue.operations")
        .with_description("Number of queue operations")
        .build()
}

/// Counter: EoX records applied to the product table.
/// Labels: `action` ("created" | "updated" | "skipped" | "blacklisted").
pub fn eox_records() -> Counter<u64> {
    meter()
        .u64_counter("productdb.eox.records")
        .with_description("EoX records processed by the sync")
        .build()
}

/// Counter: Cisco API calls.
/// Labels: `endpoint`, `result` ("ok" | "connection_failed" | "invalid_credentials" | "failed").
pub fn cisco_api_calls() -> Counter<u64> {
    meter()
        .u64_counter("productdb.cisco_api.calls")
        .with_description("Number of Cisco API calls")
        .build()
}

/// Histogram: operation duration in milliseconds.
/// Labels: `operation`.
pub fn operation_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("productdb.operation.duration_ms")
        .with_description("Operation duration in milliseconds")
        .with_unit("ms")
        .build()
}
