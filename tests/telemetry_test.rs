//! Integration tests for telemetry initialization and span helpers.

#[test]
fn telemetry_initializes_without_endpoint() {
    // Note: tracing subscriber can only be set once per process.
    // Using try_init() in the implementation avoids panics if another
    // test already initialized a subscriber.
    let config = productdb_rs::telemetry::TelemetryConfig {
        endpoint: None,
        service_name: "productdb-test".to_string(),
        log_level: "debug".to_string(),
    };
    // This may return Err if a global subscriber was already set by
    // another test in this process; that is acceptable.
    if let Ok(guard) = productdb_rs::telemetry::init_telemetry(config) {
        assert!(!guard.is_exporting());
        guard.force_flush();
    }
}

#[test]
fn bulk_check_span_records_outcome() {
    let span = productdb_rs::telemetry::lifecycle::start_bulk_check_span(3);
    productdb_rs::telemetry::lifecycle::record_bulk_check_outcome(&span, 2, 1);
}

#[test]
fn sync_span_records_outcome() {
    let span = productdb_rs::telemetry::lifecycle::start_sync_span(42, 2);
    productdb_rs::telemetry::lifecycle::record_sync_outcome(&span, 17);
}
