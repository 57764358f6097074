//! Bulk EoL check against an in-memory catalog.

use chrono::NaiveDate;
use productdb_rs::lifecycle::{
    BulkCheckReport, CatalogSnapshot, LifecycleState, SkipReason, bulk_check, normalize_queries,
};
use productdb_rs::model::ProductRecord;

fn announced(id: i64, product_id: &str) -> ProductRecord {
    ProductRecord::new(id, product_id).announced(NaiveDate::from_ymd_opt(2016, 1, 5).unwrap())
}

fn check(catalog: &CatalogSnapshot, raw: &str) -> BulkCheckReport {
    bulk_check(catalog, &normalize_queries(raw))
}

#[test]
fn repeated_query_without_announcement_and_unknown_query() {
    let catalog = CatalogSnapshot::from_records([ProductRecord::new(1, "ABC-123")]);
    let report = check(&catalog, "ABC-123\nABC-123\nXYZ-000");

    assert_eq!(report.query_result.len(), 1);
    assert_eq!(report.query_result[0].product_id, "ABC-123");
    assert!(!report.query_no_result);

    let stat = &report.result_stats["ABC-123"];
    assert_eq!(stat.count, 2);
    assert_eq!(stat.state, LifecycleState::NotEndOfLife);

    let skipped = &report.skipped_queries["ABC-123"];
    assert_eq!(skipped.reason, SkipReason::NoEolAnnouncement);
    assert_eq!(skipped.count, 2);

    let missing = &report.skipped_queries["XYZ-000"];
    assert_eq!(missing.reason, SkipReason::NotFoundInDatabase);
    assert_eq!(missing.count, 1);

    let placeholder = &report.result_stats["XYZ-000"];
    assert_eq!(placeholder.state, LifecycleState::NotFound);
    assert_eq!(placeholder.product.product_id, "XYZ-000");
    assert_eq!(placeholder.product.id, None);
}

#[test]
fn announced_product_is_end_of_life_without_skips() {
    let catalog = CatalogSnapshot::from_records([announced(1, "OLD-1")]);
    let report = check(&catalog, "OLD-1");

    let stat = &report.result_stats["OLD-1"];
    assert_eq!(stat.count, 1);
    assert_eq!(stat.state, LifecycleState::EndOfLife);
    assert_eq!(
        stat.product.eol_ext_announcement_date.as_deref(),
        Some("2016-01-05")
    );
    assert!(report.skipped_queries.is_empty());
    assert_eq!(report.eol_count(), 1);
}

#[test]
fn empty_input_reports_no_result() {
    let catalog = CatalogSnapshot::from_records([announced(1, "OLD-1")]);
    let report = check(&catalog, "");

    assert!(report.query_result.is_empty());
    assert!(report.result_stats.is_empty());
    assert!(report.skipped_queries.is_empty());
    assert!(report.query_no_result);
}

#[test]
fn duplicate_product_ids_keep_first_state() {
    let catalog =
        CatalogSnapshot::from_records([announced(1, "DUP-1"), ProductRecord::new(2, "DUP-1")]);
    let report = check(&catalog, "DUP-1");

    assert_eq!(report.query_result.len(), 1);
    assert_eq!(report.query_result[0].id, Some(1));

    let stat = &report.result_stats["DUP-1"];
    assert_eq!(stat.count, 2);
    assert_eq!(stat.state, LifecycleState::EndOfLife);

    let skipped = &report.skipped_queries["DUP-1"];
    assert_eq!(skipped.reason, SkipReason::NoEolAnnouncement);
    assert_eq!(skipped.count, 1);
}

#[test]
fn state_follows_catalog_order_not_announcement() {
    let catalog =
        CatalogSnapshot::from_records([ProductRecord::new(1, "DUP-1"), announced(2, "DUP-1")]);
    let report = check(&catalog, "DUP-1");

    assert_eq!(report.result_stats["DUP-1"].state, LifecycleState::NotEndOfLife);
    assert_eq!(report.eol_count(), 0);
}

#[test]
fn blank_lines_never_produce_entries() {
    let catalog = CatalogSnapshot::from_records([announced(1, "OLD-1")]);
    let plain = check(&catalog, "OLD-1\nMISSING");
    let padded = check(&catalog, "\n   \nOLD-1\r\n\t\n  MISSING  \n\n");

    assert_eq!(plain, padded);
    assert!(!padded.skipped_queries.contains_key(""));
    assert!(!padded.result_stats.contains_key(""));
}

#[test]
fn results_keep_first_encounter_order() {
    let catalog = CatalogSnapshot::from_records([
        announced(1, "C"),
        announced(2, "A"),
        ProductRecord::new(3, "B"),
    ]);
    let report = check(&catalog, "B\nC\nA\nB");

    let order: Vec<&str> = report
        .query_result
        .iter()
        .map(|p| p.product_id.as_str())
        .collect();
    assert_eq!(order, vec!["B", "C", "A"]);
    assert_eq!(report.result_stats["B"].count, 2);
    assert_eq!(report.skipped_queries["B"].count, 2);
}

#[test]
fn repeated_runs_are_identical() {
    let catalog = CatalogSnapshot::from_records([
        announced(1, "OLD-1"),
        ProductRecord::new(2, "NEW-1"),
    ]);
    let raw = "OLD-1\nNEW-1\nGONE\nOLD-1";
    assert_eq!(check(&catalog, raw), check(&catalog, raw));
}

#[test]
fn report_serializes_with_display_labels() {
    let catalog = CatalogSnapshot::from_records([ProductRecord::new(1, "ABC-123")]);
    let report = check(&catalog, "ABC-123\nXYZ-000");
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["result_stats"]["ABC-123"]["state"], "Not EoL");
    assert_eq!(json["result_stats"]["XYZ-000"]["state"], "Not found");
    assert_eq!(
        json["skipped_queries"]["ABC-123"]["result"],
        "no EoL announcement found"
    );
    assert_eq!(
        json["skipped_queries"]["XYZ-000"]["result"],
        "Not found in database"
    );
    assert_eq!(json["query_no_result"], false);
}
