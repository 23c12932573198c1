use diag_telemetry::{metrics, new_request_ids, record_discrepancies, record_fix_attempt};

#[test]
fn request_ids_non_empty() {
    let ids = new_request_ids();
    assert!(!ids.request_id.is_empty());
    assert!(!ids.trace_id.is_empty());
    assert_ne!(ids.request_id, ids.trace_id);
}

#[test]
fn counters_accumulate() {
    let before = metrics().snapshot();
    record_fix_attempt();
    record_discrepancies(3);
    record_discrepancies(0);
    let after = metrics().snapshot();
    assert!(after.fix_attempts >= before.fix_attempts + 1);
    assert!(after.discrepancies_reported >= before.discrepancies_reported + 3);
}
