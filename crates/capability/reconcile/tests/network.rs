use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use diag_reconcile::network::{
    PASSWORD_MASK, cache_expiry, is_active, parse_json_data, reconcile_network,
};
use diag_reconcile::time::offset_hours;
use diag_reconcile::{NetworkEngine, ReconcileError};
use diag_storage::{InMemoryCacheStore, InMemoryRadiusStore};
use domain::{LoginDocument, NetworkField, NetworkSource, RadiusSession, RawExpiry};
use serde_json::json;
use std::sync::Arc;

/// 2025-06-01 12:00:00 UTC
const EXPIRY_EPOCH: i64 = 1_748_779_200;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 20, 9, 0, 0)
        .single()
        .expect("time")
}

/// RADIUS 以 UTC+5 存储无时区时间。
fn radius_time(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("naive time")
}

fn session(time_to: NaiveDateTime) -> RadiusSession {
    RadiusSession {
        password: Some("secret".to_string()),
        gmt: Some("+5".to_string()),
        ip_address: Some("10.1.2.3".to_string()),
        time_to: Some(time_to),
        onu_mac: Some("aa:bb".to_string()),
        json_data: Some(r#"{"mac":"00:11:22:33:44:55","vlan":120}"#.to_string()),
    }
}

fn document(extra: serde_json::Value) -> LoginDocument {
    let mut value = json!({
        "password": "secret",
        "GMT": "+5",
        "ip_addr": "10.1.2.3",
        "onu_mac": "aa:bb",
        "mac": "00:11:22:33:44:55",
        "vlan": 120,
        "servicecats": {"internet": {"timeto": EXPIRY_EPOCH}}
    });
    if let (Some(target), Some(source)) = (value.as_object_mut(), extra.as_object()) {
        for (key, field) in source {
            target.insert(key.clone(), field.clone());
        }
    }
    LoginDocument::from_value("100200", value)
}

#[test]
fn active_flag_follows_expiry() {
    let current = now();
    let future = RawExpiry::Timestamp(current + Duration::hours(1));
    let past = RawExpiry::Timestamp(current - Duration::hours(1));
    assert!(is_active(&future, current));
    assert!(!is_active(&past, current));
    assert!(!is_active(&RawExpiry::Absent, current));
}

#[test]
fn opaque_expiry_is_judged_by_truthiness() {
    let opaque = cache_expiry(Some(&json!("unlimited")));
    assert!(matches!(opaque, RawExpiry::Opaque(_)));
    assert!(is_active(&opaque, now()));
    assert!(!is_active(&cache_expiry(Some(&json!(""))), now()));
    assert!(matches!(
        cache_expiry(Some(&json!("1748779200"))),
        RawExpiry::Timestamp(_)
    ));
}

#[test]
fn malformed_json_data_is_treated_as_empty() {
    assert!(parse_json_data(Some("{not json")).is_empty());
    assert!(parse_json_data(Some("[1, 2]")).is_empty());
    assert!(parse_json_data(None).is_empty());
    assert_eq!(parse_json_data(Some(r#"{"vlan":7}"#)).len(), 1);
}

#[test]
fn matching_sides_produce_no_differences() {
    let session = session(radius_time(17, 0));
    let document = document(json!({}));
    let report = reconcile_network(
        "100200",
        Some(&session),
        Some(&document),
        offset_hours(5),
        now(),
    )
    .expect("report");

    let differences = report.differences.expect("differences");
    assert!(differences.is_empty(), "{differences:?}");
    let radius = report.radius.expect("radius");
    assert_eq!(radius.source, NetworkSource::Radius);
    assert_eq!(radius.vlan, Some(120));
    assert!(radius.active);
    assert!(report.cache.expect("cache").active);
}

#[test]
fn expiry_within_tolerance_is_not_a_difference() {
    let document = document(json!({}));

    let close = session(radius_time(18, 30));
    let report = reconcile_network("100200", Some(&close), Some(&document), offset_hours(5), now())
        .expect("report");
    assert!(
        !report
            .differences
            .expect("differences")
            .contains_key(&NetworkField::TimeTo)
    );

    let far = session(radius_time(20, 0));
    let report = reconcile_network("100200", Some(&far), Some(&document), offset_hours(5), now())
        .expect("report");
    assert!(
        report
            .differences
            .expect("differences")
            .contains_key(&NetworkField::TimeTo)
    );
}

#[test]
fn password_difference_is_masked() {
    let session = session(radius_time(17, 0));
    let document = document(json!({"password": "other"}));
    let report = reconcile_network(
        "100200",
        Some(&session),
        Some(&document),
        offset_hours(5),
        now(),
    )
    .expect("report");
    let differences = report.differences.expect("differences");
    let password = &differences[&NetworkField::Password];
    assert_eq!(password.radius_value, json!(PASSWORD_MASK));
    assert_eq!(password.cache_value, json!(PASSWORD_MASK));
    assert_eq!(differences.len(), 1);
}

#[test]
fn zero_vlan_in_cache_counts_as_unset() {
    let session = session(radius_time(17, 0));
    let document = document(json!({"vlan": 0}));
    let report = reconcile_network(
        "100200",
        Some(&session),
        Some(&document),
        offset_hours(5),
        now(),
    )
    .expect("report");
    assert_eq!(report.cache.as_ref().and_then(|cache| cache.vlan), None);
    let differences = report.differences.expect("differences");
    assert_eq!(differences[&NetworkField::Vlan].cache_value, json!(null));
}

#[test]
fn one_sided_reports_carry_warnings() {
    let session = session(radius_time(17, 0));
    let document = document(json!({}));

    let radius_only =
        reconcile_network("100200", Some(&session), None, offset_hours(5), now()).expect("report");
    assert!(radius_only.differences.is_none());
    assert!(radius_only.cache.is_none());
    assert_eq!(radius_only.warnings, vec!["cache data unavailable"]);

    let cache_only =
        reconcile_network("100200", None, Some(&document), offset_hours(5), now()).expect("report");
    assert!(cache_only.radius.is_none());
    assert_eq!(cache_only.warnings, vec!["radius data unavailable"]);

    let neither = reconcile_network("100200", None, None, offset_hours(5), now());
    assert!(matches!(neither, Err(ReconcileError::NotFound(_))));
}

#[tokio::test]
async fn engine_reads_both_stores() {
    let radius = InMemoryRadiusStore::new();
    radius
        .insert("100200", session(radius_time(17, 0)))
        .expect("session");
    let cache = InMemoryCacheStore::new();
    cache
        .insert_login("100200", json!({"ip_addr": "10.9.9.9"}))
        .expect("login");
    let engine = NetworkEngine::new(Arc::new(radius), Arc::new(cache), 5);

    let report = engine.report("100200").await.expect("report");
    let differences = report.differences.expect("differences");
    assert_eq!(
        differences[&NetworkField::IpAddr].radius_value,
        json!("10.1.2.3")
    );
    assert_eq!(
        differences[&NetworkField::IpAddr].cache_value,
        json!("10.9.9.9")
    );

    let missing = engine.report("999").await;
    assert!(matches!(missing, Err(ReconcileError::NotFound(_))));
}
