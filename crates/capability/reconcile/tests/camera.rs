mod common;

use common::{FakeErp, FakeStreams, erp_camera};
use diag_reconcile::camera::{camera_differences, check_streams};
use diag_reconcile::services::service_differences;
use diag_reconcile::{CameraEngine, ReconcileError};
use diag_storage::InMemoryCacheStore;
use domain::{BillingServiceLine, CameraField, CameraRecord, StreamStatus};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

fn cache_camera(id: i64, name: &str) -> CameraRecord {
    CameraRecord {
        id,
        name: name.to_string(),
        ip_address: Some(format!("10.0.0.{id}")),
        available: Some(true),
        ..CameraRecord::default()
    }
}

#[test]
fn identical_cameras_produce_no_entry() {
    let erp = vec![erp_camera(1, "Cam1"), erp_camera(2, "Cam2")];
    let cache = vec![cache_camera(1, "Cam1"), cache_camera(2, "Cam2")];
    let differences = camera_differences(Some(&erp), Some(&cache)).expect("both sides present");
    assert!(differences.is_empty());
}

#[test]
fn single_field_mismatch_reports_only_that_field() {
    let erp = vec![erp_camera(1, "Cam1")];
    let cache = vec![cache_camera(1, "Подъезд")];
    let differences = camera_differences(Some(&erp), Some(&cache)).expect("both sides present");
    assert_eq!(differences.len(), 1);
    let diff = &differences[0];
    assert!(diff.present_in_cache && diff.present_in_erp);
    assert_eq!(diff.field_diffs.len(), 1);
    let name = &diff.field_diffs[&CameraField::Name];
    assert_eq!(name.erp_value, Some(json!("Cam1")));
    assert_eq!(name.cache_value, Some(json!("Подъезд")));
}

#[test]
fn missing_side_yields_none() {
    let cache = vec![cache_camera(1, "Cam1")];
    assert!(camera_differences(None, Some(&cache)).is_none());
    assert!(camera_differences(Some(&[]), None).is_none());
}

#[test]
fn cameras_deleted_in_erp_but_cached_are_cache_only() {
    let mut deleted = erp_camera(1, "Old");
    deleted.deleted = Some(true);
    let erp = vec![deleted];
    let cache = vec![cache_camera(1, "Old"), cache_camera(9, "Extra")];
    let differences = camera_differences(Some(&erp), Some(&cache)).expect("both sides present");
    let ids: Vec<i64> = differences.iter().map(|diff| diff.camera_id).collect();
    assert_eq!(ids, vec![1, 9]);
    assert!(differences.iter().all(|diff| !diff.present_in_erp && diff.present_in_cache));
    assert_eq!(
        differences[1].field_diffs[&CameraField::Name].cache_value,
        Some(json!("Extra"))
    );
}

#[test]
fn deleted_erp_cameras_absent_from_cache_are_not_reported() {
    let mut deleted = erp_camera(3, "Cam3");
    deleted.deleted = Some(true);
    let differences =
        camera_differences(Some(&vec![deleted]), Some(&Vec::new())).expect("both sides present");
    assert!(differences.is_empty());
}

#[tokio::test]
async fn stream_checks_classify_and_skip_failures() {
    let mut broken = erp_camera(1, "Cam1");
    broken.host = Some("video.example".to_string());
    broken.stream_path = Some("cam1".to_string());
    let mut missing = erp_camera(2, "Cam2");
    missing.host = Some("video.example".to_string());
    missing.stream_path = Some("cam2".to_string());
    let mut unknown_host = erp_camera(3, "Cam3");
    unknown_host.host = Some("unknown.example".to_string());
    unknown_host.stream_path = Some("cam3".to_string());
    let mut offline = erp_camera(4, "Cam4");
    offline.available = Some(false);
    offline.host = Some("video.example".to_string());
    offline.stream_path = Some("cam4".to_string());

    let provider = FakeStreams {
        statuses: HashMap::from([(
            "cam1".to_string(),
            StreamStatus {
                name: "cam1".to_string(),
                title: "Подъезд".to_string(),
                alive: Some(false),
                running: Some(false),
                bytes_in: Some(0),
            },
        )]),
    };
    let (report, statuses) =
        check_streams(&provider, &[broken, missing, unknown_host, offline]).await;

    assert_eq!(statuses.len(), 1);
    assert_eq!(report.failed_alive_checks, vec!["Camera Cam1: alive = false"]);
    assert_eq!(report.failed_running_checks.len(), 1);
    assert_eq!(report.invalid_bytes_in, vec!["Camera Cam1: bytes_in = 0"]);
    assert_eq!(report.errors.len(), 2);
}

#[test]
fn service_rename_is_matched_by_archive_days() {
    let mut first = erp_camera(1, "Cam1");
    first.service_name = Some("Видео 7 дней".to_string());
    first.status = Some("Активный".to_string());
    let mut second = erp_camera(2, "Cam2");
    second.service_name = Some("Видео 30 дней".to_string());
    second.status = Some("Активный".to_string());
    let cameras = vec![first, second];

    let billing = vec![
        BillingServiceLine {
            name: "Видеонаблюдение 7".to_string(),
            status: "Активный".to_string(),
            count: 1,
            price: 100.0,
        },
        BillingServiceLine {
            name: "Видео 30 дней".to_string(),
            status: "Приостановлен".to_string(),
            count: 2,
            price: 200.0,
        },
    ];
    let report = service_differences(&billing, Some(&cameras)).expect("erp cameras present");
    assert_eq!(report.missing_in_camera_set.len(), 1);
    assert!(report.missing_in_camera_set[0].contains("Видео 7 дней"));
    assert_eq!(report.count_mismatches.len(), 1);
    assert_eq!(report.status_mismatches.len(), 1);
    assert!(report.missing_in_erp_set.is_empty());

    assert!(service_differences(&billing, None).is_none());
}

#[test]
fn unmatched_groups_and_totals_are_reported() {
    let mut camera = erp_camera(1, "Cam1");
    camera.service_name = Some("Видео 14 дней".to_string());
    camera.status = Some("Активный".to_string());
    let report = service_differences(&[], Some(&[camera])).expect("erp cameras present");
    assert_eq!(report.missing_in_erp_set.len(), 1);
    assert_eq!(
        report.missing_in_camera_set,
        vec!["Total service count mismatch: billing 0, cameras 1"]
    );
}

#[tokio::test]
async fn camera_only_in_erp_is_reported_end_to_end() {
    let cache = InMemoryCacheStore::new();
    cache
        .insert_login("100200", json!({"flatId": 42, "UUID": "u-1", "UUID2": "u-2"}))
        .expect("login");
    let erp = FakeErp {
        cameras: Some(vec![erp_camera(1, "Cam1")]),
        ..FakeErp::default()
    };
    let engine = CameraEngine::new(
        Arc::new(erp),
        Arc::new(cache),
        Arc::new(FakeStreams::default()),
    );

    let report = engine.report("100200").await.expect("report");
    let differences = report.camera_differences.expect("differences");
    assert_eq!(differences.len(), 1);
    assert_eq!(differences[0].camera_id, 1);
    assert!(!differences[0].present_in_cache);
    assert_eq!(
        differences[0].field_diffs[&CameraField::Name].erp_value,
        Some(json!("Cam1"))
    );
    assert_eq!(
        differences[0].field_diffs[&CameraField::Available].erp_value,
        Some(json!(true))
    );
    assert!(report.warnings.is_empty());
}

#[tokio::test]
async fn camera_report_without_any_source_is_not_found() {
    let engine = CameraEngine::new(
        Arc::new(FakeErp::default()),
        Arc::new(InMemoryCacheStore::new()),
        Arc::new(FakeStreams::default()),
    );
    let result = engine.report("100200").await;
    assert!(matches!(result, Err(ReconcileError::NotFound(_))));
}

#[tokio::test]
async fn erp_failure_keeps_cache_cameras_and_warns() {
    let cache = InMemoryCacheStore::new();
    cache.insert_login("100200", json!({"flatId": 42})).expect("login");
    cache
        .insert_camera(cache_camera(5, "Двор"), vec![42])
        .expect("camera");
    let engine = CameraEngine::new(
        Arc::new(FakeErp::default()),
        Arc::new(cache),
        Arc::new(FakeStreams::default()),
    );

    let report = engine.report("100200").await.expect("report");
    assert!(report.erp_cameras.is_none());
    assert!(report.camera_differences.is_none());
    assert_eq!(report.cache_cameras.len(), 1);
    assert!(
        report
            .warnings
            .contains(&"ERP camera data unavailable".to_string())
    );
}
