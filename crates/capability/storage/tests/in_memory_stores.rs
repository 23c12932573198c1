use diag_storage::{
    CacheStore, CameraScope, InMemoryCacheStore, InMemoryRbtStore, RbtStore,
};
use domain::{ApsSettings, CameraRecord, ManualBlockOutcome};
use serde_json::json;

fn camera(id: i64, house_ids: Option<Vec<i64>>) -> CameraRecord {
    CameraRecord {
        id,
        name: format!("Cam{id}"),
        house_ids,
        ..CameraRecord::default()
    }
}

fn flat(house_flat_id: i64, manual_block: Option<bool>) -> ApsSettings {
    ApsSettings {
        house_flat_id,
        address_house_id: 900,
        manual_block,
        auto_block: Some(false),
        open_code: None,
        white_rabbit: None,
        admin_block: None,
    }
}

#[tokio::test]
async fn login_document_round_trips_through_parser() {
    let store = InMemoryCacheStore::new();
    store
        .insert_login("100200", json!({"UUID": "u-1", "flatId": 42}))
        .expect("insert");

    let document = store
        .login_document(" 100200 ")
        .await
        .expect("read")
        .expect("document");
    assert_eq!(document.uuid.as_deref(), Some("u-1"));
    assert_eq!(document.flat_id(), Some(42));

    let missing = store.login_document("999").await.expect("read");
    assert!(missing.is_none());
    assert!(store.login_document("").await.is_err());
}

#[tokio::test]
async fn personal_cameras_filter_by_scope() {
    let store = InMemoryCacheStore::new();
    store.insert_camera(camera(1, None), vec![42]).expect("insert");
    store
        .insert_camera(camera(2, Some(vec![100200])), Vec::new())
        .expect("insert");
    store.insert_camera(camera(3, Some(vec![7])), vec![43]).expect("insert");

    let by_flat = store
        .personal_cameras(CameraScope::Flat(42))
        .await
        .expect("flat");
    assert_eq!(by_flat.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1]);

    let by_house = store
        .personal_cameras(CameraScope::House(100200))
        .await
        .expect("house");
    assert_eq!(by_house.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2]);
}

#[tokio::test]
async fn auth_token_prefers_highest_role() {
    let store = InMemoryRbtStore::new();
    store.insert_token(42, 0, "low").expect("token");
    store.insert_token(42, 1, "high").expect("token");

    let token = store.find_auth_token(42).await.expect("token");
    assert_eq!(token.as_deref(), Some("high"));
    assert!(store.find_auth_token(43).await.expect("token").is_none());
}

#[tokio::test]
async fn manual_block_clear_is_idempotent() {
    let store = InMemoryRbtStore::new();
    store.insert_flat(flat(42, Some(true))).expect("flat");

    let first = store.clear_manual_block(42).await.expect("clear");
    assert_eq!(first, Some(ManualBlockOutcome::Cleared));
    let second = store.clear_manual_block(42).await.expect("clear");
    assert_eq!(second, Some(ManualBlockOutcome::AlreadyCleared));
    let missing = store.clear_manual_block(7).await.expect("clear");
    assert!(missing.is_none());

    let settings = store
        .find_aps_settings(42)
        .await
        .expect("settings")
        .expect("flat");
    assert_eq!(settings.manual_block, Some(false));
}
