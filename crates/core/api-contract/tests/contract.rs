use api_contract::{LoginQuery, ManualBlockRequest, ManualBlockResponse, TvFixRequest};

#[test]
fn manual_block_request_accepts_camel_case() {
    let payload = r#"{"houseFlatId":17}"#;
    let req: ManualBlockRequest = serde_json::from_str(payload).expect("parse");
    assert_eq!(req.house_flat_id, 17);
}

#[test]
fn manual_block_request_accepts_snake_case() {
    let payload = r#"{"house_flat_id":18}"#;
    let req: ManualBlockRequest = serde_json::from_str(payload).expect("parse");
    assert_eq!(req.house_flat_id, 18);
}

#[test]
fn manual_block_response_is_camel_case() {
    let response = ManualBlockResponse {
        house_flat_id: 17,
        changed: true,
        message: "manual block cleared".to_string(),
    };
    let value = serde_json::to_value(response).expect("serialize");
    assert!(value.get("houseFlatId").is_some());
    assert!(value.get("house_flat_id").is_none());
}

#[test]
fn login_query_is_optional() {
    let query: LoginQuery = serde_json::from_str("{}").expect("parse");
    assert!(query.login.is_none());
    let req: TvFixRequest = serde_json::from_str(r#"{"login":"100200"}"#).expect("parse");
    assert_eq!(req.login, "100200");
}
