//! 对讲/门禁 handlers
//!
//! - GET /v1/intercom?login= - 类别到期日、门禁设置与通行记录
//! - POST /v1/intercom/fix-manual-block - 解除手动封锁

use crate::AppState;
use crate::utils::{ok, reconcile_error, require_login, require_positive, respond};
use api_contract::{LoginQuery, ManualBlockRequest, ManualBlockResponse};
use axum::{
    Json,
    extract::{Query, State},
    response::Response,
};
use domain::ManualBlockOutcome;

pub async fn get_intercom_report(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Response {
    let login = match require_login(query.login) {
        Ok(login) => login,
        Err(response) => return response,
    };
    respond(state.intercom.report(&login).await)
}

pub async fn fix_manual_block(
    State(state): State<AppState>,
    Json(req): Json<ManualBlockRequest>,
) -> Response {
    let house_flat_id = match require_positive(req.house_flat_id, "houseFlatId") {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.intercom.fix_manual_block(house_flat_id).await {
        Ok(outcome) => ok(ManualBlockResponse {
            house_flat_id,
            changed: outcome.changed(),
            message: match outcome {
                ManualBlockOutcome::Cleared => "manual block cleared".to_string(),
                ManualBlockOutcome::AlreadyCleared => "manual block already cleared".to_string(),
            },
        }),
        Err(err) => reconcile_error(err),
    }
}
