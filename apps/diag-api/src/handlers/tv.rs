//! TV 订阅 handlers
//!
//! - GET /v1/tv?login= - 对账报告
//! - POST /v1/tv/fix - 对不一致的运营商发起重同步

use crate::AppState;
use crate::utils::{normalize_required, require_login, respond};
use api_contract::{LoginQuery, TvFixRequest};
use axum::{
    Json,
    extract::{Query, State},
    response::Response,
};

pub async fn get_tv_report(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Response {
    let login = match require_login(query.login) {
        Ok(login) => login,
        Err(response) => return response,
    };
    respond(state.tv.report(&login).await)
}

pub async fn fix_tv(State(state): State<AppState>, Json(req): Json<TvFixRequest>) -> Response {
    let login = match normalize_required(req.login, "login") {
        Ok(login) => login,
        Err(response) => return response,
    };
    respond(state.tv.fix(&login).await)
}
