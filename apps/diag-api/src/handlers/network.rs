//! 网络会话页面
//!
//! - GET /v1/network?login=

use crate::AppState;
use crate::utils::{require_login, respond};
use api_contract::LoginQuery;
use axum::{
    extract::{Query, State},
    response::Response,
};

pub async fn get_network_report(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Response {
    let login = match require_login(query.login) {
        Ok(login) => login,
        Err(response) => return response,
    };
    respond(state.network.report(&login).await)
}
