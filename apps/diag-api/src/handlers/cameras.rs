//! 摄像头页面
//!
//! - GET /v1/cameras?login=

use crate::AppState;
use crate::utils::{require_login, respond};
use api_contract::LoginQuery;
use axum::{
    extract::{Query, State},
    response::Response,
};

pub async fn get_camera_report(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Response {
    let login = match require_login(query.login) {
        Ok(login) => login,
        Err(response) => return response,
    };
    respond(state.cameras.report(&login).await)
}
