//! HTTP 响应辅助函数
//!
//! 所有错误返回统一的 ApiResponse 格式，错误码：
//! - INVALID.REQUEST（400）
//! - RESOURCE.NOT_FOUND（404）
//! - INTERNAL.ERROR（500）

use api_contract::ApiResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use diag_reconcile::ReconcileError;
use serde::Serialize;

/// 成功响应
pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error(message: impl Into<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", message.into())),
    )
        .into_response()
}

pub fn internal_error(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message.into())),
    )
        .into_response()
}

/// 对账错误响应：NotFound→404，InvalidInput→400，其余→500
pub fn reconcile_error(err: ReconcileError) -> Response {
    match err {
        ReconcileError::NotFound(message) => not_found_error(message),
        ReconcileError::InvalidInput(message) => bad_request_error(message),
        other => {
            tracing::warn!(target: "diag.api", error = %other, "request_failed");
            internal_error(other.to_string())
        }
    }
}

/// 引擎结果转为响应
pub fn respond<T: Serialize>(result: Result<T, ReconcileError>) -> Response {
    match result {
        Ok(data) => ok(data),
        Err(err) => reconcile_error(err),
    }
}
