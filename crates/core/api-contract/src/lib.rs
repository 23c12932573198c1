//! 稳定的 DTO 与 API 响应契约。

use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 按登录名查询（`?login=`）。
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub login: Option<String>,
}

/// TV 重同步请求体。
#[derive(Debug, Deserialize)]
pub struct TvFixRequest {
    pub login: String,
}

/// 解除手动封锁请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualBlockRequest {
    #[serde(alias = "house_flat_id", alias = "flatId")]
    pub house_flat_id: i64,
}

/// 解除手动封锁响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualBlockResponse {
    pub house_flat_id: i64,
    pub changed: bool,
    pub message: String,
}

/// 对账计数快照。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub camera_runs: u64,
    pub tv_runs: u64,
    pub network_runs: u64,
    pub intercom_runs: u64,
    pub source_failures: u64,
    pub discrepancies_reported: u64,
    pub fix_attempts: u64,
    pub fix_failures: u64,
    pub passage_days_dropped: u64,
}
