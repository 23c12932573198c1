//! 路由定义
//!
//! - 健康检查：/health
//! - 对账页面：/v1/cameras, /v1/tv, /v1/network, /v1/intercom
//! - 修复操作：/v1/tv/fix, /v1/intercom/fix-manual-block
//! - 计数快照：/metrics

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
        .route("/v1/cameras", get(get_camera_report))
        .route("/v1/tv", get(get_tv_report))
        .route("/v1/tv/fix", post(fix_tv))
        .route("/v1/network", get(get_network_report))
        .route("/v1/intercom", get(get_intercom_report))
        .route("/v1/intercom/fix-manual-block", post(fix_manual_block))
}
