//! 诊断 API：按登录名对账摄像头、TV、网络与对讲数据。
//!
//! 路由见 `routes.rs`；认证不在本服务范围内。

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod utils;

use axum::Router;
use diag_reconcile::{CameraEngine, IntercomEngine, NetworkEngine, TvEngine};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 各对账引擎的共享句柄。
#[derive(Clone)]
pub struct AppState {
    pub cameras: Arc<CameraEngine>,
    pub tv: Arc<TvEngine>,
    pub network: Arc<NetworkEngine>,
    pub intercom: Arc<IntercomEngine>,
}

impl AppState {
    pub fn new(
        cameras: CameraEngine,
        tv: TvEngine,
        network: NetworkEngine,
        intercom: IntercomEngine,
    ) -> Self {
        Self {
            cameras: Arc::new(cameras),
            tv: Arc::new(tv),
            network: Arc::new(network),
            intercom: Arc::new(intercom),
        }
    }
}

/// 完整路由：业务路由 + 请求上下文中间件 + HTTP trace。
pub fn build_router(state: AppState) -> Router {
    routes::create_api_router()
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::request_context))
        .layer(TraceLayer::new_for_http())
}
