//! 诊断 API 服务入口。

use diag_api::{AppState, build_router};
use diag_config::AppConfig;
use diag_reconcile::{CameraEngine, IntercomEngine, NetworkEngine, TvEngine};
use diag_sources::{
    ErpSource, HttpErpSource, HttpPassageProvider, HttpStreamProvider, HttpTvFixEndpoint,
    HttpTvProviders,
};
use diag_storage::{CacheStore, MySqlRadiusStore, PgRbtStore, RedisCacheStore};
use diag_telemetry::init_tracing;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing();

    let cache: Arc<dyn CacheStore> = Arc::new(RedisCacheStore::connect(&config.redis_url)?);
    let radius = Arc::new(MySqlRadiusStore::connect(&config.radius_database_url).await?);
    let rbt = Arc::new(PgRbtStore::connect(&config.rbt_database_url).await?);
    let erp: Arc<dyn ErpSource> = Arc::new(HttpErpSource::from_config(&config)?);

    let state = AppState::new(
        CameraEngine::new(
            erp.clone(),
            cache.clone(),
            Arc::new(HttpStreamProvider::from_config(&config)?),
        ),
        TvEngine::new(
            erp.clone(),
            Arc::new(HttpTvProviders::from_config(&config)?),
            Arc::new(HttpTvFixEndpoint::from_config(&config)?),
        ),
        NetworkEngine::new(radius, cache.clone(), config.radius_utc_offset_hours),
        IntercomEngine::new(
            erp,
            cache,
            rbt,
            Arc::new(HttpPassageProvider::from_config(&config)?),
            config.rbt_web_url.clone(),
            config.passage_days,
        ),
    );

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(target: "diag.api", addr = %config.http_addr, "listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
