//! TV 重同步接口。

use crate::client::{build_client, expect_success};
use crate::error::SourceError;
use crate::traits::TvFixEndpoint;
use async_trait::async_trait;
use diag_config::AppConfig;
use domain::TvOperator;
use serde_json::json;
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct HttpTvFixEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpTvFixEndpoint {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.into(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        Self::new(
            config.tv_fix_url.clone(),
            Duration::from_secs(config.tv_fix_timeout_seconds),
        )
    }
}

#[async_trait]
impl TvFixEndpoint for HttpTvFixEndpoint {
    /// 只有 200 视为成功。
    async fn correct(&self, login: &str, operator: TvOperator) -> Result<(), SourceError> {
        let payload = json!({"login": login, "operator": operator.wire_name()});
        expect_success("tv fix", self.client.post(&self.url).json(&payload)).await?;
        info!(target: "diag.sources", login, operator = %operator, "tv_fix_requested");
        Ok(())
    }
}
