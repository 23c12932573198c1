//! 视频流服务（Flussonic 兼容接口）。

use crate::client::{build_client, read_json};
use crate::error::SourceError;
use crate::tokens::TokenTable;
use crate::traits::StreamProvider;
use async_trait::async_trait;
use diag_config::AppConfig;
use domain::StreamStatus;
use serde::Deserialize;
use std::time::Duration;

const SOURCE: &str = "video";

#[derive(Debug, Deserialize)]
struct StreamBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    stats: StreamStats,
}

#[derive(Debug, Default, Deserialize)]
struct StreamStats {
    alive: Option<bool>,
    running: Option<bool>,
    bytes_in: Option<i64>,
}

#[derive(Clone)]
pub struct HttpStreamProvider {
    client: reqwest::Client,
    tokens: TokenTable,
    scheme: String,
}

impl HttpStreamProvider {
    pub fn new(tokens: TokenTable, timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout)?,
            tokens,
            scheme: "https".to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        Self::new(
            TokenTable::new(&config.tokens),
            Duration::from_secs(config.external_api_timeout_seconds),
        )
    }

    /// 测试环境使用明文 http。
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }
}

#[async_trait]
impl StreamProvider for HttpStreamProvider {
    async fn stream_status(
        &self,
        host: &str,
        stream_path: &str,
    ) -> Result<StreamStatus, SourceError> {
        let token = self.tokens.video_host(host)?;
        let url = format!(
            "{}://{}/streamer/api/v3/streams/{}",
            self.scheme,
            host,
            stream_path.trim_start_matches('/')
        );
        let body: StreamBody =
            read_json(SOURCE, self.client.get(url).bearer_auth(token)).await?;
        Ok(StreamStatus {
            name: body.name,
            title: body.title,
            alive: body.stats.alive,
            running: body.stats.running,
            bytes_in: body.stats.bytes_in,
        })
    }
}
