//! RBT 移动端通行记录接口。

use crate::client::{build_client, read_json};
use crate::error::SourceError;
use crate::models::PassageEntry;
use crate::traits::PassageProvider;
use async_trait::async_trait;
use chrono::NaiveDate;
use diag_config::AppConfig;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const SOURCE: &str = "rbt";

#[derive(Debug, Deserialize)]
struct PlogBody {
    #[serde(default)]
    data: Vec<PassageEntry>,
}

#[derive(Clone)]
pub struct HttpPassageProvider {
    client: reqwest::Client,
    api_url: String,
}

impl HttpPassageProvider {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        Self::new(
            config.rbt_api_url.clone(),
            Duration::from_secs(config.external_api_timeout_seconds),
        )
    }
}

#[async_trait]
impl PassageProvider for HttpPassageProvider {
    async fn passages_for_day(
        &self,
        flat_id: i64,
        day: NaiveDate,
        token: &str,
    ) -> Result<Vec<PassageEntry>, SourceError> {
        let url = format!("{}/address/plog", self.api_url);
        let payload = json!({
            "flatId": flat_id,
            "day": day.format("%Y-%m-%d").to_string(),
        });
        let body: PlogBody = read_json(
            SOURCE,
            self.client.post(url).bearer_auth(token).json(&payload),
        )
        .await?;
        Ok(body.data)
    }
}
