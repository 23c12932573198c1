//! TV 运营商接口：Смотрешка（经 1C 代理）、24ТВ、ТВИП。

use crate::client::{build_client, read_json};
use crate::error::SourceError;
use crate::models::{integer_field, object_rows, text_field};
use crate::tokens::TokenTable;
use crate::traits::TvProviders;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use diag_config::AppConfig;
use domain::tv::{STATUS_ACTIVE, STATUS_INACTIVE};
use domain::{ServiceTuple, TvOperator};
use serde_json::Value;
use std::time::Duration;

const TV24_END_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// 运营商接口地址。
#[derive(Debug, Clone)]
pub struct TvEndpoints {
    pub erp_base_url: String,
    pub tv24_api_url: String,
    pub tvip_api_url: String,
}

impl TvEndpoints {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            erp_base_url: config.erp_base_url.clone(),
            tv24_api_url: config.tv24_api_url.clone(),
            tvip_api_url: config.tvip_api_url.clone(),
        }
    }
}

#[derive(Clone)]
pub struct HttpTvProviders {
    client: reqwest::Client,
    endpoints: TvEndpoints,
    tokens: TokenTable,
}

impl HttpTvProviders {
    pub fn new(
        endpoints: TvEndpoints,
        tokens: TokenTable,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoints,
            tokens,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        Self::new(
            TvEndpoints::from_config(config),
            TokenTable::new(&config.tokens),
            Duration::from_secs(config.external_api_timeout_seconds),
        )
    }
}

#[async_trait]
impl TvProviders for HttpTvProviders {
    async fn smotreshka_services(&self, login: &str) -> Result<Vec<ServiceTuple>, SourceError> {
        let url = format!(
            "{}/mwapi/getLfstrmPackets",
            self.endpoints.erp_base_url.trim_end_matches('/')
        );
        let body: Value = read_json(
            "smotreshka",
            self.client.get(url).query(&[("login", login)]),
        )
        .await?;
        Ok(smotreshka_services_from(&body))
    }

    async fn tv24_services(
        &self,
        user_id: &str,
        operator: TvOperator,
    ) -> Result<Vec<ServiceTuple>, SourceError> {
        let token = self.tokens.tv24(operator)?;
        let url = format!(
            "{}/v2/users/{}/subscriptions/current",
            self.endpoints.tv24_api_url.trim_end_matches('/'),
            user_id
        );
        let body: Value =
            read_json("tv24", self.client.get(url).query(&[("token", token)])).await?;
        Ok(tv24_services_from(&body, Utc::now()))
    }

    async fn tv24_parental_code(
        &self,
        user_id: &str,
        operator: TvOperator,
    ) -> Result<Option<String>, SourceError> {
        let token = self.tokens.tv24(operator)?;
        let url = format!(
            "{}/v2/users/{}",
            self.endpoints.tv24_api_url.trim_end_matches('/'),
            user_id
        );
        let body: Value =
            read_json("tv24", self.client.get(url).query(&[("token", token)])).await?;
        Ok(parental_code_from(&body))
    }

    async fn tvip_services(
        &self,
        user_id: &str,
        service_name: &str,
    ) -> Result<Vec<ServiceTuple>, SourceError> {
        let token = self.tokens.tvip()?;
        let url = format!(
            "{}/api/provider/account_subscriptions",
            self.endpoints.tvip_api_url.trim_end_matches('/')
        );
        let body: Value = read_json(
            "tvip",
            self.client
                .get(url)
                .query(&[("account", user_id), ("limit", "25"), ("start", "0")])
                .header(reqwest::header::AUTHORIZATION, format!("Basic {token}")),
        )
        .await?;
        Ok(tvip_services_from(&body, service_name))
    }
}

/// Смотрешка 只返回已开通的套餐，状态恒为有效。
pub fn smotreshka_services_from(body: &Value) -> Vec<ServiceTuple> {
    object_rows(body)
        .into_iter()
        .filter_map(|packet| {
            Some(ServiceTuple {
                id: integer_field(packet, "id")?,
                name: text_field(packet, "name").unwrap_or_default(),
                status: STATUS_ACTIVE.to_string(),
            })
        })
        .collect()
}

/// `end_at` 晚于 `now` 为有效；无法解析的时间视为过期。
pub fn tv24_services_from(body: &Value, now: DateTime<Utc>) -> Vec<ServiceTuple> {
    object_rows(body)
        .into_iter()
        .filter_map(|subscription| {
            let packet = subscription.get("packet").and_then(Value::as_object)?;
            let active = subscription
                .get("end_at")
                .and_then(Value::as_str)
                .and_then(|end_at| NaiveDateTime::parse_from_str(end_at, TV24_END_AT_FORMAT).ok())
                .is_some_and(|end_at| end_at.and_utc() > now);
            Some(ServiceTuple {
                id: integer_field(packet, "id")?,
                name: text_field(packet, "name").unwrap_or_default(),
                status: if active { STATUS_ACTIVE } else { STATUS_INACTIVE }.to_string(),
            })
        })
        .collect()
}

pub fn parental_code_from(body: &Value) -> Option<String> {
    let user = body.as_object()?;
    if user.get("parental_status").and_then(Value::as_str) != Some("set") {
        return None;
    }
    text_field(user, "parental_code")
}

/// 已设置 `stop` 的订阅视为已停止，不计入。
pub fn tvip_services_from(body: &Value, service_name: &str) -> Vec<ServiceTuple> {
    let Some(data) = body.get("data") else {
        return Vec::new();
    };
    object_rows(data)
        .into_iter()
        .filter(|subscription| subscription.get("stop").is_none_or(Value::is_null))
        .filter_map(|subscription| {
            Some(ServiceTuple {
                id: integer_field(subscription, "tarif")?,
                name: service_name.to_string(),
                status: STATUS_ACTIVE.to_string(),
            })
        })
        .collect()
}
