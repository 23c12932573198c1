//! 1C HTTP 接口。

use crate::client::{build_client, read_json, with_retry};
use crate::error::SourceError;
use crate::models::{bool_field, integer_field, object_rows, text_field};
use crate::traits::ErpSource;
use async_trait::async_trait;
use diag_config::AppConfig;
use domain::{BillingServiceLine, CameraRecord, ErpIntercomRow, ErpTvServiceRow};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::debug;

const SOURCE: &str = "erp";
/// 计费行中视频监控产品的名称前缀。
pub const VIDEO_SERVICE_PREFIX: &str = "Услуга видеонаблюдения";
const STATUS_NOT_SPECIFIED: &str = "Не указано";

#[derive(Clone)]
pub struct HttpErpSource {
    base_url: String,
    client: reqwest::Client,
    camera_client: reqwest::Client,
    camera_attempts: u64,
}

impl HttpErpSource {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        camera_timeout: Duration,
        camera_attempts: u64,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: build_client(timeout)?,
            camera_client: build_client(camera_timeout)?,
            camera_attempts,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        Self::new(
            config.erp_base_url.clone(),
            Duration::from_secs(config.external_api_timeout_seconds),
            Duration::from_secs(config.camera_timeout_seconds),
            config.camera_retries,
        )
    }

    async fn anydata(
        &self,
        client: &reqwest::Client,
        query: &str,
        login: &str,
    ) -> Result<Value, SourceError> {
        let url = format!("{}/Grafana/anydata", self.base_url);
        debug!(target: "diag.sources", query, login, "erp_anydata");
        read_json(
            SOURCE,
            client.get(url).query(&[("query", query), ("login", login)]),
        )
        .await
    }
}

#[async_trait]
impl ErpSource for HttpErpSource {
    async fn cameras(&self, login: &str) -> Result<Vec<CameraRecord>, SourceError> {
        let body = with_retry(SOURCE, self.camera_attempts, move || {
            self.anydata(&self.camera_client, "cameras", login)
        })
        .await?;
        Ok(object_rows(&body).into_iter().filter_map(erp_camera).collect())
    }

    async fn billing_services(
        &self,
        uuid: &str,
        uuid2: &str,
    ) -> Result<Vec<BillingServiceLine>, SourceError> {
        let url = format!("{}/Cabinet/allServices", self.base_url);
        let body: Value = read_json(
            SOURCE,
            self.client
                .post(url)
                .json(&json!({"UUID": uuid, "UUID2": uuid2})),
        )
        .await?;
        Ok(video_service_lines(&body))
    }

    async fn tv_services(&self, login: &str) -> Result<Vec<ErpTvServiceRow>, SourceError> {
        let body = self
            .anydata(&self.client, "external_services", login)
            .await?;
        Ok(object_rows(&body).into_iter().map(tv_row).collect())
    }

    async fn intercom_services(&self, login: &str) -> Result<Vec<ErpIntercomRow>, SourceError> {
        let body = self.anydata(&self.client, "intercom", login).await?;
        Ok(object_rows(&body)
            .into_iter()
            .map(|row| ErpIntercomRow {
                service: text_field(row, "service"),
                category: text_field(row, "category"),
                time_to: text_field(row, "timeto"),
            })
            .collect())
    }
}

/// 1C 摄像头行；缺少 id 的行丢弃。
pub fn erp_camera(row: &Map<String, Value>) -> Option<CameraRecord> {
    Some(CameraRecord {
        id: integer_field(row, "id")?,
        name: text_field(row, "name").unwrap_or_default(),
        ip_address: text_field(row, "ipaddress"),
        available: bool_field(row, "available"),
        host: text_field(row, "host"),
        stream_path: text_field(row, "URL"),
        service_name: text_field(row, "service"),
        archive_days: integer_field(row, "archive"),
        deleted: bool_field(row, "deleted"),
        status: text_field(row, "status"),
        camera_type: text_field(row, "type"),
        mac_address: text_field(row, "macaddress"),
        house_ids: None,
        model: None,
    })
}

/// 从 `allServices` 响应中取出视频监控计费行。
pub fn video_service_lines(body: &Value) -> Vec<BillingServiceLine> {
    object_rows(body)
        .into_iter()
        .filter_map(|entry| entry.get("services").and_then(Value::as_array))
        .flatten()
        .filter_map(Value::as_object)
        .filter(|line| {
            line.get("productName")
                .and_then(Value::as_str)
                .is_some_and(|name| name.starts_with(VIDEO_SERVICE_PREFIX))
        })
        .map(|line| BillingServiceLine {
            name: text_field(line, "name").unwrap_or_default(),
            status: text_field(line, "status").unwrap_or_else(|| STATUS_NOT_SPECIFIED.to_string()),
            count: integer_field(line, "count").unwrap_or(0),
            price: line.get("price").and_then(Value::as_f64).unwrap_or(0.0),
        })
        .collect()
}

fn tv_row(row: &Map<String, Value>) -> ErpTvServiceRow {
    ErpTvServiceRow {
        service: text_field(row, "service").unwrap_or_default(),
        status: text_field(row, "status").unwrap_or_default(),
        login: text_field(row, "login").unwrap_or_default(),
        password: text_field(row, "password").unwrap_or_default(),
        operator: text_field(row, "operator").unwrap_or_default(),
        user_id: text_field(row, "userId").unwrap_or_default(),
        service_id: text_field(row, "serviceId").unwrap_or_default(),
        not_turnoff_if_not_used: bool_field(row, "not_turnoff_if_not_used").unwrap_or(false),
        ban_on_app: bool_field(row, "ban_on_app").unwrap_or(false),
    }
}
