#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use diag_sources::{
    ErpSource, PassageEntry, PassageProvider, SourceError, StreamProvider, TvFixEndpoint,
    TvProviders,
};
use domain::{
    BillingServiceLine, CameraRecord, ErpIntercomRow, ErpTvServiceRow, ServiceTuple, StreamStatus,
    TvOperator,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

fn unavailable(source_name: &'static str) -> SourceError {
    SourceError::Unavailable {
        source_name,
        message: "connection refused".to_string(),
    }
}

#[derive(Default)]
pub struct FakeErp {
    /// None 表示接口失败。
    pub cameras: Option<Vec<CameraRecord>>,
    pub billing: Vec<BillingServiceLine>,
    pub tv_rows: Option<Vec<ErpTvServiceRow>>,
    pub intercom_rows: Option<Vec<ErpIntercomRow>>,
}

#[async_trait]
impl ErpSource for FakeErp {
    async fn cameras(&self, _login: &str) -> Result<Vec<CameraRecord>, SourceError> {
        self.cameras.clone().ok_or_else(|| unavailable("erp"))
    }

    async fn billing_services(
        &self,
        _uuid: &str,
        _uuid2: &str,
    ) -> Result<Vec<BillingServiceLine>, SourceError> {
        Ok(self.billing.clone())
    }

    async fn tv_services(&self, _login: &str) -> Result<Vec<ErpTvServiceRow>, SourceError> {
        self.tv_rows.clone().ok_or_else(|| unavailable("erp"))
    }

    async fn intercom_services(&self, _login: &str) -> Result<Vec<ErpIntercomRow>, SourceError> {
        self.intercom_rows.clone().ok_or_else(|| unavailable("erp"))
    }
}

#[derive(Default)]
pub struct FakeStreams {
    pub statuses: HashMap<String, StreamStatus>,
}

#[async_trait]
impl StreamProvider for FakeStreams {
    async fn stream_status(
        &self,
        host: &str,
        stream_path: &str,
    ) -> Result<StreamStatus, SourceError> {
        if host == "unknown.example" {
            return Err(SourceError::TokenNotFound(format!("video host {host}")));
        }
        self.statuses
            .get(stream_path)
            .cloned()
            .ok_or_else(|| unavailable("video"))
    }
}

#[derive(Default)]
pub struct FakeTv {
    pub smotreshka: Option<Vec<ServiceTuple>>,
    pub tv24: HashMap<String, Vec<ServiceTuple>>,
    pub parental_code: Option<String>,
    pub tvip: Option<Vec<ServiceTuple>>,
    pub tv24_calls: AtomicUsize,
}

#[async_trait]
impl TvProviders for FakeTv {
    async fn smotreshka_services(&self, _login: &str) -> Result<Vec<ServiceTuple>, SourceError> {
        self.smotreshka.clone().ok_or_else(|| unavailable("smotreshka"))
    }

    async fn tv24_services(
        &self,
        user_id: &str,
        _operator: TvOperator,
    ) -> Result<Vec<ServiceTuple>, SourceError> {
        self.tv24_calls.fetch_add(1, Ordering::SeqCst);
        self.tv24
            .get(user_id)
            .cloned()
            .ok_or_else(|| unavailable("tv24"))
    }

    async fn tv24_parental_code(
        &self,
        _user_id: &str,
        _operator: TvOperator,
    ) -> Result<Option<String>, SourceError> {
        Ok(self.parental_code.clone())
    }

    async fn tvip_services(
        &self,
        _user_id: &str,
        _service_name: &str,
    ) -> Result<Vec<ServiceTuple>, SourceError> {
        self.tvip.clone().ok_or_else(|| unavailable("tvip"))
    }
}

#[derive(Default)]
pub struct FakeFix {
    pub failing: Vec<TvOperator>,
    pub calls: Mutex<Vec<TvOperator>>,
}

#[async_trait]
impl TvFixEndpoint for FakeFix {
    async fn correct(&self, _login: &str, operator: TvOperator) -> Result<(), SourceError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(operator);
        }
        if self.failing.contains(&operator) {
            return Err(SourceError::Rejected {
                source_name: "tv fix",
                status: 500,
            });
        }
        Ok(())
    }
}

/// 每天返回一条记录；`num_days_from_ce` 能被 5 整除的那天失败。
#[derive(Default)]
pub struct FakePassages {
    pub tokens_seen: Mutex<Vec<String>>,
}

pub fn failing_day(day: NaiveDate) -> bool {
    day.num_days_from_ce() % 5 == 0
}

#[async_trait]
impl PassageProvider for FakePassages {
    async fn passages_for_day(
        &self,
        _flat_id: i64,
        day: NaiveDate,
        token: &str,
    ) -> Result<Vec<PassageEntry>, SourceError> {
        if let Ok(mut tokens) = self.tokens_seen.lock() {
            tokens.push(token.to_string());
        }
        if failing_day(day) {
            return Err(SourceError::Timeout { source_name: "rbt" });
        }
        Ok(vec![PassageEntry {
            date: format!("{} 10:00:00", day.format("%Y-%m-%d")),
            mechanizma_description: Some("Подъезд 1".to_string()),
            event: Some(serde_json::json!(3)),
        }])
    }
}

pub fn erp_camera(id: i64, name: &str) -> CameraRecord {
    CameraRecord {
        id,
        name: name.to_string(),
        ip_address: Some(format!("10.0.0.{id}")),
        available: Some(true),
        deleted: Some(false),
        camera_type: Some(domain::camera::PERSONAL_CAMERA_TYPE.to_string()),
        ..CameraRecord::default()
    }
}

pub fn tv_row(operator: &str, service_id: &str, user_id: &str) -> ErpTvServiceRow {
    ErpTvServiceRow {
        service: format!("Пакет {service_id}"),
        status: domain::tv::STATUS_ACTIVE.to_string(),
        login: "79990001122".to_string(),
        password: "pass".to_string(),
        operator: operator.to_string(),
        user_id: user_id.to_string(),
        service_id: service_id.to_string(),
        not_turnoff_if_not_used: false,
        ban_on_app: false,
    }
}

pub fn active(id: i64) -> ServiceTuple {
    ServiceTuple {
        id,
        name: format!("Пакет {id}"),
        status: domain::tv::STATUS_ACTIVE.to_string(),
    }
}
