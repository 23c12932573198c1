//! 外部数据源接口。
//!
//! 引擎只依赖这些 Trait；HTTP 实现位于各自模块，测试使用内存替身。

use crate::error::SourceError;
use crate::models::PassageEntry;
use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{
    BillingServiceLine, CameraRecord, ErpIntercomRow, ErpTvServiceRow, ServiceTuple, StreamStatus,
    TvOperator,
};

/// 1C 接口
#[async_trait]
pub trait ErpSource: Send + Sync {
    /// 登录名下的摄像头（含重试）。
    async fn cameras(&self, login: &str) -> Result<Vec<CameraRecord>, SourceError>;

    /// 按 UUID/UUID2 查询视频监控计费行。
    async fn billing_services(
        &self,
        uuid: &str,
        uuid2: &str,
    ) -> Result<Vec<BillingServiceLine>, SourceError>;

    async fn tv_services(&self, login: &str) -> Result<Vec<ErpTvServiceRow>, SourceError>;

    async fn intercom_services(&self, login: &str) -> Result<Vec<ErpIntercomRow>, SourceError>;
}

/// 视频流状态接口
#[async_trait]
pub trait StreamProvider: Send + Sync {
    async fn stream_status(&self, host: &str, stream_path: &str)
    -> Result<StreamStatus, SourceError>;
}

/// TV 运营商接口
#[async_trait]
pub trait TvProviders: Send + Sync {
    async fn smotreshka_services(&self, login: &str) -> Result<Vec<ServiceTuple>, SourceError>;

    /// `operator` 决定使用哪个区域的 token。
    async fn tv24_services(
        &self,
        user_id: &str,
        operator: TvOperator,
    ) -> Result<Vec<ServiceTuple>, SourceError>;

    async fn tv24_parental_code(
        &self,
        user_id: &str,
        operator: TvOperator,
    ) -> Result<Option<String>, SourceError>;

    /// TVIP 不返回套餐名，使用 1C 的服务名。
    async fn tvip_services(
        &self,
        user_id: &str,
        service_name: &str,
    ) -> Result<Vec<ServiceTuple>, SourceError>;
}

/// 通行记录接口
#[async_trait]
pub trait PassageProvider: Send + Sync {
    async fn passages_for_day(
        &self,
        flat_id: i64,
        day: NaiveDate,
        token: &str,
    ) -> Result<Vec<PassageEntry>, SourceError>;
}

/// TV 重同步接口
#[async_trait]
pub trait TvFixEndpoint: Send + Sync {
    async fn correct(&self, login: &str, operator: TvOperator) -> Result<(), SourceError>;
}
