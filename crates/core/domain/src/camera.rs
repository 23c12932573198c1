//! 摄像头与视频服务模型。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 个人摄像头类型（1C 与缓存索引共用的取值）。
pub const PERSONAL_CAMERA_TYPE: &str = "Личная";

/// 摄像头记录。
///
/// 两种来源：1C（带 deleted/service/status/type）与缓存（带 houseIds/model）。
/// 只有 `id` 相同的记录才可以跨来源比较。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraRecord {
    pub id: i64,
    pub name: String,
    pub ip_address: Option<String>,
    pub available: Option<bool>,
    pub host: Option<String>,
    pub stream_path: Option<String>,
    pub service_name: Option<String>,
    pub archive_days: Option<i64>,
    pub deleted: Option<bool>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub camera_type: Option<String>,
    pub mac_address: Option<String>,
    pub house_ids: Option<Vec<i64>>,
    pub model: Option<String>,
}

impl CameraRecord {
    pub fn is_deleted(&self) -> bool {
        self.deleted.unwrap_or(false)
    }

    pub fn is_available(&self) -> bool {
        self.available.unwrap_or(false)
    }

    pub fn is_personal(&self) -> bool {
        self.camera_type.as_deref() == Some(PERSONAL_CAMERA_TYPE)
    }
}

/// 参与跨来源比较的摄像头字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CameraField {
    Name,
    IpAddress,
    Available,
}

impl CameraField {
    pub const ALL: [CameraField; 3] = [
        CameraField::Name,
        CameraField::IpAddress,
        CameraField::Available,
    ];
}

/// 单个字段两侧的取值；缺失一侧为 None。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDiff {
    pub erp_value: Option<Value>,
    pub cache_value: Option<Value>,
}

/// 单个摄像头的差异。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraDifference {
    pub camera_id: i64,
    pub present_in_cache: bool,
    pub present_in_erp: bool,
    pub field_diffs: BTreeMap<CameraField, FieldDiff>,
}

/// 视频服务返回的流状态。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamStatus {
    pub name: String,
    pub title: String,
    pub alive: Option<bool>,
    pub running: Option<bool>,
    pub bytes_in: Option<i64>,
}

/// 流检查结果分类。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamCheckReport {
    pub failed_alive_checks: Vec<String>,
    pub failed_running_checks: Vec<String>,
    pub invalid_bytes_in: Vec<String>,
    pub errors: Vec<String>,
}

impl StreamCheckReport {
    pub fn issue_count(&self) -> usize {
        self.failed_alive_checks.len() + self.failed_running_checks.len() + self.invalid_bytes_in.len()
    }
}

/// 按服务名聚合的摄像头服务。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCount {
    pub service_name: String,
    pub count: i64,
    pub status: Option<String>,
    pub archive_days: Option<i64>,
    pub available: Option<bool>,
}

/// 1C 计费中的视频服务行。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingServiceLine {
    pub name: String,
    pub status: String,
    pub count: i64,
    pub price: f64,
}

/// 服务差异（可读描述）。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDifferenceReport {
    pub missing_in_camera_set: Vec<String>,
    pub missing_in_erp_set: Vec<String>,
    pub count_mismatches: Vec<String>,
    pub status_mismatches: Vec<String>,
}

impl ServiceDifferenceReport {
    pub fn entry_count(&self) -> usize {
        self.missing_in_camera_set.len()
            + self.missing_in_erp_set.len()
            + self.count_mismatches.len()
            + self.status_mismatches.len()
    }
}

/// 摄像头页面的完整报告。
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraReport {
    pub billing_services: Vec<BillingServiceLine>,
    pub erp_cameras: Option<Vec<CameraRecord>>,
    pub cache_cameras: Vec<CameraRecord>,
    pub stream_checks: StreamCheckReport,
    pub stream_statuses: Vec<StreamStatus>,
    pub camera_differences: Option<Vec<CameraDifference>>,
    pub service_differences: Option<ServiceDifferenceReport>,
    pub warnings: Vec<String>,
}
