//! 网络会话模型（RADIUS 与缓存）。

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// RADIUS 库中的会话行（已去除空值哨兵）。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadiusSession {
    pub password: Option<String>,
    pub gmt: Option<String>,
    pub ip_address: Option<String>,
    /// RADIUS 所在时区的本地时间（无时区）。
    pub time_to: Option<NaiveDateTime>,
    pub onu_mac: Option<String>,
    pub json_data: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NetworkSource {
    Radius,
    Cache,
}

/// 到期时间原始形态。
///
/// 非数字时间戳的值保留为 `Opaque`，活跃判定按真值处理。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawExpiry {
    Timestamp(DateTime<Utc>),
    Opaque(Value),
    Absent,
}

/// 单一来源的网络会话快照（不含密码）。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSnapshot {
    pub source: NetworkSource,
    pub gmt: Option<String>,
    pub ip_address: Option<String>,
    pub onu_mac: Option<String>,
    pub mac_address: Option<String>,
    pub vlan: Option<i64>,
    pub expiry: RawExpiry,
    pub active: bool,
    pub raw_extra: Map<String, Value>,
}

/// 参与比较的会话字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum NetworkField {
    #[serde(rename = "password")]
    Password,
    #[serde(rename = "GMT")]
    Gmt,
    #[serde(rename = "ip_addr")]
    IpAddr,
    #[serde(rename = "time_to")]
    TimeTo,
    #[serde(rename = "onu_mac")]
    OnuMac,
    #[serde(rename = "mac")]
    Mac,
    #[serde(rename = "vlan")]
    Vlan,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkFieldDiff {
    pub radius_value: Value,
    pub cache_value: Value,
}

/// 网络页面报告。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkReport {
    pub login: String,
    pub radius: Option<NetworkSnapshot>,
    pub cache: Option<NetworkSnapshot>,
    pub differences: Option<BTreeMap<NetworkField, NetworkFieldDiff>>,
    pub warnings: Vec<String>,
}
