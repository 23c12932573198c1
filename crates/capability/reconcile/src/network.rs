//! 网络会话对账：RADIUS 行 vs 缓存登录文档。

use crate::error::ReconcileError;
use crate::fanout::settled;
use crate::time::{local_to_utc, offset_hours};
use chrono::{DateTime, FixedOffset, Utc};
use diag_storage::{CacheStore, RadiusStore};
use diag_telemetry::{record_discrepancies, record_network_run};
use domain::login::{integer_field, text_field};
use domain::{
    LoginDocument, NetworkField, NetworkFieldDiff, NetworkReport, NetworkSnapshot, NetworkSource,
    RadiusSession, RawExpiry,
};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// 到期时间比较容差（秒）。
pub const TIME_TOLERANCE_SECONDS: i64 = 2 * 3600;
pub const PASSWORD_MASK: &str = "***";
const INTERNET_CATEGORY: &str = "internet";

/// 解析 RADIUS 的 json_data；格式错误或非对象时返回空对象。
pub fn parse_json_data(raw: Option<&str>) -> Map<String, Value> {
    match raw.map(serde_json::from_str::<Value>) {
        Some(Ok(Value::Object(object))) => object,
        _ => Map::new(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(object) => !object.is_empty(),
    }
}

/// 缓存 `servicecats.internet.timeto`：数字（或数字字符串）为 epoch 秒，其余保留原值。
pub fn cache_expiry(value: Option<&Value>) -> RawExpiry {
    let Some(value) = value else {
        return RawExpiry::Absent;
    };
    let seconds = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|value| value as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    match seconds.and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0)) {
        Some(moment) => RawExpiry::Timestamp(moment),
        None => RawExpiry::Opaque(value.clone()),
    }
}

/// 时间戳与当前时间比较；非时间戳的取值按真值判断。
pub fn is_active(expiry: &RawExpiry, now: DateTime<Utc>) -> bool {
    match expiry {
        RawExpiry::Timestamp(moment) => *moment > now,
        RawExpiry::Opaque(value) => truthy(value),
        RawExpiry::Absent => false,
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

pub fn radius_snapshot(
    session: &RadiusSession,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> NetworkSnapshot {
    let json_data = parse_json_data(session.json_data.as_deref());
    let expiry = session
        .time_to
        .and_then(|naive| local_to_utc(naive, offset))
        .map_or(RawExpiry::Absent, RawExpiry::Timestamp);
    NetworkSnapshot {
        source: NetworkSource::Radius,
        gmt: normalized(session.gmt.as_deref()),
        ip_address: normalized(session.ip_address.as_deref()),
        onu_mac: normalized(session.onu_mac.as_deref()),
        mac_address: text_field(&json_data, "mac"),
        vlan: integer_field(&json_data, "vlan"),
        active: is_active(&expiry, now),
        expiry,
        raw_extra: json_data,
    }
}

pub fn cache_snapshot(document: &LoginDocument, now: DateTime<Utc>) -> NetworkSnapshot {
    let expiry = cache_expiry(document.category_expiry(INTERNET_CATEGORY));
    NetworkSnapshot {
        source: NetworkSource::Cache,
        gmt: normalized(document.gmt.as_deref()),
        ip_address: normalized(document.ip_addr.as_deref()),
        onu_mac: normalized(document.onu_mac.as_deref()),
        mac_address: normalized(document.mac.as_deref()),
        // vlan 为 0 表示未设置
        vlan: document.vlan.filter(|vlan| *vlan != 0),
        active: is_active(&expiry, now),
        expiry,
        raw_extra: document.extra.clone(),
    }
}

fn expiry_value(expiry: &RawExpiry) -> Value {
    match expiry {
        RawExpiry::Timestamp(moment) => json!(moment.to_rfc3339()),
        RawExpiry::Opaque(value) => value.clone(),
        RawExpiry::Absent => Value::Null,
    }
}

fn expiry_differs(radius: &RawExpiry, cache: &RawExpiry) -> bool {
    match (radius, cache) {
        (RawExpiry::Timestamp(left), RawExpiry::Timestamp(right)) => {
            (*left - *right).num_seconds().abs() > TIME_TOLERANCE_SECONDS
        }
        (RawExpiry::Absent, RawExpiry::Absent) => false,
        _ => true,
    }
}

fn push_diff(
    differences: &mut BTreeMap<NetworkField, NetworkFieldDiff>,
    field: NetworkField,
    radius_value: Value,
    cache_value: Value,
) {
    if radius_value != cache_value {
        differences.insert(
            field,
            NetworkFieldDiff {
                radius_value,
                cache_value,
            },
        );
    }
}

fn mask(value: &Option<String>) -> Value {
    value.as_ref().map_or(Value::Null, |_| json!(PASSWORD_MASK))
}

/// 逐字段比较两侧快照；密码只报告是否不同。
pub fn network_differences(
    session: &RadiusSession,
    radius: &NetworkSnapshot,
    document: &LoginDocument,
    cache: &NetworkSnapshot,
) -> BTreeMap<NetworkField, NetworkFieldDiff> {
    let mut differences = BTreeMap::new();

    let radius_password = normalized(session.password.as_deref());
    let cache_password = normalized(document.password.as_deref());
    if radius_password != cache_password {
        differences.insert(
            NetworkField::Password,
            NetworkFieldDiff {
                radius_value: mask(&radius_password),
                cache_value: mask(&cache_password),
            },
        );
    }

    for (field, left, right) in [
        (NetworkField::Gmt, &radius.gmt, &cache.gmt),
        (NetworkField::IpAddr, &radius.ip_address, &cache.ip_address),
        (NetworkField::OnuMac, &radius.onu_mac, &cache.onu_mac),
        (NetworkField::Mac, &radius.mac_address, &cache.mac_address),
    ] {
        push_diff(&mut differences, field, json!(left), json!(right));
    }
    push_diff(
        &mut differences,
        NetworkField::Vlan,
        json!(radius.vlan),
        json!(cache.vlan),
    );

    if expiry_differs(&radius.expiry, &cache.expiry) {
        differences.insert(
            NetworkField::TimeTo,
            NetworkFieldDiff {
                radius_value: expiry_value(&radius.expiry),
                cache_value: expiry_value(&cache.expiry),
            },
        );
    }
    differences
}

/// 四种分支：两侧均有、仅 RADIUS、仅缓存、均无（NotFound）。
pub fn reconcile_network(
    login: &str,
    session: Option<&RadiusSession>,
    document: Option<&LoginDocument>,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> Result<NetworkReport, ReconcileError> {
    let radius = session.map(|session| radius_snapshot(session, offset, now));
    let cache = document.map(|document| cache_snapshot(document, now));
    let mut warnings = Vec::new();
    let differences = match (session, &radius, document, &cache) {
        (Some(session), Some(radius), Some(document), Some(cache)) => {
            Some(network_differences(session, radius, document, cache))
        }
        (Some(_), _, None, _) => {
            warnings.push("cache data unavailable".to_string());
            None
        }
        (None, _, Some(_), _) => {
            warnings.push("radius data unavailable".to_string());
            None
        }
        _ => {
            return Err(ReconcileError::NotFound(format!(
                "no data found for login {login}"
            )));
        }
    };
    Ok(NetworkReport {
        login: login.to_string(),
        radius,
        cache,
        differences,
        warnings,
    })
}

/// 网络页面编排。
pub struct NetworkEngine {
    radius: Arc<dyn RadiusStore>,
    cache: Arc<dyn CacheStore>,
    radius_offset: FixedOffset,
}

impl NetworkEngine {
    pub fn new(
        radius: Arc<dyn RadiusStore>,
        cache: Arc<dyn CacheStore>,
        radius_utc_offset_hours: i32,
    ) -> Self {
        Self {
            radius,
            cache,
            radius_offset: offset_hours(radius_utc_offset_hours),
        }
    }

    pub async fn report(&self, login: &str) -> Result<NetworkReport, ReconcileError> {
        record_network_run();
        let (radius_result, cache_result) = futures::join!(
            self.radius.find_session(login),
            self.cache.login_document(login)
        );
        let session = settled("radius", login, radius_result).flatten();
        let document = settled("cache", login, cache_result).flatten();
        let report = reconcile_network(
            login,
            session.as_ref(),
            document.as_ref(),
            self.radius_offset,
            Utc::now(),
        )?;
        let difference_count = report.differences.as_ref().map_or(0, BTreeMap::len);
        record_discrepancies(difference_count as u64);
        info!(target: "diag.reconcile", login, differences = difference_count, "network_reconciled");
        Ok(report)
    }
}
