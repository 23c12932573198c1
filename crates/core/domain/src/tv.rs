//! TV 订阅模型。

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// 1C 与运营商共用的“有效”状态取值。
pub const STATUS_ACTIVE: &str = "Активный";
/// 运营商订阅已过期。
pub const STATUS_INACTIVE: &str = "Неактивный";
/// 1C 中标记 TV24 副号行的密码取值。
pub const SECONDARY_PHONE_PASSWORD: &str = "Второй номер";

/// 1C 中的运营商。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TvOperator {
    #[serde(rename = "Смотрешка")]
    Smotreshka,
    #[serde(rename = "24ТВ")]
    Tv24,
    #[serde(rename = "24ТВ КРД")]
    Tv24Krd,
    #[serde(rename = "ТВИП")]
    Tvip,
}

impl TvOperator {
    pub const ALL: [TvOperator; 4] = [
        TvOperator::Smotreshka,
        TvOperator::Tv24,
        TvOperator::Tv24Krd,
        TvOperator::Tvip,
    ];

    pub fn wire_name(&self) -> &'static str {
        match self {
            TvOperator::Smotreshka => "Смотрешка",
            TvOperator::Tv24 => "24ТВ",
            TvOperator::Tv24Krd => "24ТВ КРД",
            TvOperator::Tvip => "ТВИП",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|operator| operator.wire_name() == value)
    }

    pub fn family(&self) -> TvFamily {
        match self {
            TvOperator::Smotreshka => TvFamily::Smotreshka,
            TvOperator::Tv24 | TvOperator::Tv24Krd => TvFamily::Tv24,
            TvOperator::Tvip => TvFamily::Tvip,
        }
    }

    pub fn is_tv24(&self) -> bool {
        self.family() == TvFamily::Tv24
    }
}

impl fmt::Display for TvOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// 报告中的运营商分组（两个 TV24 变体共用一个快照）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TvFamily {
    Smotreshka,
    Tv24,
    Tvip,
}

impl TvFamily {
    pub const ALL: [TvFamily; 3] = [TvFamily::Smotreshka, TvFamily::Tv24, TvFamily::Tvip];

    pub fn as_str(&self) -> &'static str {
        match self {
            TvFamily::Smotreshka => "smotreshka",
            TvFamily::Tv24 => "tv24",
            TvFamily::Tvip => "tvip",
        }
    }
}

/// 服务三元组。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceTuple {
    pub id: i64,
    pub name: String,
    pub status: String,
}

/// 比较用的 `(id, status)` 键。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ServiceKey {
    pub id: i64,
    pub status: String,
}

/// 1C 返回的 TV 服务行。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErpTvServiceRow {
    pub service: String,
    pub status: String,
    pub login: String,
    pub password: String,
    pub operator: String,
    pub user_id: String,
    pub service_id: String,
    pub not_turnoff_if_not_used: bool,
    pub ban_on_app: bool,
}

impl ErpTvServiceRow {
    pub fn is_secondary_phone(&self) -> bool {
        self.password == SECONDARY_PHONE_PASSWORD
    }
}

/// TV24 号码及其区域变体。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tv24Phone {
    pub phone: String,
    pub operator: TvOperator,
}

/// 运营商特有字段。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OperatorDetails {
    #[serde(rename_all = "camelCase")]
    Smotreshka {
        not_turnoff_if_not_used: Option<bool>,
        ban_on_app: Option<bool>,
    },
    #[serde(rename_all = "camelCase")]
    Tv24 {
        phone: Option<Tv24Phone>,
        additional_phones: Vec<Tv24Phone>,
        parental_code: Option<String>,
        is_krd: Option<bool>,
        ban_on_app: bool,
    },
    Tvip,
}

/// 单个运营商的快照。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TvOperatorSnapshot {
    pub login: Option<String>,
    pub password: Option<String>,
    pub billing_services: Vec<ServiceTuple>,
    pub provider_services: Vec<ServiceTuple>,
    pub error: Option<String>,
    pub details: OperatorDetails,
}

impl TvOperatorSnapshot {
    pub fn empty(family: TvFamily) -> Self {
        let details = match family {
            TvFamily::Smotreshka => OperatorDetails::Smotreshka {
                not_turnoff_if_not_used: None,
                ban_on_app: None,
            },
            TvFamily::Tv24 => OperatorDetails::Tv24 {
                phone: None,
                additional_phones: Vec::new(),
                parental_code: None,
                is_krd: None,
                ban_on_app: false,
            },
            TvFamily::Tvip => OperatorDetails::Tvip,
        };
        Self {
            login: None,
            password: None,
            billing_services: Vec::new(),
            provider_services: Vec::new(),
            error: None,
            details,
        }
    }
}

/// TV 页面报告。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TvReport {
    pub login: String,
    pub smotreshka: TvOperatorSnapshot,
    pub tv24: TvOperatorSnapshot,
    pub tvip: TvOperatorSnapshot,
    pub errors: BTreeMap<String, String>,
}

impl TvReport {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            smotreshka: TvOperatorSnapshot::empty(TvFamily::Smotreshka),
            tv24: TvOperatorSnapshot::empty(TvFamily::Tv24),
            tvip: TvOperatorSnapshot::empty(TvFamily::Tvip),
            errors: BTreeMap::new(),
        }
    }

    pub fn snapshot(&self, family: TvFamily) -> &TvOperatorSnapshot {
        match family {
            TvFamily::Smotreshka => &self.smotreshka,
            TvFamily::Tv24 => &self.tv24,
            TvFamily::Tvip => &self.tvip,
        }
    }

    pub fn snapshot_mut(&mut self, family: TvFamily) -> &mut TvOperatorSnapshot {
        match family {
            TvFamily::Smotreshka => &mut self.smotreshka,
            TvFamily::Tv24 => &mut self.tv24,
            TvFamily::Tvip => &mut self.tvip,
        }
    }
}

/// 单个运营商的非对称差异。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TvDiscrepancy {
    pub family: TvFamily,
    pub operator: TvOperator,
    pub missing_in_provider: Vec<ServiceKey>,
    pub extra_in_provider: Vec<ServiceKey>,
}

/// 单次重同步调用结果。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixAttempt {
    pub family: TvFamily,
    pub operator: TvOperator,
    pub success: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixStatus {
    Success,
    PartialSuccess,
    Error,
    NothingToFix,
}

impl FixStatus {
    pub fn from_attempts(attempts: &[FixAttempt]) -> Self {
        let succeeded = attempts.iter().filter(|attempt| attempt.success).count();
        match (attempts.len(), succeeded) {
            (0, _) => FixStatus::NothingToFix,
            (total, ok) if ok == total => FixStatus::Success,
            (_, 0) => FixStatus::Error,
            _ => FixStatus::PartialSuccess,
        }
    }
}

/// 修复流程汇总。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixSummary {
    pub login: String,
    pub status: FixStatus,
    pub discrepancies: Vec<TvDiscrepancy>,
    pub attempts: Vec<FixAttempt>,
    pub errors: BTreeMap<String, String>,
}
