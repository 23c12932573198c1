//! 对讲/门禁模型。

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// 对账关注的服务类别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntercomCategory {
    Barrier,
    Intercom,
    IntercomHandset,
}

impl IntercomCategory {
    pub const ALL: [IntercomCategory; 3] = [
        IntercomCategory::Barrier,
        IntercomCategory::Intercom,
        IntercomCategory::IntercomHandset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntercomCategory::Barrier => "barrier",
            IntercomCategory::Intercom => "intercom",
            IntercomCategory::IntercomHandset => "intercomhandset",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value.trim())
    }
}

impl fmt::Display for IntercomCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryMatch {
    Match,
    Discrepancy,
    OnlyInErp,
    OnlyInCache,
    Missing,
    Error,
}

impl CategoryMatch {
    /// 需要提示更新缓存的状态。
    pub fn needs_update(&self) -> bool {
        matches!(
            self,
            CategoryMatch::Discrepancy | CategoryMatch::OnlyInErp | CategoryMatch::OnlyInCache
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntercomCategoryStatus {
    pub category: IntercomCategory,
    pub erp_expiry: Option<i64>,
    pub cache_expiry: Option<i64>,
    pub status: CategoryMatch,
    pub service_name: Option<String>,
}

impl IntercomCategoryStatus {
    pub fn missing(category: IntercomCategory) -> Self {
        Self {
            category,
            erp_expiry: None,
            cache_expiry: None,
            status: CategoryMatch::Missing,
            service_name: None,
        }
    }
}

/// 1C 对讲服务行；`category` 可能是逗号分隔的多个类别。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErpIntercomRow {
    pub service: Option<String>,
    pub category: Option<String>,
    pub time_to: Option<String>,
}

/// 通行事件类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassageEvent {
    MissedCall,
    AnsweredCall,
    OpenedByKey,
    OpenedFromApp,
    OpenedByFace,
    OpenedByCode,
    GateOpenedByCall,
    Unknown,
}

impl PassageEvent {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => PassageEvent::MissedCall,
            2 => PassageEvent::AnsweredCall,
            3 => PassageEvent::OpenedByKey,
            4 => PassageEvent::OpenedFromApp,
            5 => PassageEvent::OpenedByFace,
            6 => PassageEvent::OpenedByCode,
            7 => PassageEvent::GateOpenedByCall,
            _ => PassageEvent::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PassageEvent::MissedCall => "missed call",
            PassageEvent::AnsweredCall => "answered call",
            PassageEvent::OpenedByKey => "opened by key",
            PassageEvent::OpenedFromApp => "opened from app",
            PassageEvent::OpenedByFace => "opened by face",
            PassageEvent::OpenedByCode => "opened by code",
            PassageEvent::GateOpenedByCall => "gate opened by call",
            PassageEvent::Unknown => "unknown event",
        }
    }
}

/// 通行记录。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Passage {
    pub timestamp: NaiveDateTime,
    pub location_description: String,
    pub event_type: String,
}

/// RBT 中单套房的门禁设置。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApsSettings {
    pub house_flat_id: i64,
    pub address_house_id: i64,
    pub manual_block: Option<bool>,
    pub auto_block: Option<bool>,
    pub open_code: Option<String>,
    pub white_rabbit: Option<bool>,
    pub admin_block: Option<bool>,
}

/// 对讲页面报告。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntercomReport {
    pub login: String,
    pub categories: Vec<IntercomCategoryStatus>,
    pub warnings: Vec<String>,
    pub update_instructions: Option<String>,
    pub aps_settings: Option<ApsSettings>,
    pub rbt_link: Option<String>,
    pub passages: Vec<Passage>,
}

/// 解除手动封锁的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualBlockOutcome {
    Cleared,
    AlreadyCleared,
}

impl ManualBlockOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, ManualBlockOutcome::Cleared)
    }
}
