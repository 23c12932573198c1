//! 对讲/门禁对账：1C 类别到期日 vs 缓存 servicecats，附带 RBT 设置与通行记录。

use crate::error::ReconcileError;
use crate::fanout::{settle_all, settled};
use crate::time::{parse_erp_date, start_of_day, trailing_days};
use chrono::{Duration, NaiveDateTime, Utc};
use diag_sources::{ErpSource, PassageEntry, PassageProvider};
use diag_storage::{CacheStore, RbtStore};
use diag_telemetry::{
    record_discrepancies, record_intercom_run, record_passage_day_dropped, record_source_failure,
};
use domain::{
    CategoryMatch, ErpIntercomRow, IntercomCategory, IntercomCategoryStatus, IntercomReport,
    LoginDocument, ManualBlockOutcome, Passage, PassageEvent,
};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

pub const RBT_DISABLED_WARNING: &str = "RBT is disabled for this login";
pub const UPDATE_INSTRUCTIONS: &str = "To refresh the cache:\n\
1. Open the contract card\n\
2. Go to 'Contract management'\n\
3. Open the 'Logins' tab\n\
4. Double-click the login row\n\
5. Click 'Save and close'\n\
The data is refreshed within 5 minutes.";
const PASSAGE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// 通行接口时钟偏差。
const PASSAGE_CLOCK_SHIFT_HOURS: i64 = 2;

fn epoch_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// 逐类别比较；日期格式错误只影响该类别。
pub fn compare_categories(
    erp_rows: &[ErpIntercomRow],
    document: Option<&LoginDocument>,
) -> (Vec<IntercomCategoryStatus>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut erp: HashMap<IntercomCategory, (i64, Option<String>)> = HashMap::new();
    let mut erp_errors: HashSet<IntercomCategory> = HashSet::new();

    for row in erp_rows {
        let categories = row
            .category
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(IntercomCategory::parse);
        for category in categories {
            match row.time_to.as_deref().and_then(parse_erp_date) {
                Some(expiry) => {
                    erp.insert(category, (expiry, row.service.clone()));
                }
                None => {
                    warnings.push(format!(
                        "invalid ERP date for {category}: '{}'",
                        row.time_to.as_deref().unwrap_or_default()
                    ));
                    erp_errors.insert(category);
                }
            }
        }
    }

    let mut cache: HashMap<IntercomCategory, i64> = HashMap::new();
    let mut cache_errors: HashSet<IntercomCategory> = HashSet::new();
    if let Some(document) = document {
        for category in IntercomCategory::ALL {
            let Some(value) = document.category_expiry(category.as_str()) else {
                continue;
            };
            match epoch_value(value) {
                Some(expiry) => {
                    cache.insert(category, expiry);
                }
                None => {
                    warnings.push(format!("invalid cache timeto for {category}: {value}"));
                    cache_errors.insert(category);
                }
            }
        }
    }

    let categories = IntercomCategory::ALL
        .into_iter()
        .map(|category| {
            let erp_entry = erp.get(&category);
            let cache_expiry = cache.get(&category).copied();
            let failed = erp_errors.contains(&category) || cache_errors.contains(&category);
            let status = match (erp_entry, cache_expiry) {
                (Some((erp_expiry, _)), Some(cache_expiry)) => {
                    match (start_of_day(*erp_expiry), start_of_day(cache_expiry)) {
                        (Some(left), Some(right)) if left == right => CategoryMatch::Match,
                        (Some(_), Some(_)) => CategoryMatch::Discrepancy,
                        _ => CategoryMatch::Error,
                    }
                }
                _ if failed => CategoryMatch::Error,
                (Some(_), None) => CategoryMatch::OnlyInErp,
                (None, Some(_)) => CategoryMatch::OnlyInCache,
                (None, None) => CategoryMatch::Missing,
            };
            IntercomCategoryStatus {
                category,
                erp_expiry: erp_entry.map(|(expiry, _)| *expiry),
                cache_expiry,
                status,
                service_name: erp_entry.and_then(|(_, service)| service.clone()),
            }
        })
        .collect();
    (categories, warnings)
}

/// 单条通行记录：时间修正 +2 小时，事件码映射为标签。
pub fn passage_from_entry(entry: &PassageEntry) -> Option<Passage> {
    let timestamp = NaiveDateTime::parse_from_str(entry.date.trim(), PASSAGE_DATE_FORMAT).ok()?;
    let event = entry
        .event_code()
        .map_or(PassageEvent::Unknown, PassageEvent::from_code);
    Some(Passage {
        timestamp: timestamp + Duration::hours(PASSAGE_CLOCK_SHIFT_HOURS),
        location_description: entry.mechanizma_description.clone().unwrap_or_default(),
        event_type: event.label().to_string(),
    })
}

pub fn rbt_link(rbt_web_url: &str, address_house_id: i64) -> String {
    format!(
        "{}/?#addresses.houses&houseId={}",
        rbt_web_url.trim_end_matches('/'),
        address_house_id
    )
}

fn disabled_report(login: &str) -> IntercomReport {
    IntercomReport {
        login: login.to_string(),
        categories: IntercomCategory::ALL
            .into_iter()
            .map(IntercomCategoryStatus::missing)
            .collect(),
        warnings: vec![RBT_DISABLED_WARNING.to_string()],
        update_instructions: None,
        aps_settings: None,
        rbt_link: None,
        passages: Vec::new(),
    }
}

/// 对讲页面编排与手动封锁修复。
pub struct IntercomEngine {
    erp: Arc<dyn ErpSource>,
    cache: Arc<dyn CacheStore>,
    rbt: Arc<dyn RbtStore>,
    passages: Arc<dyn PassageProvider>,
    rbt_web_url: String,
    passage_days: u64,
}

impl IntercomEngine {
    pub fn new(
        erp: Arc<dyn ErpSource>,
        cache: Arc<dyn CacheStore>,
        rbt: Arc<dyn RbtStore>,
        passages: Arc<dyn PassageProvider>,
        rbt_web_url: impl Into<String>,
        passage_days: u64,
    ) -> Self {
        Self {
            erp,
            cache,
            rbt,
            passages,
            rbt_web_url: rbt_web_url.into(),
            passage_days,
        }
    }

    pub async fn report(&self, login: &str) -> Result<IntercomReport, ReconcileError> {
        record_intercom_run();
        let (erp_result, cache_result) = futures::join!(
            self.erp.intercom_services(login),
            self.cache.login_document(login)
        );
        let erp_rows = settled("erp", login, erp_result);
        let document = settled("cache", login, cache_result).flatten();
        if erp_rows.is_none() && document.is_none() {
            return Err(ReconcileError::NotFound(format!(
                "no intercom data found for login {login}"
            )));
        }
        if document.as_ref().is_some_and(LoginDocument::rbt_disabled) {
            info!(target: "diag.reconcile", login, "intercom_rbt_disabled");
            return Ok(disabled_report(login));
        }

        let mut warnings = Vec::new();
        if erp_rows.is_none() {
            warnings.push("ERP intercom data unavailable".to_string());
        }
        if document.is_none() {
            warnings.push("cache data unavailable".to_string());
        }
        let (categories, category_warnings) =
            compare_categories(erp_rows.as_deref().unwrap_or_default(), document.as_ref());
        warnings.extend(category_warnings);

        let update_needed = categories
            .iter()
            .filter(|status| status.status.needs_update())
            .count();
        let update_instructions = (update_needed > 0).then(|| UPDATE_INSTRUCTIONS.to_string());

        let mut aps_settings = None;
        let mut link = None;
        let mut passages = Vec::new();
        match document.as_ref().and_then(LoginDocument::flat_id) {
            Some(flat_id) => {
                let (settings_result, flat_passages) = futures::join!(
                    self.rbt.find_aps_settings(flat_id),
                    self.passages(login, flat_id)
                );
                match settings_result {
                    Ok(Some(settings)) => {
                        link = Some(rbt_link(&self.rbt_web_url, settings.address_house_id));
                        aps_settings = Some(settings);
                    }
                    Ok(None) => warnings.push(format!("flat {flat_id} not found in RBT")),
                    Err(err) => {
                        record_source_failure();
                        warn!(target: "diag.reconcile", source_name = "rbt", login, error = %err, "source_failed");
                        warnings.push("RBT settings unavailable".to_string());
                    }
                }
                let (entries, passage_warnings) = flat_passages;
                passages = entries;
                warnings.extend(passage_warnings);
            }
            None if document.is_some() => {
                warnings.push("flatId missing in cache document".to_string());
            }
            None => {}
        }

        record_discrepancies(update_needed as u64);
        info!(
            target: "diag.reconcile",
            login,
            discrepancies = update_needed,
            passages = passages.len(),
            "intercom_reconciled"
        );
        Ok(IntercomReport {
            login: login.to_string(),
            categories,
            warnings,
            update_instructions,
            aps_settings,
            rbt_link: link,
            passages,
        })
    }

    /// 最近几天的通行记录；单日失败只丢弃该日。
    async fn passages(&self, login: &str, flat_id: i64) -> (Vec<Passage>, Vec<String>) {
        let token = match self.rbt.find_auth_token(flat_id).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                return (
                    Vec::new(),
                    vec![format!("RBT token not found for flat {flat_id}")],
                );
            }
            Err(err) => {
                record_source_failure();
                warn!(target: "diag.reconcile", source_name = "rbt", login, error = %err, "source_failed");
                return (Vec::new(), vec!["RBT token lookup failed".to_string()]);
            }
        };

        let days = trailing_days(Utc::now(), self.passage_days);
        let results = settle_all(
            days.iter()
                .map(|day| self.passages.passages_for_day(flat_id, *day, &token)),
        )
        .await;

        let mut passages = Vec::new();
        for (day, result) in days.iter().zip(results) {
            match result {
                Ok(entries) => {
                    for entry in &entries {
                        match passage_from_entry(entry) {
                            Some(passage) => passages.push(passage),
                            None => {
                                warn!(target: "diag.reconcile", flat_id, date = %entry.date, "passage_entry_skipped")
                            }
                        }
                    }
                }
                Err(err) => {
                    record_passage_day_dropped();
                    warn!(target: "diag.reconcile", flat_id, %day, error = %err, "passage_day_dropped");
                }
            }
        }
        (passages, Vec::new())
    }

    /// 解除手动封锁；套房不存在返回 NotFound。
    pub async fn fix_manual_block(
        &self,
        house_flat_id: i64,
    ) -> Result<ManualBlockOutcome, ReconcileError> {
        let outcome = self
            .rbt
            .clear_manual_block(house_flat_id)
            .await?
            .ok_or_else(|| ReconcileError::NotFound(format!("flat {house_flat_id} not found")))?;
        info!(target: "diag.reconcile", house_flat_id, changed = outcome.changed(), "manual_block_fixed");
        Ok(outcome)
    }
}
