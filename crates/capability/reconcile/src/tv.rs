//! TV 订阅对账。
//!
//! 1C 行按顺序处理：某运营商第一次出现的行（或任意 24ТВ 行）是主行，
//! 填充快照并登记一次运营商拉取；其余行只追加计费服务。
//! 拉取计划带运营商标记并去重，结果按计划逐项回填，不依赖下标对齐。

use crate::error::ReconcileError;
use crate::fanout::settle_all;
use diag_sources::{ErpSource, SourceError, TvFixEndpoint, TvProviders};
use diag_telemetry::{
    record_discrepancies, record_fix_attempt, record_fix_failure, record_source_failure,
    record_tv_run,
};
use domain::tv::STATUS_ACTIVE;
use domain::{
    ErpTvServiceRow, FixAttempt, FixStatus, FixSummary, OperatorDetails, ServiceKey, ServiceTuple,
    Tv24Phone, TvDiscrepancy, TvFamily, TvOperator, TvOperatorSnapshot, TvReport,
};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

pub const DATA_MISMATCH: &str = "data mismatch";
pub const SECONDARY_PHONE_ACTIVE: &str = "service is connected on an additional phone";
const ERP_ERROR_KEY: &str = "erp";

/// 一次运营商拉取。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderFetch {
    Smotreshka { login: String },
    Tv24 { user_id: String, operator: TvOperator },
    Tvip { user_id: String, service_name: String },
    /// 副号上是否仍有有效订阅。
    Tv24Secondary { user_id: String, operator: TvOperator },
    ParentalCode { user_id: String, operator: TvOperator },
}

impl ProviderFetch {
    pub fn family(&self) -> TvFamily {
        match self {
            ProviderFetch::Smotreshka { .. } => TvFamily::Smotreshka,
            ProviderFetch::Tvip { .. } => TvFamily::Tvip,
            ProviderFetch::Tv24 { .. }
            | ProviderFetch::Tv24Secondary { .. }
            | ProviderFetch::ParentalCode { .. } => TvFamily::Tv24,
        }
    }
}

/// 快照构建结果与待执行的拉取计划。
#[derive(Debug, Clone, PartialEq)]
pub struct TvPlan {
    pub report: TvReport,
    pub fetches: Vec<ProviderFetch>,
}

#[derive(Debug)]
enum FetchOutcome {
    Services(Vec<ServiceTuple>),
    ParentalCode(Option<String>),
}

fn billing_service(row: &ErpTvServiceRow) -> Result<ServiceTuple, String> {
    let id = row
        .service_id
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid service id '{}'", row.service_id))?;
    Ok(ServiceTuple {
        id,
        name: row.service.clone(),
        status: row.status.clone(),
    })
}

fn schedule(fetches: &mut Vec<ProviderFetch>, fetch: ProviderFetch) {
    if !fetches.contains(&fetch) {
        fetches.push(fetch);
    }
}

/// 处理 1C 行，得到快照与拉取计划。
pub fn plan(login: &str, rows: &[ErpTvServiceRow]) -> TvPlan {
    let mut report = TvReport::new(login);
    let mut fetches = Vec::new();
    let mut seen: HashSet<TvOperator> = HashSet::new();

    for row in rows {
        let Some(operator) = TvOperator::from_wire(&row.operator) else {
            warn!(target: "diag.reconcile", login, operator = %row.operator, "tv_operator_unknown");
            continue;
        };
        let secondary = row.is_secondary_phone();
        let family = operator.family();

        // 24ТВ 副号行不进入计费列表
        let service = if family == TvFamily::Tv24 && secondary {
            None
        } else {
            match billing_service(row) {
                Ok(service) => Some(service),
                Err(message) => {
                    report
                        .errors
                        .insert(operator.wire_name().to_string(), message);
                    continue;
                }
            }
        };
        // 只有被接受的行才占用运营商的主行位置
        let primary = !seen.contains(&operator) || operator.is_tv24();
        seen.insert(operator);

        let snapshot = report.snapshot_mut(family);
        if !primary {
            snapshot.billing_services.extend(service);
            continue;
        }

        match family {
            TvFamily::Smotreshka => {
                fill_credentials(snapshot, row);
                snapshot.billing_services.extend(service);
                snapshot.details = OperatorDetails::Smotreshka {
                    not_turnoff_if_not_used: Some(row.not_turnoff_if_not_used),
                    ban_on_app: Some(row.ban_on_app),
                };
                if !secondary {
                    schedule(
                        &mut fetches,
                        ProviderFetch::Smotreshka {
                            login: row.login.clone(),
                        },
                    );
                }
            }
            TvFamily::Tvip => {
                fill_credentials(snapshot, row);
                snapshot.billing_services.extend(service);
                if !secondary {
                    schedule(
                        &mut fetches,
                        ProviderFetch::Tvip {
                            user_id: row.user_id.clone(),
                            service_name: row.service.clone(),
                        },
                    );
                }
            }
            TvFamily::Tv24 => {
                let phone = Tv24Phone {
                    phone: row.login.clone(),
                    operator,
                };
                if let OperatorDetails::Tv24 {
                    phone: primary_phone,
                    additional_phones,
                    is_krd,
                    ban_on_app,
                    ..
                } = &mut snapshot.details
                {
                    *is_krd = Some(operator == TvOperator::Tv24Krd);
                    if secondary {
                        additional_phones.push(phone);
                    } else {
                        *primary_phone = Some(phone);
                        *ban_on_app = row.ban_on_app;
                    }
                }
                snapshot.billing_services.extend(service);
                schedule(
                    &mut fetches,
                    ProviderFetch::ParentalCode {
                        user_id: row.user_id.clone(),
                        operator,
                    },
                );
                let fetch = if secondary {
                    ProviderFetch::Tv24Secondary {
                        user_id: row.user_id.clone(),
                        operator,
                    }
                } else {
                    ProviderFetch::Tv24 {
                        user_id: row.user_id.clone(),
                        operator,
                    }
                };
                schedule(&mut fetches, fetch);
            }
        }
    }
    TvPlan { report, fetches }
}

fn fill_credentials(snapshot: &mut TvOperatorSnapshot, row: &ErpTvServiceRow) {
    snapshot.login = Some(row.login.clone());
    snapshot.password = Some(row.password.clone());
}

/// 计费侧只比较 id 非零且状态有效的服务。
pub fn billing_keys(billing: &[ServiceTuple]) -> BTreeSet<ServiceKey> {
    billing
        .iter()
        .filter(|service| service.id != 0 && service.status == STATUS_ACTIVE)
        .map(|service| ServiceKey {
            id: service.id,
            status: service.status.clone(),
        })
        .collect()
}

pub fn provider_keys(provider: &[ServiceTuple]) -> BTreeSet<ServiceKey> {
    provider
        .iter()
        .map(|service| ServiceKey {
            id: service.id,
            status: service.status.clone(),
        })
        .collect()
}

pub fn services_match(billing: &[ServiceTuple], provider: &[ServiceTuple]) -> bool {
    billing_keys(billing) == provider_keys(provider)
}

/// 不一致时把快照标记为 `data mismatch`。
pub fn compare_snapshot(snapshot: &mut TvOperatorSnapshot) -> bool {
    let matched = services_match(&snapshot.billing_services, &snapshot.provider_services);
    if !matched {
        snapshot.error = Some(DATA_MISMATCH.to_string());
    }
    matched
}

fn tv24_operator(snapshot: &TvOperatorSnapshot) -> TvOperator {
    match &snapshot.details {
        OperatorDetails::Tv24 {
            phone: Some(phone), ..
        } => phone.operator,
        OperatorDetails::Tv24 {
            is_krd: Some(true), ..
        } => TvOperator::Tv24Krd,
        _ => TvOperator::Tv24,
    }
}

/// 对标记为不一致的运营商重新计算两侧差集。
pub fn detect_discrepancies(report: &TvReport) -> Vec<TvDiscrepancy> {
    TvFamily::ALL
        .into_iter()
        .filter_map(|family| {
            let snapshot = report.snapshot(family);
            if snapshot.error.as_deref() != Some(DATA_MISMATCH) {
                return None;
            }
            let billing = billing_keys(&snapshot.billing_services);
            let provider = provider_keys(&snapshot.provider_services);
            let missing_in_provider: Vec<ServiceKey> =
                billing.difference(&provider).cloned().collect();
            let extra_in_provider: Vec<ServiceKey> =
                provider.difference(&billing).cloned().collect();
            if missing_in_provider.is_empty() && extra_in_provider.is_empty() {
                return None;
            }
            let operator = match family {
                TvFamily::Smotreshka => TvOperator::Smotreshka,
                TvFamily::Tvip => TvOperator::Tvip,
                TvFamily::Tv24 => tv24_operator(snapshot),
            };
            Some(TvDiscrepancy {
                family,
                operator,
                missing_in_provider,
                extra_in_provider,
            })
        })
        .collect()
}

/// TV 页面编排与重同步流程。
pub struct TvEngine {
    erp: Arc<dyn ErpSource>,
    providers: Arc<dyn TvProviders>,
    fix: Arc<dyn TvFixEndpoint>,
}

impl TvEngine {
    pub fn new(
        erp: Arc<dyn ErpSource>,
        providers: Arc<dyn TvProviders>,
        fix: Arc<dyn TvFixEndpoint>,
    ) -> Self {
        Self {
            erp,
            providers,
            fix,
        }
    }

    async fn run(&self, fetch: &ProviderFetch) -> Result<FetchOutcome, SourceError> {
        let outcome = match fetch {
            ProviderFetch::Smotreshka { login } => {
                FetchOutcome::Services(self.providers.smotreshka_services(login).await?)
            }
            ProviderFetch::Tv24 { user_id, operator }
            | ProviderFetch::Tv24Secondary { user_id, operator } => {
                FetchOutcome::Services(self.providers.tv24_services(user_id, *operator).await?)
            }
            ProviderFetch::Tvip {
                user_id,
                service_name,
            } => FetchOutcome::Services(self.providers.tvip_services(user_id, service_name).await?),
            ProviderFetch::ParentalCode { user_id, operator } => FetchOutcome::ParentalCode(
                self.providers.tv24_parental_code(user_id, *operator).await?,
            ),
        };
        Ok(outcome)
    }

    pub async fn report(&self, login: &str) -> Result<TvReport, ReconcileError> {
        record_tv_run();
        let rows = match self.erp.tv_services(login).await {
            Ok(rows) => rows,
            Err(err) => {
                record_source_failure();
                warn!(target: "diag.reconcile", source_name = "erp", login, error = %err, "source_failed");
                let mut report = TvReport::new(login);
                report
                    .errors
                    .insert(ERP_ERROR_KEY.to_string(), format!("failed to fetch ERP data: {err}"));
                return Ok(report);
            }
        };
        if rows.is_empty() {
            let mut report = TvReport::new(login);
            report
                .errors
                .insert(ERP_ERROR_KEY.to_string(), "no TV services in ERP".to_string());
            return Ok(report);
        }

        let TvPlan {
            mut report,
            fetches,
        } = plan(login, &rows);
        let results = settle_all(fetches.iter().map(|fetch| self.run(fetch))).await;

        let mut compared: BTreeSet<TvFamily> = BTreeSet::new();
        let mut failed: BTreeSet<TvFamily> = BTreeSet::new();
        for (fetch, result) in fetches.iter().zip(results) {
            let family = fetch.family();
            match (fetch, result) {
                (ProviderFetch::ParentalCode { .. }, result) => {
                    let code = match result {
                        Ok(FetchOutcome::ParentalCode(code)) => code,
                        Ok(FetchOutcome::Services(_)) => None,
                        Err(err) => {
                            record_source_failure();
                            warn!(target: "diag.reconcile", source_name = "tv24", login, error = %err, "parental_code_failed");
                            None
                        }
                    };
                    if let OperatorDetails::Tv24 { parental_code, .. } = &mut report.tv24.details {
                        *parental_code = code;
                    }
                }
                (ProviderFetch::Tv24Secondary { .. }, result) => match result {
                    Ok(FetchOutcome::Services(services)) => {
                        if services.iter().any(|service| service.status == STATUS_ACTIVE) {
                            report.tv24.error = Some(SECONDARY_PHONE_ACTIVE.to_string());
                        }
                    }
                    Ok(FetchOutcome::ParentalCode(_)) => {}
                    Err(err) => {
                        record_source_failure();
                        warn!(target: "diag.reconcile", source_name = "tv24", login, error = %err, "secondary_phone_failed");
                    }
                },
                (_, Ok(FetchOutcome::Services(services))) => {
                    report
                        .snapshot_mut(family)
                        .provider_services
                        .extend(services);
                    compared.insert(family);
                }
                (_, Ok(FetchOutcome::ParentalCode(_))) => {}
                (_, Err(err)) => {
                    record_source_failure();
                    warn!(target: "diag.reconcile", source_name = family.as_str(), login, error = %err, "source_failed");
                    report.snapshot_mut(family).error =
                        Some(format!("provider request failed: {err}"));
                    failed.insert(family);
                }
            }
        }

        let mut mismatches = 0u64;
        for family in compared.difference(&failed) {
            if !compare_snapshot(report.snapshot_mut(*family)) {
                mismatches += 1;
            }
        }
        record_discrepancies(mismatches);
        info!(target: "diag.reconcile", login, mismatches, "tv_reconciled");
        Ok(report)
    }

    /// 对每个不一致的运营商调用重同步接口；单个失败只记在该运营商的结果中。
    pub async fn fix(&self, login: &str) -> Result<FixSummary, ReconcileError> {
        let report = self.report(login).await?;
        let discrepancies = detect_discrepancies(&report);
        let results = settle_all(
            discrepancies
                .iter()
                .map(|discrepancy| self.fix.correct(login, discrepancy.operator)),
        )
        .await;

        let attempts: Vec<FixAttempt> = discrepancies
            .iter()
            .zip(results)
            .map(|(discrepancy, result)| {
                record_fix_attempt();
                let message = result.err().map(|err| {
                    record_fix_failure();
                    warn!(target: "diag.reconcile", login, operator = %discrepancy.operator, error = %err, "tv_fix_failed");
                    err.to_string()
                });
                FixAttempt {
                    family: discrepancy.family,
                    operator: discrepancy.operator,
                    success: message.is_none(),
                    message,
                }
            })
            .collect();
        let status = FixStatus::from_attempts(&attempts);
        info!(target: "diag.reconcile", login, attempts = attempts.len(), ?status, "tv_fix_finished");

        Ok(FixSummary {
            login: login.to_string(),
            status,
            discrepancies,
            attempts,
            errors: report.errors,
        })
    }
}
