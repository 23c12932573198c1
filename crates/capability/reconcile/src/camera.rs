//! 摄像头对账：1C vs 缓存，以及视频流状态检查。

use crate::error::ReconcileError;
use crate::fanout::{settle_all, settled};
use crate::services::service_differences;
use diag_sources::{ErpSource, StreamProvider};
use diag_storage::{CacheStore, CameraScope};
use diag_telemetry::{record_camera_run, record_discrepancies};
use domain::{
    CameraDifference, CameraField, CameraRecord, CameraReport, FieldDiff, LoginDocument,
    StreamCheckReport, StreamStatus,
};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::info;

fn field_value(camera: &CameraRecord, field: CameraField) -> Value {
    match field {
        CameraField::Name => json!(camera.name),
        CameraField::IpAddress => json!(camera.ip_address),
        CameraField::Available => json!(camera.available),
    }
}

fn one_sided(camera: &CameraRecord, in_erp: bool) -> CameraDifference {
    let field_diffs = CameraField::ALL
        .into_iter()
        .map(|field| {
            let value = Some(field_value(camera, field));
            let diff = if in_erp {
                FieldDiff {
                    erp_value: value,
                    cache_value: None,
                }
            } else {
                FieldDiff {
                    erp_value: None,
                    cache_value: value,
                }
            };
            (field, diff)
        })
        .collect();
    CameraDifference {
        camera_id: camera.id,
        present_in_cache: !in_erp,
        present_in_erp: in_erp,
        field_diffs,
    }
}

/// 按 id 比较两侧摄像头。
///
/// 任一侧为 None 时返回 None；没有差异时返回空列表。
pub fn camera_differences(
    erp: Option<&[CameraRecord]>,
    cache: Option<&[CameraRecord]>,
) -> Option<Vec<CameraDifference>> {
    let (erp, cache) = (erp?, cache?);
    let cache_by_id: HashMap<i64, &CameraRecord> =
        cache.iter().map(|camera| (camera.id, camera)).collect();
    // 已删除的 1C 摄像头不计入，缓存里仍保留的会报告为仅缓存存在
    let erp_ids: HashSet<i64> = erp
        .iter()
        .filter(|camera| !camera.is_deleted())
        .map(|camera| camera.id)
        .collect();
    let mut differences = Vec::new();

    for erp_camera in erp.iter().filter(|camera| !camera.is_deleted()) {
        let Some(cache_camera) = cache_by_id.get(&erp_camera.id) else {
            differences.push(one_sided(erp_camera, true));
            continue;
        };
        let field_diffs: BTreeMap<CameraField, FieldDiff> = CameraField::ALL
            .into_iter()
            .filter_map(|field| {
                let erp_value = field_value(erp_camera, field);
                let cache_value = field_value(cache_camera, field);
                (erp_value != cache_value).then(|| {
                    (
                        field,
                        FieldDiff {
                            erp_value: Some(erp_value),
                            cache_value: Some(cache_value),
                        },
                    )
                })
            })
            .collect();
        if !field_diffs.is_empty() {
            differences.push(CameraDifference {
                camera_id: erp_camera.id,
                present_in_cache: true,
                present_in_erp: true,
                field_diffs,
            });
        }
    }

    differences.extend(
        cache
            .iter()
            .filter(|camera| !erp_ids.contains(&camera.id))
            .map(|camera| one_sided(camera, false)),
    );
    Some(differences)
}

/// 并发检查每个可用摄像头的流状态；单个失败记入 `errors`，不中断其他摄像头。
pub async fn check_streams(
    provider: &dyn StreamProvider,
    cameras: &[CameraRecord],
) -> (StreamCheckReport, Vec<StreamStatus>) {
    let targets: Vec<(&CameraRecord, &str, &str)> = cameras
        .iter()
        .filter(|camera| !camera.is_deleted() && camera.is_available())
        .filter_map(|camera| {
            let host = camera.host.as_deref().filter(|host| !host.is_empty())?;
            let path = camera.stream_path.as_deref().filter(|path| !path.is_empty())?;
            Some((camera, host, path))
        })
        .collect();

    let results = settle_all(
        targets
            .iter()
            .map(|(_, host, path)| provider.stream_status(host, path)),
    )
    .await;

    let mut report = StreamCheckReport::default();
    let mut statuses = Vec::new();
    for ((camera, _, _), result) in targets.iter().zip(results) {
        let status = match result {
            Ok(status) => status,
            Err(err) => {
                report
                    .errors
                    .push(format!("Camera {}: {}", camera.name, err));
                continue;
            }
        };
        if status.alive == Some(false) {
            report
                .failed_alive_checks
                .push(format!("Camera {}: alive = false", camera.name));
        }
        if status.running == Some(false) {
            report
                .failed_running_checks
                .push(format!("Camera {}: running = false", camera.name));
        }
        if let Some(bytes_in) = status.bytes_in.filter(|bytes_in| *bytes_in <= 0) {
            report
                .invalid_bytes_in
                .push(format!("Camera {}: bytes_in = {}", camera.name, bytes_in));
        }
        statuses.push(status);
    }
    (report, statuses)
}

/// 缓存检索范围：非零 flatId 优先，否则数字登录名按 houseIds 匹配。
pub fn camera_scope(login: &str, document: &LoginDocument) -> Option<CameraScope> {
    if let Some(flat_id) = document.flat_id() {
        return Some(CameraScope::Flat(flat_id));
    }
    login.trim().parse::<i64>().ok().map(CameraScope::House)
}

/// 摄像头页面编排。
pub struct CameraEngine {
    erp: Arc<dyn ErpSource>,
    cache: Arc<dyn CacheStore>,
    streams: Arc<dyn StreamProvider>,
}

impl CameraEngine {
    pub fn new(
        erp: Arc<dyn ErpSource>,
        cache: Arc<dyn CacheStore>,
        streams: Arc<dyn StreamProvider>,
    ) -> Self {
        Self {
            erp,
            cache,
            streams,
        }
    }

    pub async fn report(&self, login: &str) -> Result<CameraReport, ReconcileError> {
        let (erp_result, document_result) = futures::join!(
            self.erp.cameras(login),
            self.cache.login_document(login)
        );
        let mut warnings = Vec::new();

        let erp_cameras = settled("erp", login, erp_result);
        if erp_cameras.is_none() {
            warnings.push("ERP camera data unavailable".to_string());
        }
        let document = match settled("cache", login, document_result) {
            Some(Some(document)) => Some(document),
            Some(None) => {
                warnings.push("login document not found in cache".to_string());
                None
            }
            None => {
                warnings.push("cache data unavailable".to_string());
                None
            }
        };
        if erp_cameras.is_none() && document.is_none() {
            record_camera_run();
            return Err(ReconcileError::NotFound(format!(
                "no camera data found for login {login}"
            )));
        }

        let scope = document
            .as_ref()
            .and_then(|document| camera_scope(login, document));
        let credentials = document.as_ref().and_then(|document| {
            Some((document.uuid.clone()?, document.uuid2.clone()?))
        });
        let cache_future = async {
            match scope {
                Some(scope) => self.cache.personal_cameras(scope).await.map(Some),
                None => Ok(None),
            }
        };
        let billing_future = async {
            match &credentials {
                Some((uuid, uuid2)) => self.erp.billing_services(uuid, uuid2).await.map(Some),
                None => Ok(None),
            }
        };
        let (cache_result, billing_result) = futures::join!(cache_future, billing_future);

        let cache_cameras: Option<Vec<CameraRecord>> = match settled("cache", login, cache_result)
        {
            Some(Some(cameras)) => Some(cameras),
            Some(None) if document.is_some() => {
                warnings.push("no flatId or numeric login to search cache cameras".to_string());
                Some(Vec::new())
            }
            Some(None) => None,
            None => {
                warnings.push("cache camera search failed".to_string());
                None
            }
        };
        let billing_services = match settled("erp", login, billing_result) {
            Some(Some(lines)) => lines,
            Some(None) => {
                if document.is_some() {
                    warnings.push("UUID/UUID2 missing in cache document".to_string());
                }
                Vec::new()
            }
            None => {
                warnings.push("ERP billing services unavailable".to_string());
                Vec::new()
            }
        };

        let stream_targets = erp_cameras
            .as_deref()
            .or(cache_cameras.as_deref())
            .unwrap_or(&[]);
        let (stream_checks, stream_statuses) =
            check_streams(self.streams.as_ref(), stream_targets).await;

        let camera_differences =
            camera_differences(erp_cameras.as_deref(), cache_cameras.as_deref());
        let service_differences = service_differences(&billing_services, erp_cameras.as_deref());

        let discrepancy_count = camera_differences.as_ref().map_or(0, Vec::len)
            + service_differences
                .as_ref()
                .map_or(0, |report| report.entry_count())
            + stream_checks.issue_count();
        record_camera_run();
        record_discrepancies(discrepancy_count as u64);
        info!(
            target: "diag.reconcile",
            login,
            discrepancies = discrepancy_count,
            "camera_reconciled"
        );

        Ok(CameraReport {
            billing_services,
            erp_cameras,
            cache_cameras: cache_cameras.unwrap_or_default(),
            stream_checks,
            stream_statuses,
            camera_differences,
            service_differences,
            warnings,
        })
    }
}
