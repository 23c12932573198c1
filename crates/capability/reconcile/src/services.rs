//! 视频服务对账：1C 计费行 vs 按服务名聚合的摄像头。

use domain::{BillingServiceLine, CameraRecord, ServiceCount, ServiceDifferenceReport};

/// 服务名中第一段数字（归档天数）。
pub fn archive_days(service_name: &str) -> Option<i64> {
    let digits: String = service_name
        .chars()
        .skip_while(|ch| !ch.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// 未删除的个人摄像头按服务名分组，保持首次出现的顺序。
pub fn service_counts(cameras: &[CameraRecord]) -> Vec<ServiceCount> {
    let mut groups: Vec<ServiceCount> = Vec::new();
    for camera in cameras
        .iter()
        .filter(|camera| !camera.is_deleted() && camera.is_personal())
    {
        let service_name = camera.service_name.clone().unwrap_or_default();
        match groups
            .iter_mut()
            .find(|group| group.service_name == service_name)
        {
            Some(group) => group.count += 1,
            None => groups.push(ServiceCount {
                archive_days: archive_days(&service_name),
                service_name,
                count: 1,
                status: camera.status.clone(),
                available: camera.available,
            }),
        }
    }
    groups
}

/// 没有 1C 摄像头时返回 None。
///
/// 名称不一致时按归档天数找同组，多组同天数时取第一个。
pub fn service_differences(
    billing: &[BillingServiceLine],
    erp_cameras: Option<&[CameraRecord]>,
) -> Option<ServiceDifferenceReport> {
    let cameras = erp_cameras.filter(|cameras| !cameras.is_empty())?;
    let groups = service_counts(cameras);
    let mut matched = vec![false; groups.len()];
    let mut report = ServiceDifferenceReport::default();

    for line in billing {
        if let Some(index) = groups
            .iter()
            .position(|group| group.service_name == line.name)
        {
            matched[index] = true;
            let group = &groups[index];
            if group.count != line.count {
                report.count_mismatches.push(format!(
                    "Service '{}' count differs: billing {}, cameras {}",
                    line.name, line.count, group.count
                ));
            }
            if group.status.as_deref() != Some(line.status.as_str()) {
                report.status_mismatches.push(format!(
                    "Service '{}' status differs: billing '{}', cameras '{}'",
                    line.name,
                    line.status,
                    group.status.as_deref().unwrap_or("")
                ));
            }
            continue;
        }

        let line_days = archive_days(&line.name);
        let renamed = line_days.and_then(|days| {
            groups
                .iter()
                .enumerate()
                .find(|(index, group)| !matched[*index] && group.archive_days == Some(days))
                .map(|(index, _)| index)
        });
        match renamed {
            Some(index) => {
                matched[index] = true;
                report.missing_in_camera_set.push(format!(
                    "Service name mismatch: '{}' in billing, '{}' in cameras",
                    line.name, groups[index].service_name
                ));
            }
            None => report
                .missing_in_camera_set
                .push(format!("Service '{}' is missing in cameras", line.name)),
        }
    }

    for (group, _) in groups
        .iter()
        .zip(matched.iter())
        .filter(|(_, matched)| !**matched)
    {
        report.missing_in_erp_set.push(format!(
            "Service '{}' is missing in billing ({} cameras)",
            group.service_name, group.count
        ));
    }

    if billing.len() != groups.len() {
        report.missing_in_camera_set.push(format!(
            "Total service count mismatch: billing {}, cameras {}",
            billing.len(),
            groups.len()
        ));
    }
    Some(report)
}
