//! 时间换算：报告统一使用 UTC+5 的自然日。

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};

pub const REPORT_OFFSET_HOURS: i32 = 5;
const ERP_DATE_FORMAT: &str = "%d.%m.%Y";

pub fn offset_hours(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}

pub fn report_offset() -> FixedOffset {
    offset_hours(REPORT_OFFSET_HOURS)
}

/// `dd.mm.yyyy` 解析为 UTC+5 零点的 epoch 秒。
pub fn parse_erp_date(text: &str) -> Option<i64> {
    let date = NaiveDate::parse_from_str(text.trim(), ERP_DATE_FORMAT).ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    local_to_utc(midnight, report_offset()).map(|moment| moment.timestamp())
}

/// epoch 秒所在 UTC+5 自然日的零点。
pub fn start_of_day(epoch_seconds: i64) -> Option<i64> {
    let moment = DateTime::<Utc>::from_timestamp(epoch_seconds, 0)?;
    let local_date = moment.with_timezone(&report_offset()).date_naive();
    let midnight = local_date.and_hms_opt(0, 0, 0)?;
    local_to_utc(midnight, report_offset()).map(|moment| moment.timestamp())
}

/// 当前时刻在 UTC+5 的日期。
pub fn report_today(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&report_offset()).date_naive()
}

/// 以 `offset` 解释无时区时间并换算为 UTC。
pub fn local_to_utc(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    match offset.from_local_datetime(&naive) {
        LocalResult::Single(moment) => Some(moment.with_timezone(&Utc)),
        _ => None,
    }
}

/// 最近 `days` 天（含今天），从今天往前。
pub fn trailing_days(now: DateTime<Utc>, days: u64) -> Vec<NaiveDate> {
    let today = report_today(now);
    (0..days)
        .filter_map(|index| {
            let back = i64::try_from(index).ok()?;
            today.checked_sub_signed(Duration::days(back))
        })
        .collect()
}
