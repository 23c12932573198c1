//! RADIUS 会话读取
//!
//! 列统一转为文本读取，时间列在 Rust 侧解析，避免上游列类型差异导致解码失败。

use crate::error::StorageError;
use crate::models::strip_sentinel;
use crate::traits::RadiusStore;
use chrono::NaiveDateTime;
use domain::RadiusSession;
use sqlx::{MySqlPool, Row};

const RADIUS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct MySqlRadiusStore {
    pub pool: MySqlPool,
}

impl MySqlRadiusStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// 通过数据库 URL 建立连接池
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_mysql_pool(database_url).await?;
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl RadiusStore for MySqlRadiusStore {
    async fn find_session(&self, login: &str) -> Result<Option<RadiusSession>, StorageError> {
        let row = sqlx::query(
            "select cast(passwd as char) as passwd, cast(gmt as char) as gmt, \
             cast(ip_addr as char) as ip_addr, cast(time_to as char) as time_to, \
             cast(onu_mac as char) as onu_mac, cast(json_data as char) as json_data \
             from freedom_users where login = ? and billing = '1c'",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let time_to: Option<String> = strip_sentinel(row.try_get("time_to")?);
        Ok(Some(RadiusSession {
            password: strip_sentinel(row.try_get("passwd")?),
            gmt: strip_sentinel(row.try_get("gmt")?),
            ip_address: strip_sentinel(row.try_get("ip_addr")?),
            time_to: time_to.as_deref().and_then(parse_radius_time),
            onu_mac: strip_sentinel(row.try_get("onu_mac")?),
            json_data: strip_sentinel(row.try_get("json_data")?),
        }))
    }
}

/// 解析 RADIUS 的无时区时间；零日期等非法值返回 None。
pub fn parse_radius_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, RADIUS_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}
