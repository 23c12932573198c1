//! Postgres RBT 存储实现

use crate::error::StorageError;
use crate::traits::RbtStore;
use domain::{ApsSettings, ManualBlockOutcome};
use sqlx::{PgPool, Row};
use tracing::info;

/// 未定型字面量 `'0'` 由 Postgres 按列类型解析，boolean 与整数列都可写入。
const CLEAR_MANUAL_BLOCK: &str =
    "update houses_flats set manual_block = '0' where house_flat_id = $1";

pub struct PgRbtStore {
    pub pool: PgPool,
}

impl PgRbtStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 通过数据库 URL 建立连接池
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

fn flag(value: Option<i32>) -> Option<bool> {
    value.map(|value| value != 0)
}

#[async_trait::async_trait]
impl RbtStore for PgRbtStore {
    async fn find_auth_token(&self, house_flat_id: i64) -> Result<Option<String>, StorageError> {
        let row = sqlx::query(
            "select hsm.auth_token from houses_subscribers_mobile hsm \
             inner join houses_flats_subscribers hfs \
             on hsm.house_subscriber_id = hfs.house_subscriber_id \
             where hfs.house_flat_id = $1 and hsm.auth_token is not null \
             order by hfs.role desc limit 1",
        )
        .bind(house_flat_id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let token: Option<String> = row.try_get("auth_token")?;
        Ok(token.filter(|token| !token.is_empty()))
    }

    async fn find_aps_settings(
        &self,
        house_flat_id: i64,
    ) -> Result<Option<ApsSettings>, StorageError> {
        let row = sqlx::query(
            "select house_flat_id::bigint as house_flat_id, \
             address_house_id::bigint as address_house_id, \
             manual_block::int as manual_block, auto_block::int as auto_block, \
             open_code::text as open_code, white_rabbit::int as white_rabbit, \
             admin_block::int as admin_block \
             from houses_flats where house_flat_id = $1",
        )
        .bind(house_flat_id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(ApsSettings {
            house_flat_id: row.try_get("house_flat_id")?,
            address_house_id: row.try_get("address_house_id")?,
            manual_block: flag(row.try_get("manual_block")?),
            auto_block: flag(row.try_get("auto_block")?),
            open_code: row.try_get("open_code")?,
            white_rabbit: flag(row.try_get("white_rabbit")?),
            admin_block: flag(row.try_get("admin_block")?),
        }))
    }

    async fn clear_manual_block(
        &self,
        house_flat_id: i64,
    ) -> Result<Option<ManualBlockOutcome>, StorageError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(
            "select manual_block::int as manual_block from houses_flats \
             where house_flat_id = $1 for update",
        )
        .bind(house_flat_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };
        let current: Option<i32> = row.try_get("manual_block")?;
        if !flag(current).unwrap_or(false) {
            tx.rollback().await?;
            return Ok(Some(ManualBlockOutcome::AlreadyCleared));
        }
        sqlx::query(CLEAR_MANUAL_BLOCK)
            .bind(house_flat_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        info!(target: "diag.storage", house_flat_id, "manual_block_cleared");
        Ok(Some(ManualBlockOutcome::Cleared))
    }
}
