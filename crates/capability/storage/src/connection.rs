//! 数据库连接管理
//!
//! - connect_pool：建立 Postgres（RBT）连接池
//! - connect_mysql_pool：建立 MySQL（RADIUS）连接池
//!
//! 最大连接数限制为 8。

use crate::error::StorageError;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::{MySqlPool, PgPool};

/// 建立 Postgres 连接池
pub async fn connect_pool(database_url: &str) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// 建立 MySQL 连接池
pub async fn connect_mysql_pool(database_url: &str) -> Result<MySqlPool, StorageError> {
    let pool = MySqlPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await?;
    Ok(pool)
}
