//! # Diag Storage 模块
//!
//! 对账所需的三个存储来源的统一抽象层。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：CacheStore、RadiusStore、RbtStore
//! 2. **数据模型层** (`models.rs`)：检索范围与空值哨兵
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **验证辅助层** (`validation.rs`)：缓存键与 RediSearch 查询构造
//! 5. **连接管理层** (`connection.rs`)：MySQL/PostgreSQL 连接池
//! 6. **实现层**：
//!    - `redis`：login:* 文档（JSON.GET）与摄像头索引（FT.SEARCH）
//!    - `mysql/`：RADIUS 会话库
//!    - `postgres/`：RBT 对讲/门禁库
//!    - `in_memory/`：内存实现（用于测试）
//!
//! ## 设计约束
//!
//! - 存储层只读取记录，不做对账判断；“不存在”统一返回 `Option::None`
//! - 所有 SQL 使用参数绑定
//! - 唯一的写操作（解除手动封锁）在单个事务内完成
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use diag_storage::{CacheStore, CameraScope, RedisCacheStore};
//!
//! let cache = RedisCacheStore::connect("redis://localhost:6379")?;
//! let document = cache.login_document("100200").await?;
//! let cameras = cache.personal_cameras(CameraScope::Flat(42)).await?;
//! ```

pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod mysql;
pub mod postgres;
pub mod redis;
pub mod traits;
pub mod validation;

pub use connection::*;
pub use error::*;
pub use models::*;
pub use redis::RedisCacheStore;
pub use traits::*;
pub use validation::*;

pub use in_memory::{InMemoryCacheStore, InMemoryRadiusStore, InMemoryRbtStore};
pub use mysql::MySqlRadiusStore;
pub use postgres::PgRbtStore;
