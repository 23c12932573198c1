//! # PostgreSQL 存储实现模块
//!
//! RBT 对讲/门禁库的访问实现。
//!
//! ## 依赖的表
//!
//! - `houses_flats`：套房（house_flat_id, address_house_id, manual_block, auto_block,
//!   open_code, white_rabbit, admin_block）
//! - `houses_flats_subscribers`：套房与用户关联（house_flat_id, house_subscriber_id, role）
//! - `houses_subscribers_mobile`：移动端用户（house_subscriber_id, auth_token）
//!
//! 标志列在库中以整数存储，读取时统一 `::int` 后转为 bool。
//!
//! ## 事务
//!
//! 解除手动封锁在单个事务内完成：先 `for update` 读取再更新，
//! 所有提前返回路径都会显式回滚。

pub mod rbt;

pub use rbt::*;
