//! MySQL 存储实现模块（RADIUS 会话库，只读）。

pub mod radius;

pub use radius::*;
