//! 内存存储实现模块
//!
//! 仅用于测试和本地演示。
//!
//! - CacheStore: InMemoryCacheStore
//! - RadiusStore: InMemoryRadiusStore
//! - RbtStore: InMemoryRbtStore

pub mod cache;
pub mod radius;
pub mod rbt;

pub use cache::*;
pub use radius::*;
pub use rbt::*;
