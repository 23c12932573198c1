//! # Diag Sources 模块
//!
//! 对账引擎使用的外部 HTTP 数据源：1C、视频流服务、TV 运营商、RBT 通行记录与 TV 重同步接口。
//!
//! - `traits.rs`：引擎依赖的接口
//! - `tokens.rs`：由配置注入的凭据表，查找失败即报错
//! - `client.rs`：reqwest 客户端、响应分类与重试
//! - 其余模块为各来源的 HTTP 实现
//!
//! 所有实现只负责取数与宽松解析，不做比较。

pub mod client;
pub mod erp;
pub mod error;
pub mod fix;
pub mod models;
pub mod passages;
pub mod tokens;
pub mod traits;
pub mod tv;
pub mod video;

pub use erp::HttpErpSource;
pub use error::SourceError;
pub use fix::HttpTvFixEndpoint;
pub use models::PassageEntry;
pub use passages::HttpPassageProvider;
pub use tokens::TokenTable;
pub use traits::*;
pub use tv::{HttpTvProviders, TvEndpoints};
pub use video::HttpStreamProvider;
