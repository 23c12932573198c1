//! # Diag Reconcile 模块
//!
//! 跨系统对账引擎。每次请求并发拉取各来源，归一化后生成差异报告：
//!
//! - `camera`：摄像头清单与视频流检查
//! - `services`：视频服务计费行 vs 摄像头分组
//! - `tv`：TV 运营商订阅与重同步
//! - `network`：RADIUS 会话 vs 缓存文档
//! - `intercom`：对讲类别到期日、门禁设置与通行记录
//!
//! 来源失败降级为报告中的警告；只有所有来源都没有数据时返回 `ReconcileError::NotFound`。

pub mod camera;
pub mod error;
pub mod fanout;
pub mod intercom;
pub mod network;
pub mod services;
pub mod time;
pub mod tv;

pub use camera::CameraEngine;
pub use error::ReconcileError;
pub use intercom::IntercomEngine;
pub use network::NetworkEngine;
pub use tv::TvEngine;
