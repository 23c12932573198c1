//! Handlers 模块

pub mod cameras;
pub mod health;
pub mod intercom;
pub mod metrics;
pub mod network;
pub mod tv;

pub use cameras::*;
pub use health::*;
pub use intercom::*;
pub use metrics::*;
pub use network::*;
pub use tv::*;
