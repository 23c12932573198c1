//! 诊断对账的领域模型。
//!
//! 所有记录都是按请求构造的不可变值，不做持久化。

pub mod camera;
pub mod intercom;
pub mod login;
pub mod network;
pub mod tv;

pub use camera::{
    BillingServiceLine, CameraDifference, CameraField, CameraRecord, CameraReport, FieldDiff,
    ServiceCount, ServiceDifferenceReport, StreamCheckReport, StreamStatus,
};
pub use intercom::{
    ApsSettings, CategoryMatch, ErpIntercomRow, IntercomCategory, IntercomCategoryStatus,
    IntercomReport, ManualBlockOutcome, Passage, PassageEvent,
};
pub use login::LoginDocument;
pub use network::{
    NetworkField, NetworkFieldDiff, NetworkReport, NetworkSnapshot, NetworkSource, RadiusSession,
    RawExpiry,
};
pub use tv::{
    ErpTvServiceRow, FixAttempt, FixStatus, FixSummary, OperatorDetails, ServiceKey, ServiceTuple,
    Tv24Phone, TvDiscrepancy, TvFamily, TvOperator, TvOperatorSnapshot, TvReport,
};
