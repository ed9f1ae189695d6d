//! 健康探测模块
//!
//! 提供HTTP探测、结果判定和按域名的可用率统计功能

pub mod checker;
pub mod result;
pub mod tracker;

// 重新导出主要类型
pub use checker::{HttpProber, Prober, DEFAULT_REQUEST_TIMEOUT};
pub use result::{ProbeOutcome, ProbeResult, ProbeStatus, DEFAULT_LATENCY_THRESHOLD};
pub use tracker::{AvailabilityTracker, DomainStats};
