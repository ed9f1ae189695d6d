//! Endpoint Vitals - HTTP端点可用率监控工具
//!
//! 这是一个用Rust编写的端点可用率监控工具，支持：
//! - YAML/TOML/JSON端点配置
//! - 按固定间隔逐个探测HTTP/HTTPS端点
//! - 基于状态码和延迟的UP/DOWN判定
//! - 按域名累计的可用率报告
//! - 结构化日志记录

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod health;
pub mod logging;

// 重新导出主要类型
pub use config::{Config, Endpoint, EndpointConfig};
pub use crate::core::{CycleRunner, RunnerState, ShutdownSignal};
pub use error::MonitorError;
pub use health::{AvailabilityTracker, HttpProber, ProbeResult, ProbeStatus, Prober};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
