//! 命令行接口模块
//!
//! 提供CLI参数解析功能

pub mod args;

// 重新导出主要类型
pub use args::Args;
