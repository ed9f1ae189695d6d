//! 核心模块
//!
//! 包含轮次调度、报告输出和中断处理

pub mod report;
pub mod runner;
pub mod shutdown;

// 重新导出主要类型
pub use report::Reporter;
pub use runner::{CycleOutcome, CycleRunner, RunnerState, DEFAULT_CYCLE_INTERVAL};
pub use shutdown::{listen_for_shutdown, ShutdownSignal};
