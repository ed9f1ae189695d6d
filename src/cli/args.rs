//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use clap::Parser;
use std::path::PathBuf;

/// Endpoint Vitals - HTTP端点可用率监控工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "endpoint-vitals",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 端点配置文件路径（YAML/TOML/JSON）
    #[arg(value_name = "CONFIG_FILE")]
    pub config_file_path: PathBuf,
}
