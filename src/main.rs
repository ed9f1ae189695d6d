//! Endpoint Vitals 主程序入口
//!
//! HTTP端点可用率监控工具

use anyhow::{Context, Result};
use clap::Parser;
use endpoint_vitals::cli::Args;
use endpoint_vitals::config::{load_endpoints, Endpoint};
use endpoint_vitals::core::{listen_for_shutdown, CycleRunner, ShutdownSignal};
use endpoint_vitals::health::HttpProber;
use endpoint_vitals::logging::{LogConfig, LoggingSystem};
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 初始化日志系统
    let log_config = LogConfig {
        ansi: std::io::stderr().is_terminal(),
        ..LogConfig::default()
    };
    let _logging_system = LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    info!("Endpoint Vitals v{} 启动", endpoint_vitals::VERSION);

    // 配置错误是唯一的致命错误，进入循环前退出
    let endpoints = match load_endpoints(&args.config_file_path).await {
        Ok(endpoints) => endpoints,
        Err(e) => {
            error!("加载配置失败: {}", e);
            eprintln!(
                "Error reading or parsing config file '{}': {}",
                args.config_file_path.display(),
                e
            );
            std::process::exit(1);
        }
    };

    info!("配置加载完成，端点数量: {}", endpoints.len());

    run_monitor(endpoints).await
}

/// 运行监控循环直到收到中断信号
async fn run_monitor(endpoints: Vec<Endpoint>) -> Result<()> {
    let prober = Arc::new(HttpProber::with_defaults().context("创建HTTP探测器失败")?);

    let (shutdown_tx, shutdown) = ShutdownSignal::channel();
    listen_for_shutdown(shutdown_tx.clone()).context("注册中断信号处理失败")?;

    let mut runner = CycleRunner::new(endpoints, prober, std::io::stdout());
    let state = runner.run(shutdown).await.context("监控循环异常退出")?;

    info!("服务已停止: {:?}", state);
    drop(shutdown_tx);
    Ok(())
}
