//! 轮次调度器
//!
//! 按配置顺序逐个探测端点、更新可用率统计并输出报告，
//! 两轮之间固定休眠，直到收到中断信号。

use crate::config::Endpoint;
use crate::core::report::Reporter;
use crate::core::shutdown::ShutdownSignal;
use crate::error::Result;
use crate::health::{AvailabilityTracker, Prober};
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// 两轮探测之间的固定间隔
pub const DEFAULT_CYCLE_INTERVAL: Duration = Duration::from_secs(15);

/// 调度器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// 运行中
    Running,
    /// 已因中断而终止
    Terminated,
}

/// 单轮探测的结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// 所有端点都已探测并输出汇总
    Completed,
    /// 探测途中收到中断，正在进行的探测被放弃
    Interrupted,
}

/// 轮次调度器
pub struct CycleRunner<W: Write> {
    /// 探测目标，按配置顺序
    endpoints: Vec<Endpoint>,
    /// 探测器
    prober: Arc<dyn Prober>,
    /// 可用率统计
    tracker: AvailabilityTracker,
    /// 报告输出
    reporter: Reporter<W>,
    /// 轮次间隔
    interval: Duration,
    /// 已开始的轮次数
    cycle: u64,
    /// 进程启动时间
    started_at: Instant,
    /// 当前状态
    state: RunnerState,
}

impl<W: Write> CycleRunner<W> {
    /// 创建新的轮次调度器
    ///
    /// # 参数
    /// * `endpoints` - 探测目标列表
    /// * `prober` - 探测器
    /// * `writer` - 报告输出
    pub fn new(endpoints: Vec<Endpoint>, prober: Arc<dyn Prober>, writer: W) -> Self {
        Self {
            endpoints,
            prober,
            tracker: AvailabilityTracker::new(),
            reporter: Reporter::new(writer),
            interval: DEFAULT_CYCLE_INTERVAL,
            cycle: 0,
            started_at: Instant::now(),
            state: RunnerState::Running,
        }
    }

    /// 覆盖轮次间隔
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// 当前状态
    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// 已开始的轮次数
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// 可用率统计
    pub fn tracker(&self) -> &AvailabilityTracker {
        &self.tracker
    }

    /// 报告输出
    pub fn output(&self) -> &W {
        self.reporter.writer()
    }

    /// 执行一轮探测
    ///
    /// 收到中断时放弃正在进行的探测并立即返回，已完成的探测保持计入统计。
    pub async fn run_cycle(&mut self, shutdown: &mut ShutdownSignal) -> Result<CycleOutcome> {
        self.cycle += 1;
        let elapsed_secs = self.started_at.elapsed().as_secs_f64().round() as u64;
        self.reporter.cycle_begin(self.cycle, elapsed_secs)?;
        debug!("第 {} 轮探测开始，端点数量: {}", self.cycle, self.endpoints.len());

        for endpoint in &self.endpoints {
            let result = tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    info!("探测 {} 时收到中断信号，放弃本次探测", endpoint.name());
                    return Ok(CycleOutcome::Interrupted);
                }
                result = self.prober.probe(endpoint) => result,
            };

            debug!(
                "{} 探测完成于 {}: {}",
                endpoint.name(),
                result.timestamp.to_rfc3339(),
                result.status
            );
            self.reporter
                .endpoint_status(endpoint.domain(), endpoint.display_name(), &result)?;
            self.tracker.record(endpoint.domain(), result.is_up());
        }

        self.reporter.cycle_end(self.cycle)?;
        self.reporter.availability(&self.tracker)?;
        debug!("第 {} 轮探测结束", self.cycle);

        Ok(CycleOutcome::Completed)
    }

    /// 持续运行直到收到中断信号
    ///
    /// # 返回
    /// * `Result<RunnerState>` - 正常情况下恒为 `Terminated`
    pub async fn run(&mut self, mut shutdown: ShutdownSignal) -> Result<RunnerState> {
        info!(
            "开始监控 {} 个端点，探测间隔 {} 秒",
            self.endpoints.len(),
            self.interval.as_secs()
        );

        while self.state == RunnerState::Running {
            if shutdown.is_triggered() {
                break;
            }

            if self.run_cycle(&mut shutdown).await? == CycleOutcome::Interrupted {
                break;
            }

            tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        self.terminate()?;
        Ok(self.state)
    }

    /// 进入终止状态并输出退出提示
    fn terminate(&mut self) -> Result<()> {
        self.state = RunnerState::Terminated;
        self.reporter.shutdown()?;
        info!("监控已停止，共执行 {} 轮", self.cycle);
        Ok(())
    }
}
