//! 控制台报告输出
//!
//! 把每轮探测的进度、单个端点状态和域名可用率格式化为逐行文本

use crate::health::{AvailabilityTracker, ProbeOutcome, ProbeResult};
use std::io::{self, Write};

/// 逐行文本报告器
#[derive(Debug)]
pub struct Reporter<W: Write> {
    writer: W,
}

impl<W: Write> Reporter<W> {
    /// 创建写入指定输出的报告器
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// 底层输出
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// 取回底层输出
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// 轮次开始
    pub fn cycle_begin(&mut self, cycle: u64, elapsed_secs: u64) -> io::Result<()> {
        writeln!(
            self.writer,
            "Test cycle #{cycle} begins at time = {elapsed_secs} seconds"
        )
    }

    /// 单个端点的探测状态
    pub fn endpoint_status(
        &mut self,
        domain: &str,
        name: &str,
        result: &ProbeResult,
    ) -> io::Result<()> {
        writeln!(self.writer, "{}", format_status_line(domain, name, result))
    }

    /// 轮次结束
    pub fn cycle_end(&mut self, cycle: u64) -> io::Result<()> {
        writeln!(self.writer, "Test cycle #{cycle} ends.")?;
        writeln!(self.writer)
    }

    /// 所有已跟踪域名的可用率，按首次出现顺序
    pub fn availability(&mut self, tracker: &AvailabilityTracker) -> io::Result<()> {
        for (domain, stats) in tracker.iter() {
            writeln!(
                self.writer,
                "{domain} has {}% availability percentage",
                stats.percentage()
            )?;
        }
        writeln!(self.writer)?;
        self.writer.flush()
    }

    /// 退出提示
    pub fn shutdown(&mut self) -> io::Result<()> {
        writeln!(self.writer, "Exit")?;
        self.writer.flush()
    }
}

/// 格式化单个端点的状态行
pub fn format_status_line(domain: &str, name: &str, result: &ProbeResult) -> String {
    match &result.outcome {
        ProbeOutcome::Response { status_code, .. } => format!(
            "Endpoint with name {domain} {name} has HTTP response code {status_code} \
             and response latency {:.3} ms => {}",
            result.latency_ms().unwrap_or_default(),
            result.status
        ),
        ProbeOutcome::TransportError { message } => format!(
            "Endpoint with name {domain} {name} has HTTP response code N/A \
             and request error \"{message}\" => {}",
            result.status
        ),
    }
}
