//! 中断信号处理模块
//!
//! 监听 Ctrl+C / SIGINT / SIGTERM，并把它们转换为可注入的关闭信号

use crate::error::Result;
use tokio::sync::broadcast;
use tracing::{error, info};

#[cfg(unix)]
use signal_hook::consts::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook_tokio::Signals;

/// 关闭信号接收端
///
/// 包装 `broadcast::Receiver<()>`。所有发送端都被丢弃后不会再触发。
#[derive(Debug)]
pub struct ShutdownSignal {
    receiver: broadcast::Receiver<()>,
    triggered: bool,
}

impl ShutdownSignal {
    /// 从广播接收端创建关闭信号
    pub fn new(receiver: broadcast::Receiver<()>) -> Self {
        Self {
            receiver,
            triggered: false,
        }
    }

    /// 创建一对发送端和关闭信号
    pub fn channel() -> (broadcast::Sender<()>, Self) {
        let (sender, receiver) = broadcast::channel(1);
        (sender, Self::new(receiver))
    }

    /// 等待关闭信号
    ///
    /// 已经触发过的信号会立即返回。
    pub async fn recv(&mut self) {
        if self.triggered {
            return;
        }

        match self.receiver.recv().await {
            Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                self.triggered = true;
            }
            Err(broadcast::error::RecvError::Closed) => std::future::pending::<()>().await,
        }
    }

    /// 非阻塞检查是否已收到关闭信号
    pub fn is_triggered(&mut self) -> bool {
        if !self.triggered {
            match self.receiver.try_recv() {
                Ok(()) | Err(broadcast::error::TryRecvError::Lagged(_)) => self.triggered = true,
                Err(_) => {}
            }
        }
        self.triggered
    }
}

/// 启动中断信号监听任务
///
/// 收到中断时向 `shutdown_tx` 广播一次。
pub fn listen_for_shutdown(shutdown_tx: broadcast::Sender<()>) -> Result<()> {
    #[cfg(unix)]
    setup_unix_signals(shutdown_tx.clone())?;

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("接收到 Ctrl+C，开始优雅关闭...");
                if let Err(e) = shutdown_tx.send(()) {
                    error!("发送关闭信号失败: {e}");
                }
            }
            Err(e) => {
                error!("监听中断信号失败: {e}");
            }
        }
    });

    Ok(())
}

/// Unix/Linux系统信号处理
#[cfg(unix)]
fn setup_unix_signals(shutdown_tx: broadcast::Sender<()>) -> Result<()> {
    use futures::stream::StreamExt;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;

    tokio::spawn(async move {
        if let Some(signal) = signals.next().await {
            match signal {
                SIGINT => info!("接收到 SIGINT 信号，开始优雅关闭..."),
                SIGTERM => info!("接收到 SIGTERM 信号，开始优雅关闭..."),
                other => info!("接收到信号 {other}，开始优雅关闭..."),
            }
            if let Err(e) = shutdown_tx.send(()) {
                error!("发送关闭信号失败: {e}");
            }
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_recv_after_send() {
        let (sender, mut signal) = ShutdownSignal::channel();
        sender.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(1), signal.recv())
            .await
            .expect("关闭信号应该立即到达");
        assert!(signal.is_triggered());

        // 触发后再次等待立即返回
        tokio::time::timeout(Duration::from_secs(1), signal.recv())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_closed_channel_never_fires() {
        let (sender, mut signal) = ShutdownSignal::channel();
        drop(sender);

        let waited = tokio::time::timeout(Duration::from_millis(50), signal.recv()).await;
        assert!(waited.is_err());
        assert!(!signal.is_triggered());
    }

    #[test]
    fn test_is_triggered_without_send() {
        let (_sender, mut signal) = ShutdownSignal::channel();
        assert!(!signal.is_triggered());
    }
}
