//! 探测结果数据结构
//!
//! 定义单次探测的结果类型、状态枚举和UP/DOWN判定规则

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 默认延迟阈值，响应延迟必须严格小于该值才算UP
pub const DEFAULT_LATENCY_THRESHOLD: Duration = Duration::from_millis(500);

/// 探测状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeStatus {
    /// 端点可用
    Up,
    /// 端点不可用
    Down,
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeStatus::Up => write!(f, "UP"),
            ProbeStatus::Down => write!(f, "DOWN"),
        }
    }
}

impl ProbeStatus {
    /// 判断状态是否为可用
    pub fn is_up(&self) -> bool {
        matches!(self, ProbeStatus::Up)
    }

    /// 根据状态码和延迟判定状态
    ///
    /// 状态码在 `[200, 300)` 且延迟严格小于阈值时为 UP，其余情况为 DOWN。
    pub fn classify(status_code: u16, latency: Duration, threshold: Duration) -> Self {
        if (200..300).contains(&status_code) && latency < threshold {
            ProbeStatus::Up
        } else {
            ProbeStatus::Down
        }
    }
}

/// 探测的具体结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// 收到了HTTP响应（不论状态码）
    Response {
        /// HTTP状态码
        status_code: u16,
        /// 响应延迟
        #[serde(with = "duration_serde")]
        latency: Duration,
    },
    /// 传输层失败（DNS、连接、超时、TLS等）
    TransportError {
        /// 错误描述
        message: String,
    },
}

/// 单次探测结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// 探测时间戳
    pub timestamp: DateTime<Utc>,
    /// 判定状态
    pub status: ProbeStatus,
    /// 探测结果
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    /// 由收到的HTTP响应创建结果
    ///
    /// # 参数
    /// * `status_code` - HTTP状态码
    /// * `latency` - 响应延迟
    /// * `threshold` - 延迟阈值
    pub fn from_response(status_code: u16, latency: Duration, threshold: Duration) -> Self {
        Self {
            timestamp: Utc::now(),
            status: ProbeStatus::classify(status_code, latency, threshold),
            outcome: ProbeOutcome::Response {
                status_code,
                latency,
            },
        }
    }

    /// 由传输层错误创建结果，状态恒为 DOWN
    pub fn transport_error(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            status: ProbeStatus::Down,
            outcome: ProbeOutcome::TransportError {
                message: message.into(),
            },
        }
    }

    /// 是否可用
    pub fn is_up(&self) -> bool {
        self.status.is_up()
    }

    /// HTTP状态码，传输失败时为空
    pub fn status_code(&self) -> Option<u16> {
        match self.outcome {
            ProbeOutcome::Response { status_code, .. } => Some(status_code),
            ProbeOutcome::TransportError { .. } => None,
        }
    }

    /// 响应延迟（毫秒），传输失败时为空
    pub fn latency_ms(&self) -> Option<f64> {
        match self.outcome {
            ProbeOutcome::Response { latency, .. } => Some(latency.as_nanos() as f64 / 1_000_000.0),
            ProbeOutcome::TransportError { .. } => None,
        }
    }

    /// 传输错误描述
    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            ProbeOutcome::Response { .. } => None,
            ProbeOutcome::TransportError { message } => Some(message),
        }
    }
}

/// Duration序列化模块
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_nanos() as f64 / 1_000_000.0).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(millis / 1000.0).map_err(serde::de::Error::custom)
    }
}
