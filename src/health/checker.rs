//! HTTP探测器实现
//!
//! 对单个端点发起一次HTTP请求并判定UP/DOWN，不做重试

use crate::config::{Endpoint, RequestBody};
use crate::error::{ProbeError, Result};
use crate::health::result::{ProbeResult, DEFAULT_LATENCY_THRESHOLD};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;

/// 默认请求超时时间
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// 探测器trait，定义探测接口
///
/// 传输层失败作为 DOWN 结果返回，永远不会以错误的形式冒泡。
#[async_trait]
pub trait Prober: Send + Sync {
    /// 执行一次探测
    ///
    /// # 参数
    /// * `endpoint` - 探测目标
    ///
    /// # 返回
    /// * `ProbeResult` - 探测结果
    async fn probe(&self, endpoint: &Endpoint) -> ProbeResult;
}

/// 基于 reqwest 的HTTP探测器
#[derive(Debug, Clone)]
pub struct HttpProber {
    /// HTTP客户端
    client: Client,
    /// 延迟阈值
    latency_threshold: Duration,
}

impl HttpProber {
    /// 创建新的HTTP探测器
    ///
    /// # 参数
    /// * `timeout` - 单次请求超时时间
    /// * `latency_threshold` - 判定UP的延迟上限（不含）
    ///
    /// # 返回
    /// * `Result<Self>` - 探测器实例
    pub fn new(timeout: Duration, latency_threshold: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()
            .map_err(ProbeError::ClientBuild)?;

        Ok(Self {
            client,
            latency_threshold,
        })
    }

    /// 使用默认超时和延迟阈值创建探测器
    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_REQUEST_TIMEOUT, DEFAULT_LATENCY_THRESHOLD)
    }

    /// 延迟阈值
    pub fn latency_threshold(&self) -> Duration {
        self.latency_threshold
    }

    /// 构建HTTP请求
    fn build_request(&self, endpoint: &Endpoint) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .request(endpoint.method().clone(), endpoint.url().clone());

        for (key, value) in endpoint.headers() {
            request = request.header(key, value);
        }

        match endpoint.body() {
            Some(RequestBody::Text(text)) => request.body(text.clone()),
            Some(RequestBody::Json(value)) => request.json(value),
            None => request,
        }
    }

    /// 格式化请求错误信息
    fn format_request_error(error: &reqwest::Error) -> String {
        let detail = error_chain(error);

        let category = if error.is_timeout() {
            "Request timeout"
        } else if error.is_connect() {
            let lower = detail.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") || lower.contains("lookup") {
                "DNS resolution failed"
            } else if lower.contains("certificate") || lower.contains("tls") || lower.contains("ssl")
            {
                "SSL/TLS error"
            } else {
                "Connection failed"
            }
        } else if error.is_redirect() {
            "Redirect error"
        } else if error.is_builder() || error.is_request() {
            "Invalid request"
        } else {
            "Request failed"
        };

        format!("{category}: {detail}")
    }
}

/// 拼接错误及其来源链，reqwest 的顶层信息通常不含根因
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, endpoint: &Endpoint) -> ProbeResult {
        let request = self.build_request(endpoint);

        let start_time = Instant::now();
        let response = request.send().await;
        let latency = start_time.elapsed();

        match response {
            Ok(response) => {
                let status_code = response.status().as_u16();
                debug!(
                    "探测完成: {} {} -> {} ({:?})",
                    endpoint.method(),
                    endpoint.url(),
                    status_code,
                    latency
                );
                ProbeResult::from_response(status_code, latency, self.latency_threshold)
            }
            Err(e) => {
                let message = Self::format_request_error(&e);
                debug!("探测失败: {} {} -> {}", endpoint.method(), endpoint.url(), message);
                ProbeResult::transport_error(message)
            }
        }
    }
}
