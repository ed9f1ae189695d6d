//! 已验证的端点定义
//!
//! 把配置文件中的原始字段转换为强类型的探测目标，并提供域名分组键和显示名称的派生规则。

use crate::config::types::{Config, EndpointConfig, RequestBody};
use crate::error::ConfigError;
use reqwest::Method;
use std::collections::HashMap;
use std::str::FromStr;
use url::Url;

/// 需要补全 `www.` 前缀的裸域名
const BARE_FETCH_DOMAIN: &str = "fetchrewards.com";

/// 显示名称中去除的前缀
const NAME_PREFIX: &str = "fetch ";

/// 单个探测目标，加载后不可变
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    name: String,
    url: Url,
    method: Method,
    headers: HashMap<String, String>,
    body: Option<RequestBody>,
    domain: String,
}

impl Endpoint {
    /// 用名称和URL创建GET端点
    pub fn get(name: impl Into<String>, url: impl Into<String>) -> Result<Self, ConfigError> {
        Self::try_from(EndpointConfig {
            name: name.into(),
            url: url.into(),
            method: Method::GET.to_string(),
            headers: HashMap::new(),
            body: None,
        })
    }

    /// 端点名称（原始配置值）
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 端点URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// HTTP方法
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// 请求头
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// 请求体
    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// 可用率统计使用的域名键
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// 输出时使用的端点名称
    pub fn display_name(&self) -> &str {
        display_name(&self.name)
    }
}

impl TryFrom<EndpointConfig> for Endpoint {
    type Error = ConfigError;

    fn try_from(config: EndpointConfig) -> Result<Self, Self::Error> {
        let url = Url::parse(&config.url).map_err(|e| {
            ConfigError::ValidationError(format!("端点 {} 的URL格式无效: {}", config.name, e))
        })?;

        let method = Method::from_str(&config.method.to_uppercase()).map_err(|_| {
            ConfigError::ValidationError(format!(
                "端点 {} 的HTTP方法无效: {}",
                config.name, config.method
            ))
        })?;

        let domain = domain_key(&url).ok_or_else(|| {
            ConfigError::ValidationError(format!("端点 {} 的URL缺少主机名", config.name))
        })?;

        Ok(Self {
            name: config.name,
            url,
            method,
            headers: config.headers,
            body: config.body,
            domain,
        })
    }
}

impl Config {
    /// 按配置顺序转换为已验证的端点列表
    pub fn into_endpoints(self) -> Result<Vec<Endpoint>, ConfigError> {
        self.endpoints.into_iter().map(Endpoint::try_from).collect()
    }
}

/// 从URL派生域名分组键
///
/// 使用主机名；URL显式带有非默认端口时附加 `:port`。
/// `fetchrewards.com` 固定改写为 `www.fetchrewards.com`。
pub fn domain_key(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?;
    let host = normalize_host(host);

    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// 主机名改写规则，只作用于完全相等的 `fetchrewards.com`
pub fn normalize_host(host: &str) -> &str {
    if host == BARE_FETCH_DOMAIN {
        "www.fetchrewards.com"
    } else {
        host
    }
}

/// 去掉名称开头的一个 `"fetch "` 前缀
pub fn display_name(name: &str) -> &str {
    name.strip_prefix(NAME_PREFIX).unwrap_or(name)
}
