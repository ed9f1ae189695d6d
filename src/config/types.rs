//! 配置数据结构定义
//!
//! 定义端点配置结构体和验证逻辑

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use url::Url;

/// 主配置结构，包含按顺序排列的端点列表
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// 端点配置列表
    pub endpoints: Vec<EndpointConfig>,
}

/// 端点配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointConfig {
    /// 端点名称
    pub name: String,
    /// 端点URL
    pub url: String,
    /// HTTP方法
    #[serde(default = "default_method")]
    pub method: String,
    /// 请求头
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// 请求体
    #[serde(default)]
    pub body: Option<RequestBody>,
}

/// 请求体
///
/// 字符串原样发送；结构化值按JSON发送。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RequestBody {
    /// 原始文本
    Text(String),
    /// JSON值
    Json(serde_json::Value),
}

fn default_method() -> String {
    "GET".to_string()
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    if config.endpoints.is_empty() {
        return Err("至少需要配置一个端点".to_string());
    }

    for endpoint in &config.endpoints {
        validate_endpoint(endpoint)?;
    }

    Ok(())
}

/// 验证单个端点配置
fn validate_endpoint(endpoint: &EndpointConfig) -> Result<(), String> {
    if endpoint.name.trim().is_empty() {
        return Err("端点名称不能为空".to_string());
    }

    let url = Url::parse(&endpoint.url)
        .map_err(|e| format!("端点 {} 的URL格式无效: {}", endpoint.name, e))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!(
            "端点 {} 的URL协议不受支持: {}",
            endpoint.name,
            url.scheme()
        ));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(format!("端点 {} 的URL缺少主机名", endpoint.name));
    }

    if endpoint.method.trim().is_empty()
        || Method::from_str(&endpoint.method.to_uppercase()).is_err()
    {
        return Err(format!(
            "端点 {} 的HTTP方法无效: {}",
            endpoint.name, endpoint.method
        ));
    }

    for (key, value) in &endpoint.headers {
        if HeaderName::from_bytes(key.as_bytes()).is_err() {
            return Err(format!("端点 {} 的请求头名称无效: {}", endpoint.name, key));
        }
        if HeaderValue::from_str(value).is_err() {
            return Err(format!("端点 {} 的请求头 {} 取值无效", endpoint.name, key));
        }
    }

    Ok(())
}
