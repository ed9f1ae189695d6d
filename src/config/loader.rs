//! 配置加载器实现
//!
//! 提供YAML/TOML/JSON配置文件解析、环境变量替换和错误处理功能

use crate::config::endpoint::Endpoint;
use crate::config::types::{validate_config, Config};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML（默认）
    Yaml,
    /// TOML
    Toml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// 根据文件扩展名推断格式，未知扩展名按YAML处理
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => ConfigFormat::Toml,
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// 配置加载器trait，定义配置加载接口
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// 从文件加载配置
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回
    /// * `Result<Config>` - 加载的配置或错误
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config>;

    /// 从字符串加载配置
    ///
    /// # 参数
    /// * `content` - 配置文件内容
    /// * `format` - 内容格式
    ///
    /// # 返回
    /// * `Result<Config>` - 加载的配置或错误
    fn load_from_str(&self, content: &str, format: ConfigFormat) -> Result<Config>;

    /// 验证配置
    fn validate(&self, config: &Config) -> Result<()>;
}

/// 基于文件的配置加载器
#[derive(Debug, Clone)]
pub struct FileConfigLoader {
    /// 是否启用环境变量替换
    enable_env_substitution: bool,
}

impl FileConfigLoader {
    /// 创建新的配置加载器
    ///
    /// # 参数
    /// * `enable_env_substitution` - 是否启用 `${VAR}` 环境变量替换
    pub fn new(enable_env_substitution: bool) -> Self {
        Self {
            enable_env_substitution,
        }
    }

    /// 替换字符串中的环境变量
    fn substitute_env_vars(&self, content: &str) -> Result<String> {
        if !self.enable_env_substitution {
            return Ok(content.to_string());
        }

        static ENV_VAR_REGEX: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();

        // 匹配 ${VAR_NAME} 格式的环境变量
        let env_var_regex = ENV_VAR_REGEX
            .get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}"))
            .as_ref()
            .map_err(|e| ConfigError::ParseError(format!("正则表达式错误: {}", e)))?;

        let mut missing = None;
        let result = env_var_regex.replace_all(content, |captures: &regex::Captures<'_>| {
            let var_name = &captures[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    missing.get_or_insert_with(|| var_name.to_string());
                    String::new()
                }
            }
        });

        if let Some(var) = missing {
            return Err(ConfigError::EnvVarError { var }.into());
        }

        Ok(result.into_owned())
    }

    /// 在解析后的配置中替换环境变量
    ///
    /// 只作用于URL和请求头的值，注释和请求体保持原样。
    fn apply_env_substitution(&self, config: &mut Config) -> Result<()> {
        if !self.enable_env_substitution {
            return Ok(());
        }

        for endpoint in &mut config.endpoints {
            endpoint.url = self.substitute_env_vars(&endpoint.url)?;
            for value in endpoint.headers.values_mut() {
                *value = self.substitute_env_vars(value)?;
            }
        }

        Ok(())
    }

    /// 按格式解析内容
    fn parse(&self, content: &str, format: ConfigFormat) -> Result<Config> {
        let mut config = match format {
            ConfigFormat::Yaml => Self::parse_yaml(content)?,
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("TOML解析失败: {}", e)))?,
            ConfigFormat::Json => Self::parse_json(content)?,
        };

        self.apply_env_substitution(&mut config)?;
        Ok(config)
    }

    /// 先判断顶层形态再按具体类型解析，保留字段级的错误位置
    fn parse_yaml(content: &str) -> Result<Config> {
        let yaml_error =
            |e: serde_yaml::Error| ConfigError::ParseError(format!("YAML解析失败: {}", e));

        let document: serde_yaml::Value = serde_yaml::from_str(content).map_err(yaml_error)?;
        let config = if document.is_sequence() {
            Config {
                endpoints: serde_yaml::from_str(content).map_err(yaml_error)?,
            }
        } else {
            serde_yaml::from_str(content).map_err(yaml_error)?
        };

        Ok(config)
    }

    /// 顶层可以是端点数组或带 `endpoints` 字段的对象
    fn parse_json(content: &str) -> Result<Config> {
        let json_error =
            |e: serde_json::Error| ConfigError::ParseError(format!("JSON解析失败: {}", e));

        let document: serde_json::Value = serde_json::from_str(content).map_err(json_error)?;
        let config = if document.is_array() {
            Config {
                endpoints: serde_json::from_str(content).map_err(json_error)?,
            }
        } else {
            serde_json::from_str(content).map_err(json_error)?
        };

        Ok(config)
    }
}

impl Default for FileConfigLoader {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl ConfigLoader for FileConfigLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ConfigError::ReadError {
                    path: path.to_string_lossy().to_string(),
                    reason: e.to_string(),
                })?;

        let config = self.load_from_str(&content, ConfigFormat::from_path(path))?;

        log::info!(
            "成功加载配置文件: {}，端点数量: {}",
            path.display(),
            config.endpoints.len()
        );
        log::debug!("配置内容: {:?}", config);

        Ok(config)
    }

    fn load_from_str(&self, content: &str, format: ConfigFormat) -> Result<Config> {
        let config = self.parse(content, format)?;
        self.validate(&config)?;
        Ok(config)
    }

    fn validate(&self, config: &Config) -> Result<()> {
        validate_config(config).map_err(|e| ConfigError::ValidationError(e).into())
    }
}

/// 加载配置文件并转换为按顺序排列的端点列表
///
/// # 参数
/// * `path` - 配置文件路径
///
/// # 返回
/// * `Result<Vec<Endpoint>>` - 端点列表或配置错误
pub async fn load_endpoints<P: AsRef<Path> + Send>(path: P) -> Result<Vec<Endpoint>> {
    let config = FileConfigLoader::default().load_from_file(path).await?;
    Ok(config.into_endpoints()?)
}
