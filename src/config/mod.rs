//! 配置管理模块
//!
//! 提供配置文件解析、验证和端点定义转换功能

pub mod endpoint;
pub mod loader;
pub mod types;

// 重新导出主要类型
pub use endpoint::Endpoint;
pub use loader::{load_endpoints, ConfigFormat, ConfigLoader, FileConfigLoader};
pub use types::{validate_config, Config, EndpointConfig, RequestBody};
