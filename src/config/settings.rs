// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 预检缓存时间上限（秒）
pub const MAX_PREFLIGHT_AGE_SECS: u64 = 86_400;

/// 应用程序配置设置
///
/// 进程启动时加载一次，之后只读
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 跨域配置
    pub cors: CorsSettings,
    /// LLM配置
    pub llm: LlmSettings,
    /// 批量提取配置
    pub extraction: ExtractionSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 文档渲染配置
    pub renderer: RendererSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 跨域配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// 允许的来源列表，为空或包含 "*" 时允许任意来源
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// 预检缓存时间（秒）
    pub max_age_secs: u64,
}

impl CorsSettings {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o.trim() == "*")
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs.min(MAX_PREFLIGHT_AGE_SECS))
    }
}

/// LLM配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// API密钥
    pub api_key: Option<String>,
    /// 模型标识（按原样传递给服务商）
    pub model: String,
    /// API基础URL
    pub api_base_url: String,
    /// 采样温度
    pub temperature: f32,
    /// 发送给模型的页面文本最大字符数
    pub max_content_chars: usize,
}

/// 批量提取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    /// 单次页面抓取超时（秒）
    pub fetch_timeout_secs: u64,
    /// 引擎内部最大重试次数
    pub max_retries: u32,
    /// 单个URL的整体超时（秒）
    pub unit_timeout_secs: u64,
    /// 同时处理的URL数量，1 表示严格顺序
    pub concurrency: usize,
    /// 是否允许访问私有地址
    pub allow_private_hosts: bool,
    /// 最近一次批量结果的调试输出路径
    pub artifact_path: Option<String>,
}

impl ExtractionSettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn unit_timeout(&self) -> Duration {
        Duration::from_secs(self.unit_timeout_secs)
    }
}

/// 页面获取方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserMode {
    /// 纯HTTP请求
    Http,
    /// 无头Chromium渲染
    Chromium,
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    pub mode: BrowserMode,
    /// 是否以无头模式启动
    pub headless: bool,
    /// 远程Chrome调试地址
    pub remote_debugging_url: Option<String>,
    /// 页面加载后的额外等待时间（毫秒）
    pub settle_ms: u64,
}

/// 渲染后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererBackend {
    /// 本地排版工具链
    Local,
    /// 远程编译服务
    Remote,
}

/// 文档渲染配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RendererSettings {
    pub backend: RendererBackend,
    /// 本地排版程序
    pub program: String,
    /// 编译遍数
    pub passes: u32,
    /// 每遍超时（秒）
    pub timeout_secs: u64,
    /// 远程编译服务地址
    pub remote_url: Option<String>,
}

impl RendererSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    pub enabled: bool,
    /// Prometheus 监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和
    /// `JOBTEX__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("JOBTEX")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 仅包含内置默认值的配置
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            .set_default("cors.max_age_secs", 3600)?
            .set_default("llm.model", "gpt-4o-mini")?
            .set_default("llm.api_base_url", "https://api.openai.com/v1")?
            .set_default("llm.temperature", 0.0)?
            .set_default("llm.max_content_chars", 20_000)?
            .set_default("extraction.fetch_timeout_secs", 60)?
            .set_default("extraction.max_retries", 3)?
            .set_default("extraction.unit_timeout_secs", 180)?
            .set_default("extraction.concurrency", 1)?
            .set_default("extraction.allow_private_hosts", false)?
            .set_default("browser.mode", "http")?
            .set_default("browser.headless", true)?
            .set_default("browser.settle_ms", 1500)?
            .set_default("renderer.backend", "local")?
            .set_default("renderer.program", "pdflatex")?
            .set_default("renderer.passes", 2)?
            .set_default("renderer.timeout_secs", 60)?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }
}
