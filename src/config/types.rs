//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

use crate::application::ViewRef;
use crate::infrastructure::couchdb::CouchDbClientConfig;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 存储后端选择
    #[serde(default)]
    pub store: StoreConfig,

    /// CouchDB 配置
    #[serde(default)]
    pub couchdb: CouchDbConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求没有 Host 头时用于生成链接的 `host:port`
    /// 如果未设置，则使用 localhost:{port}
    #[serde(default)]
    pub public_authority: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_authority: None,
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 `host:port`
    pub fn public_authority(&self) -> String {
        self.public_authority
            .clone()
            .unwrap_or_else(|| format!("localhost:{}", self.port))
    }
}

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// 外部 CouchDB
    #[default]
    CouchDb,
    /// 进程内存储，重启即丢失
    Memory,
}

/// 存储配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
}

/// CouchDB 配置
#[derive(Debug, Clone, Deserialize)]
pub struct CouchDbConfig {
    #[serde(default = "default_couch_host")]
    pub host: String,

    #[serde(default = "default_couch_port")]
    pub port: u16,

    /// 是否使用 https
    #[serde(default)]
    pub secured: bool,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// 数据库名
    #[serde(default = "default_database")]
    pub database: String,

    /// 设计文档名
    #[serde(default = "default_design")]
    pub design: String,

    /// 列出所有 Book 的视图名
    #[serde(default = "default_view")]
    pub view: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_couch_timeout")]
    pub timeout_secs: u64,

    /// 启动时确保数据库和视图存在
    #[serde(default = "default_setup")]
    pub setup: bool,
}

fn default_couch_host() -> String {
    "localhost".to_string()
}

fn default_couch_port() -> u16 {
    5984
}

fn default_database() -> String {
    "bookshelf_db".to_string()
}

fn default_design() -> String {
    "main_design".to_string()
}

fn default_view() -> String {
    "all_books".to_string()
}

fn default_couch_timeout() -> u64 {
    30
}

fn default_setup() -> bool {
    true
}

impl Default for CouchDbConfig {
    fn default() -> Self {
        Self {
            host: default_couch_host(),
            port: default_couch_port(),
            secured: false,
            username: None,
            password: None,
            database: default_database(),
            design: default_design(),
            view: default_view(),
            timeout_secs: default_couch_timeout(),
            setup: default_setup(),
        }
    }
}

impl CouchDbConfig {
    /// 列出所有 Book 的视图
    pub fn all_books_view(&self) -> ViewRef {
        ViewRef::new(&self.design, &self.view)
    }

    /// 转换为 CouchDB 客户端配置
    pub fn client_config(&self) -> CouchDbClientConfig {
        CouchDbClientConfig {
            host: self.host.clone(),
            port: self.port,
            secured: self.secured,
            username: self.username.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
