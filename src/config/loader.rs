//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, StoreBackend};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// # 环境变量示例
/// - `BOOKSHELF_SERVER__PORT=8090`
/// - `BOOKSHELF_STORE__BACKEND=memory`
/// - `BOOKSHELF_COUCHDB__HOST=couchdb`
/// - `BOOKSHELF_COUCHDB__PASSWORD=secret`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// `config_path` 为 None 时使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8090)?
        .set_default("store.backend", "couchdb")?
        .set_default("couchdb.host", "localhost")?
        .set_default("couchdb.port", 5984)?
        .set_default("couchdb.secured", false)?
        .set_default("couchdb.database", "bookshelf_db")?
        .set_default("couchdb.design", "main_design")?
        .set_default("couchdb.view", "all_books")?
        .set_default("couchdb.timeout_secs", 30)?
        .set_default("couchdb.setup", true)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 前缀: BOOKSHELF_，层级分隔符: __
    builder = builder.add_source(
        Environment::with_prefix("BOOKSHELF")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    // 内存后端不需要 CouchDB 配置
    if config.store.backend == StoreBackend::Memory {
        return Ok(());
    }

    let couchdb = &config.couchdb;
    let required = [
        ("CouchDB host", &couchdb.host),
        ("CouchDB database", &couchdb.database),
        ("CouchDB design", &couchdb.design),
        ("CouchDB view", &couchdb.view),
    ];
    for (name, value) in required {
        if value.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                name
            )));
        }
    }

    if couchdb.password.is_some() && couchdb.username.is_none() {
        return Err(ConfigError::ValidationError(
            "CouchDB password is set without a username".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志，不打印密码）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Authority: {}", config.server.public_authority());
    tracing::info!("Store Backend: {:?}", config.store.backend);
    if config.store.backend == StoreBackend::CouchDb {
        tracing::info!("CouchDB: {}", config.couchdb.client_config().server_url());
        tracing::info!("CouchDB Database: {}", config.couchdb.database);
        tracing::info!(
            "CouchDB View: _design/{}/_view/{}",
            config.couchdb.design,
            config.couchdb.view
        );
        tracing::info!(
            "CouchDB User: {}",
            config.couchdb.username.as_deref().unwrap_or("(anonymous)")
        );
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
