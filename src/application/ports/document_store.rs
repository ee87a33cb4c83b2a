//! Document Store Port - 出站端口
//!
//! 文档数据库的抽象接口（CouchDB 语义）
//! 具体实现在 infrastructure 层（CouchDB HTTP 客户端、内存实现）

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// 文档存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Document update conflict: {0}")]
    Conflict(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Store error (HTTP {status}): {message}")]
    Service { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl StoreError {
    /// 错误码（与 CouchDB HTTP 状态码一致，传输层错误为 0）
    pub fn code(&self) -> u16 {
        match self {
            StoreError::NotFound(_) => 404,
            StoreError::Conflict(_) => 409,
            StoreError::Service { status, .. } => *status,
            StoreError::Network(_) | StoreError::Timeout | StoreError::InvalidResponse(_) => 0,
        }
    }
}

/// 新建文档的结果
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedDocument {
    pub id: String,
    pub rev: String,
}

/// 视图查询的一行，行的 key 不使用
#[derive(Debug, Clone, Deserialize)]
pub struct ViewRow {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub value: Value,
}

/// 设计文档中的视图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRef {
    pub design: String,
    pub view: String,
}

impl ViewRef {
    pub fn new(design: impl Into<String>, view: impl Into<String>) -> Self {
        Self {
            design: design.into(),
            view: view.into(),
        }
    }
}

impl Default for ViewRef {
    fn default() -> Self {
        Self::new("main_design", "all_books")
    }
}

/// Document Store Port
///
/// 文档的 `_id` 和 `_rev` 由存储分配；update/delete 必须带上当前修订号，
/// 修订号不匹配时返回 `StoreError::Conflict`
#[async_trait]
pub trait DocumentStorePort: Send + Sync {
    /// 创建文档，返回分配的 ID 和修订号
    async fn create(&self, document: &Value) -> Result<CreatedDocument, StoreError>;

    /// 读取文档（包含 `_id` / `_rev`）
    async fn retrieve(&self, id: &str) -> Result<Value, StoreError>;

    /// 覆盖写入文档，返回新的修订号
    async fn update(&self, id: &str, rev: &str, document: &Value) -> Result<String, StoreError>;

    /// 删除文档
    async fn delete(&self, id: &str, rev: &str) -> Result<(), StoreError>;

    /// 查询视图
    async fn query_view(&self, view: &ViewRef) -> Result<Vec<ViewRow>, StoreError>;

    /// 健康检查
    async fn health_check(&self) -> bool;
}
