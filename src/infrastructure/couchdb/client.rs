//! CouchDB Client - 通过 HTTP 访问 CouchDB
//!
//! 实现 DocumentStorePort trait
//!
//! CouchDB API:
//! - POST   /{db}                                 创建文档 -> {"id", "rev"}
//! - GET    /{db}/{id}                            读取文档
//! - PUT    /{db}/{id}?rev=..                     更新文档 -> {"rev"}
//! - DELETE /{db}/{id}?rev=..                     删除文档
//! - GET    /{db}/_design/{design}/_view/{view}   查询视图 -> {"rows": [...]}

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::application::ports::{CreatedDocument, DocumentStorePort, StoreError, ViewRef, ViewRow};

/// 列出 Book 文档的 map 函数
const BOOKS_MAP_FUNCTION: &str =
    "function (doc) { if (doc.type === 'book') { emit(doc._id, doc); } }";

/// CouchDB 客户端配置
#[derive(Debug, Clone)]
pub struct CouchDbClientConfig {
    pub host: String,
    pub port: u16,
    /// 是否使用 https
    pub secured: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for CouchDbClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5984,
            secured: false,
            username: None,
            password: None,
            database: "bookshelf_db".to_string(),
            timeout_secs: 30,
        }
    }
}

impl CouchDbClientConfig {
    pub fn new(host: impl Into<String>, port: u16, database: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// 服务器根 URL
    pub fn server_url(&self) -> String {
        let scheme = if self.secured { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    #[serde(default)]
    id: String,
    rev: String,
}

#[derive(Debug, Deserialize)]
struct ViewResponse {
    #[serde(default)]
    rows: Vec<ViewRow>,
}

/// CouchDB 客户端
pub struct CouchDbClient {
    client: Client,
    config: CouchDbClientConfig,
    server_url: Url,
}

impl CouchDbClient {
    /// 创建新的 CouchDB 客户端
    pub fn new(config: CouchDbClientConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let server_url = Url::parse(&config.server_url())
            .map_err(|e| StoreError::Network(format!("Invalid CouchDB URL: {}", e)))?;

        Ok(Self {
            client,
            config,
            server_url,
        })
    }

    /// 拼接 `/{db}/{segments...}`，每一段单独编码
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.server_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.clear().push(&self.config.database).extend(segments);
        }
        url
    }

    fn document_url(&self, id: &str) -> Url {
        self.url(&[id])
    }

    fn view_url(&self, view: &ViewRef) -> Url {
        self.url(&["_design", &view.design, "_view", &view.view])
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.username {
            Some(username) => request.basic_auth(username, self.config.password.as_ref()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        self.authorize(request).send().await.map_err(|e| {
            if e.is_timeout() {
                StoreError::Timeout
            } else if e.is_connect() {
                StoreError::Network(format!("Cannot connect to CouchDB: {}", e))
            } else {
                StoreError::Network(e.to_string())
            }
        })
    }

    /// 把非 2xx 响应翻译成 StoreError
    async fn check(response: Response, target: &str) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::NOT_FOUND => StoreError::NotFound(target.to_string()),
            StatusCode::CONFLICT => StoreError::Conflict(target.to_string()),
            _ => StoreError::Service {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn read_json<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, StoreError> {
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    /// 数据库不存在时创建
    pub async fn ensure_database(&self) -> Result<(), StoreError> {
        let response = self.send(self.client.put(self.url(&[]))).await?;
        match response.status() {
            StatusCode::CREATED => {
                tracing::info!(database = %self.config.database, "CouchDB database created");
                Ok(())
            }
            StatusCode::PRECONDITION_FAILED => {
                tracing::debug!(database = %self.config.database, "CouchDB database exists");
                Ok(())
            }
            _ => Self::check(response, &self.config.database).await.map(|_| ()),
        }
    }

    /// 设计文档不存在时创建列出所有 Book 的视图
    pub async fn ensure_view(&self, view: &ViewRef) -> Result<(), StoreError> {
        let design_id = format!("_design/{}", view.design);
        let body = json!({
            "language": "javascript",
            "views": {
                view.view.as_str(): { "map": BOOKS_MAP_FUNCTION }
            }
        });

        let request = self.client.put(self.url(&["_design", &view.design])).json(&body);
        match Self::check(self.send(request).await?, &design_id).await {
            Ok(_) => {
                tracing::info!(design = %view.design, view = %view.view, "CouchDB view created");
                Ok(())
            }
            Err(StoreError::Conflict(_)) => {
                tracing::debug!(design = %view.design, "CouchDB design document exists");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl DocumentStorePort for CouchDbClient {
    async fn create(&self, document: &Value) -> Result<CreatedDocument, StoreError> {
        tracing::debug!(database = %self.config.database, "Creating document");

        let request = self.client.post(self.url(&[])).json(document);
        let response = Self::check(self.send(request).await?, &self.config.database).await?;
        let written: WriteResponse = Self::read_json(response).await?;

        Ok(CreatedDocument {
            id: written.id,
            rev: written.rev,
        })
    }

    async fn retrieve(&self, id: &str) -> Result<Value, StoreError> {
        tracing::debug!(doc_id = %id, "Retrieving document");

        let request = self.client.get(self.document_url(id));
        let response = Self::check(self.send(request).await?, id).await?;
        Self::read_json(response).await
    }

    async fn update(&self, id: &str, rev: &str, document: &Value) -> Result<String, StoreError> {
        tracing::debug!(doc_id = %id, rev = %rev, "Updating document");

        let request = self
            .client
            .put(self.document_url(id))
            .query(&[("rev", rev)])
            .json(document);
        let response = Self::check(self.send(request).await?, id).await?;
        let written: WriteResponse = Self::read_json(response).await?;

        Ok(written.rev)
    }

    async fn delete(&self, id: &str, rev: &str) -> Result<(), StoreError> {
        tracing::debug!(doc_id = %id, rev = %rev, "Deleting document");

        let request = self.client.delete(self.document_url(id)).query(&[("rev", rev)]);
        Self::check(self.send(request).await?, id).await?;
        Ok(())
    }

    async fn query_view(&self, view: &ViewRef) -> Result<Vec<ViewRow>, StoreError> {
        tracing::debug!(design = %view.design, view = %view.view, "Querying view");

        let target = format!("_design/{}/_view/{}", view.design, view.view);
        let response = Self::check(self.send(self.client.get(self.view_url(view))).await?, &target).await?;
        let result: ViewResponse = Self::read_json(response).await?;

        Ok(result.rows)
    }

    async fn health_check(&self) -> bool {
        let request = self
            .client
            .get(self.server_url.clone())
            .timeout(Duration::from_secs(5));
        match self.send(request).await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
