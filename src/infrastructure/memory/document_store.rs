//! In-Memory Document Store Implementation
//!
//! 模拟 CouchDB 的 `_id` / `_rev` 语义，用于本地开发和测试

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{CreatedDocument, DocumentStorePort, StoreError, ViewRef, ViewRow};

/// 已存储的文档
#[derive(Debug, Clone)]
struct StoredDocument {
    generation: u64,
    rev: String,
    body: Map<String, Value>,
}

impl StoredDocument {
    fn to_json(&self, id: &str) -> Value {
        let mut body = self.body.clone();
        body.insert("_id".to_string(), Value::String(id.to_string()));
        body.insert("_rev".to_string(), Value::String(self.rev.clone()));
        Value::Object(body)
    }
}

/// 内存文档存储
pub struct InMemoryDocumentStore {
    documents: DashMap<String, StoredDocument>,
    /// (design, view) -> 文档 type
    views: HashMap<(String, String), String>,
    calls: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
            views: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// 注册一个按 `type` 字段枚举文档的视图
    pub fn with_type_view(mut self, view: &ViewRef, doc_type: impl Into<String>) -> Self {
        self.views
            .insert((view.design.clone(), view.view.clone()), doc_type.into());
        self
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 端口方法被调用的次数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn next_rev(generation: u64) -> String {
        format!("{}-{}", generation, Uuid::new_v4().simple())
    }

    // 存储方管理的字段不从请求体写入
    fn strip_reserved(document: &Value) -> Result<Map<String, Value>, StoreError> {
        let mut body = document
            .as_object()
            .cloned()
            .ok_or_else(|| StoreError::Service {
                status: 400,
                message: "Document must be a JSON object".to_string(),
            })?;
        body.remove("_id");
        body.remove("_rev");
        Ok(body)
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStorePort for InMemoryDocumentStore {
    async fn create(&self, document: &Value) -> Result<CreatedDocument, StoreError> {
        self.record_call();
        let body = Self::strip_reserved(document)?;

        let id = Uuid::new_v4().simple().to_string();
        let rev = Self::next_rev(1);
        self.documents.insert(
            id.clone(),
            StoredDocument {
                generation: 1,
                rev: rev.clone(),
                body,
            },
        );

        tracing::debug!(doc_id = %id, rev = %rev, "Document created");
        Ok(CreatedDocument { id, rev })
    }

    async fn retrieve(&self, id: &str) -> Result<Value, StoreError> {
        self.record_call();
        self.documents
            .get(id)
            .map(|doc| doc.to_json(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, rev: &str, document: &Value) -> Result<String, StoreError> {
        self.record_call();
        let body = Self::strip_reserved(document)?;

        let mut stored = self
            .documents
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if stored.rev != rev {
            return Err(StoreError::Conflict(id.to_string()));
        }

        stored.generation += 1;
        stored.rev = Self::next_rev(stored.generation);
        stored.body = body;

        tracing::debug!(doc_id = %id, rev = %stored.rev, "Document updated");
        Ok(stored.rev.clone())
    }

    async fn delete(&self, id: &str, rev: &str) -> Result<(), StoreError> {
        self.record_call();
        match self.documents.remove_if(id, |_, doc| doc.rev == rev) {
            Some(_) => {
                tracing::debug!(doc_id = %id, "Document deleted");
                Ok(())
            }
            None if self.documents.contains_key(id) => Err(StoreError::Conflict(id.to_string())),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    async fn query_view(&self, view: &ViewRef) -> Result<Vec<ViewRow>, StoreError> {
        self.record_call();
        let doc_type = self
            .views
            .get(&(view.design.clone(), view.view.clone()))
            .ok_or_else(|| StoreError::NotFound(format!("_design/{}/_view/{}", view.design, view.view)))?;

        let mut rows: Vec<ViewRow> = self
            .documents
            .iter()
            .filter(|entry| {
                entry.body.get("type").and_then(Value::as_str) == Some(doc_type.as_str())
            })
            .map(|entry| ViewRow {
                id: entry.key().clone(),
                value: entry.to_json(entry.key()),
            })
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(rows)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
