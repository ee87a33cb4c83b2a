//! Books Mapper - 文档与 Book 资源之间的转换
//!
//! 唯一负责：
//! - 存储文档 <-> Book 的字段映射
//! - 复合 ID (`<doc_id>:<rev>`) 的解析与组合
//! - 存储错误 -> ApplicationError 的翻译
//!
//! 每个逻辑操作只发起必要的存储调用，不做重试

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{DocumentStorePort, StoreError, ViewRef};
use crate::domain::{Book, BookFields, BookId};

/// 文档类型标识
pub const BOOK_TYPE: &str = "book";

/// 存储中的 Book 文档
///
/// 缺失、null 或非字符串的字段一律按空串读取
#[derive(Debug, Clone, Default, Serialize)]
struct BookDocument {
    #[serde(skip_serializing)]
    id: String,
    #[serde(skip_serializing)]
    rev: String,
    #[serde(rename = "type")]
    kind: String,
    title: String,
    author: String,
    isbn: String,
}

impl BookDocument {
    fn from_json(json: &Value) -> Self {
        let field = |name: &str| {
            json.get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            id: field("_id"),
            rev: field("_rev"),
            kind: field("type"),
            title: field("title"),
            author: field("author"),
            isbn: field("isbn"),
        }
    }

    fn to_json(&self) -> Result<Value, ApplicationError> {
        serde_json::to_value(self).map_err(|e| ApplicationError::unknown(e.to_string()))
    }

    fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
        }
    }
}

/// 传入字段非空则取传入值，否则保留存储值
fn merge(incoming: Option<&str>, stored: String) -> String {
    incoming.map(str::to_string).unwrap_or(stored)
}

/// Books Mapper
pub struct BooksMapper {
    store: Arc<dyn DocumentStorePort>,
    all_books: ViewRef,
}

impl BooksMapper {
    pub fn new(store: Arc<dyn DocumentStorePort>, all_books: ViewRef) -> Self {
        tracing::info!(
            design = %all_books.design,
            view = %all_books.view,
            "BooksMapper initialized"
        );
        Self { store, all_books }
    }

    /// 存储健康检查
    pub async fn store_available(&self) -> bool {
        self.store.health_check().await
    }

    /// 通过视图获取所有 Book
    ///
    /// 视图没有行时返回空列表，存储失败返回 `Unknown`
    pub async fn fetch_all(&self) -> Result<Vec<Book>, ApplicationError> {
        let rows = self
            .store
            .query_view(&self.all_books)
            .await
            .map_err(|e| store_failure("Could not fetch all books", e))?;

        let mut books = Vec::with_capacity(rows.len());
        for row in rows {
            let doc = BookDocument::from_json(&row.value);
            let doc_id = if doc.id.is_empty() { row.id } else { doc.id.clone() };
            let id = BookId::new(doc_id, doc.rev.clone());
            books.push(doc.into_book(id));
        }

        tracing::debug!(count = books.len(), "Fetched all books");
        Ok(books)
    }

    /// 获取单个 Book，忽略 ID 中的修订号
    pub async fn fetch_book(&self, id: &str) -> Result<Book, ApplicationError> {
        let book_id = BookId::parse(id)?;
        let doc = self.retrieve(&book_id).await?;
        let id = BookId::new(doc.id.clone(), doc.rev.clone());
        Ok(doc.into_book(id))
    }

    /// 新建 Book
    ///
    /// title 和 author 校验在任何存储调用之前完成
    pub async fn insert_book(&self, fields: BookFields) -> Result<Book, ApplicationError> {
        let (title, author) = match (fields.title(), fields.author()) {
            (Some(title), Some(author)) => (title.to_string(), author.to_string()),
            _ => {
                return Err(ApplicationError::invalid(
                    "A Book must have a title and an author",
                ))
            }
        };

        let doc = BookDocument {
            kind: BOOK_TYPE.to_string(),
            title,
            author,
            isbn: fields.isbn().unwrap_or_default().to_string(),
            ..Default::default()
        };

        let created = self
            .store
            .create(&doc.to_json()?)
            .await
            .map_err(|e| store_failure("Could not create book", e))?;

        tracing::info!(doc_id = %created.id, title = %doc.title, "Book created");
        Ok(doc.into_book(BookId::new(created.id, created.rev)))
    }

    /// 合并更新 Book
    ///
    /// 写回时使用存储中当前的修订号，而不是客户端传入的修订号
    pub async fn update_book(
        &self,
        id: &str,
        fields: BookFields,
    ) -> Result<Book, ApplicationError> {
        let book_id = BookId::parse(id)?;
        let current = self.retrieve(&book_id).await?;

        let merged = BookDocument {
            id: current.id.clone(),
            rev: current.rev.clone(),
            kind: merge(fields.kind(), current.kind),
            title: merge(fields.title(), current.title),
            author: merge(fields.author(), current.author),
            isbn: merge(fields.isbn(), current.isbn),
        };

        let new_rev = self
            .store
            .update(&merged.id, &merged.rev, &merged.to_json()?)
            .await
            .map_err(|e| mutation_failure("Could not update book", &book_id, e))?;

        tracing::info!(doc_id = %merged.id, rev = %new_rev, "Book updated");
        let id = BookId::new(merged.id.clone(), new_rev);
        Ok(merged.into_book(id))
    }

    /// 删除 Book，返回删除前的内容
    ///
    /// ID 必须包含修订号；删除成功后才返回快照
    pub async fn remove_book(&self, id: &str) -> Result<Book, ApplicationError> {
        let book_id = BookId::parse(id)?;
        let rev = book_id.require_rev()?.to_string();

        let snapshot = self.retrieve(&book_id).await?;
        let snapshot_id = BookId::new(snapshot.id.clone(), snapshot.rev.clone());

        self.store
            .delete(book_id.doc_id(), &rev)
            .await
            .map_err(|e| mutation_failure("Could not delete book", &book_id, e))?;

        tracing::info!(doc_id = %book_id.doc_id(), rev = %rev, "Book deleted");
        Ok(snapshot.into_book(snapshot_id))
    }

    async fn retrieve(&self, book_id: &BookId) -> Result<BookDocument, ApplicationError> {
        let json = self
            .store
            .retrieve(book_id.doc_id())
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => ApplicationError::not_found(book_id.doc_id()),
                other => store_failure("Could not read book", other),
            })?;

        let mut doc = BookDocument::from_json(&json);
        if doc.id.is_empty() {
            doc.id = book_id.doc_id().to_string();
        }
        Ok(doc)
    }
}

fn store_failure(message: &str, err: StoreError) -> ApplicationError {
    tracing::error!(code = err.code(), error = %err, "{}", message);
    ApplicationError::unknown(err.to_string())
}

fn mutation_failure(message: &str, book_id: &BookId, err: StoreError) -> ApplicationError {
    match err {
        StoreError::NotFound(_) => {
            tracing::warn!(code = err.code(), doc_id = %book_id.doc_id(), "{}: document vanished", message);
            ApplicationError::not_found(book_id.doc_id())
        }
        StoreError::Conflict(_) => {
            tracing::warn!(code = err.code(), doc_id = %book_id.doc_id(), "{}: revision conflict", message);
            ApplicationError::Conflict(book_id.to_string())
        }
        other => store_failure(message, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryDocumentStore;
    use serde_json::json;

    fn setup() -> (Arc<InMemoryDocumentStore>, BooksMapper) {
        let store = InMemoryDocumentStore::new()
            .with_type_view(&ViewRef::default(), BOOK_TYPE)
            .arc();
        let mapper = BooksMapper::new(store.clone(), ViewRef::default());
        (store, mapper)
    }

    fn fields(json: Value) -> BookFields {
        BookFields::from_json(&json)
    }

    #[tokio::test]
    async fn test_insert_requires_title_and_author_before_store_access() {
        let (store, mapper) = setup();

        for body in [
            json!({"title": "", "author": "A"}),
            json!({"title": "T"}),
            json!({"author": "A"}),
            json!({}),
        ] {
            let result = mapper.insert_book(fields(body)).await;
            assert_eq!(
                result,
                Err(ApplicationError::invalid("A Book must have a title and an author"))
            );
        }

        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_insert_then_fetch_round_trip() {
        let (_store, mapper) = setup();

        let created = mapper
            .insert_book(fields(json!({"title": "T", "author": "A"})))
            .await
            .unwrap();
        assert_eq!(created.isbn, "");
        assert!(created.id.rev().is_some());

        let fetched = mapper.fetch_book(&created.id.to_string()).await.unwrap();
        assert_eq!(fetched, created);

        // 只用文档 ID 也能读取
        let by_doc_id = mapper.fetch_book(created.id.doc_id()).await.unwrap();
        assert_eq!(by_doc_id.title, "T");
        assert_eq!(by_doc_id.author, "A");
    }

    #[tokio::test]
    async fn test_insert_stores_only_managed_fields() {
        let (store, mapper) = setup();

        let created = mapper
            .insert_book(fields(json!({
                "title": "T",
                "author": "A",
                "isbn": "123",
                "price": 10
            })))
            .await
            .unwrap();

        let doc = store.retrieve(created.id.doc_id()).await.unwrap();
        let mut keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        keys.sort();
        assert_eq!(keys, ["_id", "_rev", "author", "isbn", "title", "type"]);
        assert_eq!(doc["type"], BOOK_TYPE);
    }

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let (_store, mapper) = setup();

        assert_eq!(
            mapper.fetch_book("missing").await,
            Err(ApplicationError::not_found("missing"))
        );
        assert_eq!(
            mapper.update_book("missing:1-a", fields(json!({"title": "X"}))).await,
            Err(ApplicationError::not_found("missing"))
        );
        assert_eq!(
            mapper.remove_book("missing:1-a").await,
            Err(ApplicationError::not_found("missing"))
        );
    }

    #[tokio::test]
    async fn test_partial_update_keeps_stored_values() {
        let (_store, mapper) = setup();
        let created = mapper
            .insert_book(fields(json!({"title": "Old", "author": "A", "isbn": "1"})))
            .await
            .unwrap();

        let updated = mapper
            .update_book(
                &created.id.to_string(),
                fields(json!({"title": "New", "author": ""})),
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "New");
        assert_eq!(updated.author, "A");
        assert_eq!(updated.isbn, "1");
        assert_eq!(updated.id.doc_id(), created.id.doc_id());
        assert_ne!(updated.id, created.id);

        let fetched = mapper.fetch_book(created.id.doc_id()).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_update_uses_current_revision() {
        let (_store, mapper) = setup();
        let created = mapper
            .insert_book(fields(json!({"title": "T", "author": "A"})))
            .await
            .unwrap();
        let first = mapper
            .update_book(&created.id.to_string(), fields(json!({"isbn": "9"})))
            .await
            .unwrap();

        // 旧修订号的 ID 仍然可以更新
        let second = mapper
            .update_book(&created.id.to_string(), fields(json!({"title": "T2"})))
            .await
            .unwrap();
        assert_eq!(second.isbn, "9");
        assert_ne!(second.id, first.id);
    }

    #[tokio::test]
    async fn test_remove_requires_revision() {
        let (store, mapper) = setup();
        let created = mapper
            .insert_book(fields(json!({"title": "T", "author": "A"})))
            .await
            .unwrap();
        let calls = store.call_count();

        let result = mapper.remove_book(created.id.doc_id()).await;
        assert!(matches!(result, Err(ApplicationError::Invalid(_))));
        assert_eq!(store.call_count(), calls);
    }

    #[tokio::test]
    async fn test_remove_returns_pre_delete_snapshot() {
        let (store, mapper) = setup();
        let created = mapper
            .insert_book(fields(json!({"title": "T", "author": "A"})))
            .await
            .unwrap();

        let removed = mapper.remove_book(&created.id.to_string()).await.unwrap();
        assert_eq!(removed, created);
        assert!(store.is_empty());
        assert_eq!(
            mapper.fetch_book(&created.id.to_string()).await,
            Err(ApplicationError::not_found(created.id.doc_id()))
        );
    }

    #[tokio::test]
    async fn test_remove_with_stale_revision_conflicts() {
        let (store, mapper) = setup();
        let created = mapper
            .insert_book(fields(json!({"title": "T", "author": "A"})))
            .await
            .unwrap();
        mapper
            .update_book(&created.id.to_string(), fields(json!({"title": "T2"})))
            .await
            .unwrap();

        let result = mapper.remove_book(&created.id.to_string()).await;
        assert_eq!(result, Err(ApplicationError::Conflict(created.id.to_string())));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_all() {
        let (_store, mapper) = setup();
        assert!(mapper.fetch_all().await.unwrap().is_empty());

        let a = mapper
            .insert_book(fields(json!({"title": "A", "author": "X"})))
            .await
            .unwrap();
        let b = mapper
            .insert_book(fields(json!({"title": "B", "author": "Y", "isbn": "2"})))
            .await
            .unwrap();

        let books = mapper.fetch_all().await.unwrap();
        assert_eq!(books.len(), 2);
        assert!(books.contains(&a));
        assert!(books.contains(&b));
    }

    #[tokio::test]
    async fn test_fetch_all_store_failure_is_unknown() {
        // 未注册视图，存储返回 404
        let store = InMemoryDocumentStore::new().arc();
        let mapper = BooksMapper::new(store, ViewRef::default());

        assert!(matches!(
            mapper.fetch_all().await,
            Err(ApplicationError::Unknown(_))
        ));
    }

    #[tokio::test]
    async fn test_null_and_non_string_fields_read_as_empty() {
        let (store, mapper) = setup();
        let created = store
            .create(&json!({"type": "book", "title": "T", "author": "A", "isbn": null}))
            .await
            .unwrap();
        store
            .create(&json!({"type": "book", "title": 7, "author": "B"}))
            .await
            .unwrap();

        let books = mapper.fetch_all().await.unwrap();
        assert_eq!(books.len(), 2);
        assert!(books.iter().any(|b| b.title == "T" && b.isbn.is_empty()));
        assert!(books.iter().any(|b| b.author == "B" && b.title.is_empty()));

        let book = mapper.fetch_book(&created.id).await.unwrap();
        assert_eq!(book.title, "T");
        assert_eq!(book.author, "A");
        assert_eq!(book.isbn, "");
        assert_eq!(book.id, BookId::new(created.id, created.rev));
    }

    #[tokio::test]
    async fn test_malformed_id_is_invalid() {
        let (store, mapper) = setup();
        assert!(matches!(
            mapper.fetch_book(":1-a").await,
            Err(ApplicationError::Invalid(_))
        ));
        assert_eq!(store.call_count(), 0);
    }
}
