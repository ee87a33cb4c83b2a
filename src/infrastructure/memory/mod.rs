//! Memory Layer - In-Memory Document Store
//!
//! 不依赖外部 CouchDB 的文档存储实现，用于本地开发和测试

mod document_store;

pub use document_store::InMemoryDocumentStore;
