//! Bookshelf - 图书资源的 HAL JSON 服务
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Book Context: Book 资源、复合 ID
//!
//! 应用层 (application/):
//! - Ports: DocumentStorePort
//! - BooksMapper: 文档 <-> Book 转换与存储调用
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API (HAL JSON)
//! - CouchDB: 文档存储 HTTP 客户端
//! - Memory: 内存文档存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
