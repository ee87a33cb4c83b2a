//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（DocumentStore）
//! - books_mapper: 文档 <-> Book 资源的转换与存储调用
//! - error: 应用层错误定义

pub mod books_mapper;
pub mod error;
pub mod ports;

pub use books_mapper::{BooksMapper, BOOK_TYPE};
pub use error::ApplicationError;
pub use ports::{CreatedDocument, DocumentStorePort, StoreError, ViewRef, ViewRow};
