//! Domain Layer - 领域层
//!
//! 只有一个限界上下文:
//! - Book Context: 图书资源

pub mod book;

pub use book::{Book, BookFields, BookId, BookIdError};
