//! Book Context - 图书限界上下文
//!
//! 职责:
//! - Book 资源形态
//! - 复合 ID (文档 ID + 修订号) 的解析与组合
//! - 请求字段的提取与合并

mod entity;
mod errors;
mod value_objects;

pub use entity::{Book, BookFields};
pub use errors::BookIdError;
pub use value_objects::{BookId, ID_DELIMITER};
