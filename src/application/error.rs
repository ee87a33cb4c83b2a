//! 应用层错误定义
//!
//! BooksMapper 所有操作共用的错误分类

use thiserror::Error;

use crate::domain::BookIdError;

/// 应用层错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("Book not found: {0}")]
    NotFound(String),

    /// 客户端数据校验失败，原因会回显给调用方
    #[error("{0}")]
    Invalid(String),

    /// 修订号不匹配
    #[error("Revision conflict for book: {0}")]
    Conflict(String),

    /// 其他存储/传输错误，细节只进日志
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ApplicationError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }

    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::Unknown(detail.into())
    }
}

impl From<BookIdError> for ApplicationError {
    fn from(err: BookIdError) -> Self {
        Self::Invalid(err.to_string())
    }
}
