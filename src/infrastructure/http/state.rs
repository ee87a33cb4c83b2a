//! Application State
//!
//! 启动时构造一次，通过 `Arc<AppState>` 注入到每个 handler

use std::sync::Arc;

use crate::application::{BooksMapper, DocumentStorePort, ViewRef};

/// 应用状态
pub struct AppState {
    pub books_mapper: BooksMapper,
    /// 请求没有 Host 头时使用的 `host:port`
    pub default_authority: String,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        store: Arc<dyn DocumentStorePort>,
        all_books: ViewRef,
        default_authority: impl Into<String>,
    ) -> Self {
        Self {
            books_mapper: BooksMapper::new(store, all_books),
            default_authority: default_authority.into(),
        }
    }
}
