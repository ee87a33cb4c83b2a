//! HTTP Routes
//!
//! API Endpoints:
//! - /books        GET     列出所有 Book
//! - /books        POST    新建 Book
//! - /books/:id    GET     获取 Book
//! - /books/:id    PUT     合并更新 Book
//! - /books/:id    DELETE  删除 Book（id 必须带修订号）
//! - /books/       GET/PUT/DELETE  缺少 id，返回 404
//! - /ping         GET     健康检查

use axum::{routing::get, Router};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .merge(book_routes())
}

/// Book 路由
fn book_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/books", get(handlers::list_books).post(handlers::create_book))
        .route(
            "/books/:id",
            get(handlers::get_book)
                .put(handlers::update_book)
                .delete(handlers::delete_book),
        )
        .route(
            "/books/",
            get(handlers::missing_book_id)
                .put(handlers::missing_book_id)
                .delete(handlers::missing_book_id),
        )
}
