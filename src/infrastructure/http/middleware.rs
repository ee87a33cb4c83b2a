//! HTTP Middleware
//!
//! 请求日志：路由模板、Book id、状态码与耗时

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

const BOOKS_PREFIX: &str = "/books/";

/// 从 `/books/<id>` 中取出 id（未解码）
///
/// `/books`、`/books/` 以及其他路径返回 None
pub fn book_id_from_path(path: &str) -> Option<&str> {
    path.strip_prefix(BOOKS_PREFIX).filter(|id| !id.is_empty())
}

/// 请求日志中间件
///
/// 4xx 记为 warn，5xx 记为 error，其余记为 debug
/// 具体错误原因在 ApiError::into_response() 中记录
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "-".to_string());
    let book_id = book_id_from_path(request.uri().path())
        .unwrap_or("-")
        .to_string();

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        tracing::error!(%method, %route, %book_id, status, latency_ms, "Book request failed");
    } else if response.status().is_client_error() {
        tracing::warn!(%method, %route, %book_id, status, latency_ms, "Book request rejected");
    } else {
        tracing::debug!(%method, %route, %book_id, status, latency_ms, "Book request served");
    }

    response
}
