//! Book HTTP Handlers
//!
//! 每个路由: 解析请求 -> 调用 BooksMapper -> 包装 HAL 响应

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{
        header::{CONTENT_TYPE, HOST},
        HeaderMap,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::BookFields;
use crate::infrastructure::http::dto::{BookCollectionResponse, BookResponse, HAL_JSON};
use crate::infrastructure::http::error::{message, ApiError};
use crate::infrastructure::http::state::AppState;

// ============================================================================
// Helpers
// ============================================================================

/// 由 Host 头推导 Base URL
fn base_url(headers: &HeaderMap, default_authority: &str) -> String {
    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(default_authority);
    format!("http://{}", host)
}

fn hal<T: Serialize>(body: T) -> Response {
    ([(CONTENT_TYPE, HAL_JSON)], Json(body)).into_response()
}

/// 校验 Content-Type 并解析 JSON 请求体
fn parse_body(headers: &HeaderMap, body: &Bytes) -> Result<Value, ApiError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !content_type.starts_with("application/json") {
        return Err(ApiError::InvalidData(message::INVALID_DATA.to_string()));
    }

    if body.is_empty() {
        return Err(ApiError::MissingBody("No body found in request".to_string()));
    }

    serde_json::from_slice(body)
        .map_err(|e| ApiError::MissingBody(format!("Body contains invalid JSON: {}", e)))
}

// ============================================================================
// Handlers
// ============================================================================

/// 获取 Book 列表
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    tracing::info!("Handling a get to /books");

    let books = state.books_mapper.fetch_all().await?;
    let base_url = base_url(&headers, &state.default_authority);

    Ok(hal(BookCollectionResponse::new(books, &base_url)))
}

/// 获取单个 Book
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    tracing::info!(id = %id, "Handling a get to /books/:id");

    let book = state.books_mapper.fetch_book(&id).await?;
    let base_url = base_url(&headers, &state.default_authority);

    Ok(hal(BookResponse::new(book, &base_url)))
}

/// 新建 Book
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    tracing::info!("Handling a post to /books");

    let json = parse_body(&headers, &body)?;
    let book = state
        .books_mapper
        .insert_book(BookFields::from_json(&json))
        .await?;
    let base_url = base_url(&headers, &state.default_authority);

    Ok(hal(BookResponse::new(book, &base_url)))
}

/// 合并更新 Book
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    tracing::info!(id = %id, "Handling a put to /books/:id");

    let json = parse_body(&headers, &body)?;
    let book = state
        .books_mapper
        .update_book(&id, BookFields::from_json(&json))
        .await?;
    let base_url = base_url(&headers, &state.default_authority);

    Ok(hal(BookResponse::new(book, &base_url)))
}

/// 删除 Book，返回删除前的内容
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    tracing::info!(id = %id, "Handling a delete to /books/:id");

    let book = state.books_mapper.remove_book(&id).await?;
    let base_url = base_url(&headers, &state.default_authority);

    Ok(hal(BookResponse::new(book, &base_url)))
}

/// `/books/` 上没有 id 的 GET/PUT/DELETE
pub async fn missing_book_id() -> ApiError {
    tracing::info!("Handling a request to /books/ without an id");
    ApiError::NotFound(message::MISSING_ID.to_string())
}
