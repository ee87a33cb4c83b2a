//! Data Transfer Objects - HAL 风格的响应结构

use serde::Serialize;

use crate::domain::Book;

/// HAL 媒体类型
pub const HAL_JSON: &str = "application/hal+json";

/// `_links` 字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: String,
}

impl Links {
    pub fn to(href: impl Into<String>) -> Self {
        Self {
            self_link: href.into(),
        }
    }
}

/// 单个 Book 的响应
#[derive(Debug, Clone, Serialize)]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl BookResponse {
    /// `base_url` 形如 `http://localhost:8090`
    pub fn new(book: Book, base_url: &str) -> Self {
        let id = book.id.to_string();
        Self {
            links: Links::to(format!("{}/books/{}", base_url, id)),
            id,
            title: book.title,
            author: book.author,
            isbn: book.isbn,
        }
    }
}

/// Book 列表响应
#[derive(Debug, Clone, Serialize)]
pub struct BookCollectionResponse {
    #[serde(rename = "_links")]
    pub links: Links,
    #[serde(rename = "_embedded")]
    pub embedded: Vec<BookResponse>,
    pub count: usize,
}

impl BookCollectionResponse {
    pub fn new(books: Vec<Book>, base_url: &str) -> Self {
        let embedded: Vec<BookResponse> = books
            .into_iter()
            .map(|book| BookResponse::new(book, base_url))
            .collect();

        Self {
            links: Links::to(format!("{}/books", base_url)),
            count: embedded.len(),
            embedded,
        }
    }
}
