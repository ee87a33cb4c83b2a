//! Book Context - Entity

use serde_json::Value;

use super::BookId;

/// Book 资源
///
/// 每次请求都从存储重新构造，进程内不保留任何 Book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// 客户端提交的字段
///
/// 只认 JSON 字符串；缺失或非字符串的字段一律视为未提供
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFields {
    pub kind: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

impl BookFields {
    /// 从请求 JSON 中提取字段
    pub fn from_json(json: &Value) -> Self {
        let field = |name: &str| json.get(name).and_then(Value::as_str).map(str::to_string);

        Self {
            kind: field("type"),
            title: field("title"),
            author: field("author"),
            isbn: field("isbn"),
        }
    }

    pub fn title(&self) -> Option<&str> {
        non_empty(&self.title)
    }

    pub fn author(&self) -> Option<&str> {
        non_empty(&self.author)
    }

    pub fn isbn(&self) -> Option<&str> {
        non_empty(&self.isbn)
    }

    pub fn kind(&self) -> Option<&str> {
        non_empty(&self.kind)
    }
}

// 空字符串与缺失等价，更新时无法把字段清空
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
