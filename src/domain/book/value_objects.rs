//! Book Context - Value Objects

use std::fmt;

use super::BookIdError;

/// 复合 ID 分隔符
pub const ID_DELIMITER: char = ':';

/// 图书标识
///
/// 对外是 `<doc_id>:<rev>` 形式的不透明字符串，内部拆成两个字段。
///
/// 不变量:
/// - doc_id 非空
/// - rev 为 None 或非空
/// - 最多切成两段，第一个分隔符之后的内容全部属于 rev
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookId {
    doc_id: String,
    rev: Option<String>,
}

impl BookId {
    /// 由存储返回的文档 ID 和修订号组合
    pub fn new(doc_id: impl Into<String>, rev: impl Into<String>) -> Self {
        let rev = rev.into();
        Self {
            doc_id: doc_id.into(),
            rev: if rev.is_empty() { None } else { Some(rev) },
        }
    }

    /// 解析客户端传入的复合 ID
    pub fn parse(raw: &str) -> Result<Self, BookIdError> {
        if raw.is_empty() {
            return Err(BookIdError::Empty);
        }

        let mut parts = raw.splitn(2, ID_DELIMITER);
        let doc_id = parts.next().unwrap_or_default();
        if doc_id.is_empty() {
            return Err(BookIdError::Malformed(raw.to_string()));
        }

        let rev = parts
            .next()
            .filter(|rev| !rev.is_empty())
            .map(str::to_string);

        Ok(Self {
            doc_id: doc_id.to_string(),
            rev,
        })
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn rev(&self) -> Option<&str> {
        self.rev.as_deref()
    }

    /// 删除等需要修订号的操作使用
    pub fn require_rev(&self) -> Result<&str, BookIdError> {
        self.rev
            .as_deref()
            .ok_or_else(|| BookIdError::MissingRevision(self.doc_id.clone()))
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rev {
            Some(rev) => write!(f, "{}{}{}", self.doc_id, ID_DELIMITER, rev),
            None => write!(f, "{}", self.doc_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_revision() {
        let id = BookId::parse("abc123:1-9f8e").unwrap();
        assert_eq!(id.doc_id(), "abc123");
        assert_eq!(id.rev(), Some("1-9f8e"));
        assert_eq!(id.to_string(), "abc123:1-9f8e");
    }

    #[test]
    fn test_parse_without_revision() {
        let id = BookId::parse("abc123").unwrap();
        assert_eq!(id.doc_id(), "abc123");
        assert_eq!(id.rev(), None);
        assert_eq!(
            id.require_rev(),
            Err(BookIdError::MissingRevision("abc123".to_string()))
        );
    }

    #[test]
    fn test_parse_is_bounded_to_two_parts() {
        let id = BookId::parse("abc:2-x:y").unwrap();
        assert_eq!(id.doc_id(), "abc");
        assert_eq!(id.rev(), Some("2-x:y"));
        assert_eq!(id.to_string(), "abc:2-x:y");
    }

    #[test]
    fn test_trailing_delimiter_means_no_revision() {
        let id = BookId::parse("abc:").unwrap();
        assert_eq!(id.rev(), None);
        assert!(id.require_rev().is_err());
    }

    #[test]
    fn test_malformed_ids() {
        assert_eq!(BookId::parse(""), Err(BookIdError::Empty));
        assert_eq!(
            BookId::parse(":1-abc"),
            Err(BookIdError::Malformed(":1-abc".to_string()))
        );
    }

    #[test]
    fn test_new_composes_store_values() {
        let id = BookId::new("doc", "3-abc");
        assert_eq!(id.to_string(), "doc:3-abc");
        assert_eq!(id.require_rev(), Ok("3-abc"));
    }
}
