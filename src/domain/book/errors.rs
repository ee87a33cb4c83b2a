//! Book Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookIdError {
    #[error("Book id is empty")]
    Empty,

    #[error("Malformed book id: {0}")]
    Malformed(String),

    #[error("Book id has no revision: {0}")]
    MissingRevision(String),
}
