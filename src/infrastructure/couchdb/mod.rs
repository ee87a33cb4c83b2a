//! CouchDB Adapter - 文档存储的 HTTP 实现

mod client;

pub use client::{CouchDbClient, CouchDbClientConfig};
