//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod couchdb;
pub mod http;
pub mod memory;

pub use couchdb::{CouchDbClient, CouchDbClientConfig};
pub use memory::InMemoryDocumentStore;
