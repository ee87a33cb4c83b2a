//! Bookshelf - 图书资源 HAL JSON 服务
//!
//! 启动流程: 配置 -> 日志 -> 文档存储 -> BooksMapper -> HTTP 服务器

use std::sync::Arc;

use bookshelf::application::{DocumentStorePort, BOOK_TYPE};
use bookshelf::config::{load_config, print_config, AppConfig, StoreBackend};
use bookshelf::infrastructure::http::{AppState, HttpServer, ServerConfig};
use bookshelf::infrastructure::{CouchDbClient, InMemoryDocumentStore};

/// 初始化日志
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},bookshelf={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 按配置创建文档存储
async fn create_store(config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStorePort>> {
    let all_books = config.couchdb.all_books_view();

    match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on restart");
            Ok(InMemoryDocumentStore::new()
                .with_type_view(&all_books, BOOK_TYPE)
                .arc())
        }
        StoreBackend::CouchDb => {
            let client = CouchDbClient::new(config.couchdb.client_config())?;

            if config.couchdb.setup {
                client.ensure_database().await?;
                client.ensure_view(&all_books).await?;
            } else if !client.health_check().await {
                tracing::warn!("CouchDB is not reachable yet; requests will fail until it is");
            }

            Ok(Arc::new(client))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Bookshelf API");
    print_config(&config);

    let store = create_store(&config).await?;

    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(
        store,
        config.couchdb.all_books_view(),
        config.server.public_authority(),
    );

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting server");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
