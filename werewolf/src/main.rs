mod config;
mod error;
mod server;

use config::Config;
use error::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use werewolf_infra::DatabaseManager;
use werewolf_migration::{Migrator, MigratorTrait};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志，RUST_LOG可覆盖默认级别
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("Starting Werewolf role catalog...");

    // 加载配置
    let config = Config::load()?;
    info!("Configuration loaded successfully");

    // 初始化数据库连接
    let db_manager = DatabaseManager::connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Database connection established");

    // 执行迁移
    Migrator::up(&*db_manager.primary_db(), None).await?;
    info!("Database migrations applied");

    // 初始化应用状态
    let app_state = server::init_app_state(&config, &db_manager).await?;
    info!("Application state initialized");

    // 创建路由
    let app = server::create_router(app_state, &config)?;

    // 启动HTTP服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
