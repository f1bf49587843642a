use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// DatabaseManager 管理主数据库连接池
#[derive(Clone)]
pub struct DatabaseManager {
    primary: Arc<DatabaseConnection>,
}

impl DatabaseManager {
    /// 连接数据库（PostgreSQL、MySQL或SQLite，由URL决定）
    pub async fn connect(
        url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(url.to_string());
        options
            .max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let db = Database::connect(options).await?;
        info!(backend = ?db.get_database_backend(), "Database connected");

        Ok(Self { primary: Arc::new(db) })
    }

    /// 使用已有连接（测试中使用内存SQLite）
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { primary: Arc::new(db) }
    }

    /// 获取主数据库连接
    pub fn primary_db(&self) -> Arc<DatabaseConnection> {
        self.primary.clone()
    }
}
