use serde::Deserialize;
use std::path::PathBuf;
use werewolf_service::DuplicatePolicy;

/// 配置前缀，如 `WEREWOLF__DATABASE__URL`
const ENV_PREFIX: &str = "WEREWOLF";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub uploads: UploadConfig,
    pub security: SecurityConfig,
    pub cache: CacheConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://werewolf.db?mode=rwc".to_string(),
            max_connections: 10,
            min_connections: 1,
        }
    }
}

/// 角色卡图片上传
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub url_prefix: String,
    pub max_file_size: usize,
    pub duplicate_policy: DuplicatePolicy,
    /// 启动时重建图片摘要索引
    pub reindex_on_startup: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads/roles"),
            url_prefix: "/uploads/roles".to_string(),
            max_file_size: 5 * 1024 * 1024,
            duplicate_policy: DuplicatePolicy::Reject,
            reindex_on_startup: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub bcrypt_cost: u32,
    /// Session有效期（秒）
    pub session_ttl: u64,
    pub cookie_secure: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: 10,
            session_ttl: 86400,
            cookie_secure: false,
        }
    }
}

/// Session所用的进程内缓存
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub memory_max_size: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_max_size: 10000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// 允许携带Cookie的前端来源；未设置时不限制来源且不允许凭据
    pub allowed_origin: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // 如果存在.env文件，先加载它
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }

        let config = config::Config::builder()
            .add_source(config::File::with_name("werewolf").required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    #[test]
    fn test_defaults() {
        let config: Config = config::Config::builder().build().unwrap().try_deserialize().unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.database.url, "sqlite://werewolf.db?mode=rwc");
        assert_eq!(config.uploads.url_prefix, "/uploads/roles");
        assert_eq!(config.uploads.max_file_size, 5_242_880);
        assert_eq!(config.uploads.duplicate_policy, DuplicatePolicy::Reject);
        assert!(config.uploads.reindex_on_startup);
        assert_eq!(config.security.session_ttl, 86400);
        assert!(config.cors.allowed_origin.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let toml = r#"
            [server]
            port = 8080

            [uploads]
            duplicate_policy = "share"

            [cors]
            allowed_origin = "http://localhost:3000"
        "#;
        let config: Config = config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.uploads.duplicate_policy, DuplicatePolicy::Share);
        assert_eq!(config.uploads.dir, PathBuf::from("uploads/roles"));
        assert_eq!(config.cors.allowed_origin.as_deref(), Some("http://localhost:3000"));
    }
}
