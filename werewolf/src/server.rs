use crate::config::Config;
use crate::error::{AppError, Result};
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use werewolf_infra::database::{
    DatabaseManager, SeaOrmDeckRepository, SeaOrmRoleRepository, SeaOrmStoredImageRepository,
    SeaOrmUserRepository,
};
use werewolf_infra::{Cache, CacheSessionService, LocalImageStorage, MemoryCache, SessionService};
use werewolf_service::{
    DefaultDeckService, DefaultPasswordService, DefaultRoleService, DefaultUserService, ImageStore,
    ImageStoreConfig, UploadPolicy,
};
use werewolf_web::{AppState, SessionSettings};

/// 表单中除图片以外的字段预留的请求体空间
const FORM_OVERHEAD: usize = 1024 * 1024;

/// 初始化应用状态
pub async fn init_app_state(config: &Config, db_manager: &DatabaseManager) -> Result<AppState> {
    let db = db_manager.primary_db();

    // 上传目录
    let storage = LocalImageStorage::new(config.uploads.dir.clone());
    storage.init().await?;
    info!("Upload directory ready at {}", config.uploads.dir.display());

    let role_repo = Arc::new(SeaOrmRoleRepository::new(db.clone()));
    let images = Arc::new(ImageStore::new(
        role_repo.clone(),
        Arc::new(SeaOrmStoredImageRepository::new(db.clone())),
        Arc::new(storage),
        ImageStoreConfig {
            url_prefix: config.uploads.url_prefix.clone(),
            duplicate_policy: config.uploads.duplicate_policy,
            upload_policy: UploadPolicy::role_images(config.uploads.max_file_size),
        },
    ));

    if config.uploads.reindex_on_startup {
        let report = images.reindex().await?;
        info!(
            seeded = report.seeded,
            indexed = report.indexed,
            skipped = report.skipped,
            "Image index rebuilt"
        );
    }

    // 密码与用户服务
    let password_service = Arc::new(
        DefaultPasswordService::new().with_bcrypt_cost(config.security.bcrypt_cost),
    );
    let user_service = Arc::new(DefaultUserService::new(
        Arc::new(SeaOrmUserRepository::new(db.clone())),
        password_service,
    ));

    let role_service = Arc::new(DefaultRoleService::new(role_repo.clone(), images));
    let deck_service = Arc::new(DefaultDeckService::new(
        Arc::new(SeaOrmDeckRepository::new(db)),
        role_repo,
    ));

    // Session存放在进程内缓存中
    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new(
        config.cache.memory_max_size,
        config.security.session_ttl,
    ));
    let session_service: Arc<dyn SessionService> =
        Arc::new(CacheSessionService::new(cache, config.security.session_ttl));

    Ok(AppState {
        user_service,
        role_service,
        deck_service,
        session_service,
        session: SessionSettings {
            ttl: config.security.session_ttl,
            cookie_secure: config.security.cookie_secure,
        },
        max_upload_body: config.uploads.max_file_size + FORM_OVERHEAD,
    })
}

/// 创建应用路由
pub fn create_router(state: AppState, config: &Config) -> Result<Router> {
    let cors = cors_layer(config)?;

    Ok(werewolf_web::api_router(state)
        // 上传的角色卡图片
        .nest_service(&config.uploads.url_prefix, ServeDir::new(&config.uploads.dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        ))
}

/// 指定了前端来源时允许携带Cookie，否则放开所有来源
fn cors_layer(config: &Config) -> Result<CorsLayer> {
    let Some(origin) = config.cors.allowed_origin.as_deref() else {
        return Ok(CorsLayer::permissive());
    };

    let origin: HeaderValue = origin
        .parse()
        .map_err(|e| AppError::Internal(format!("Invalid CORS origin {}: {}", origin, e)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer() {
        let mut config = Config::default();
        assert!(cors_layer(&config).is_ok());

        config.cors.allowed_origin = Some("http://localhost:3000".to_string());
        assert!(cors_layer(&config).is_ok());

        config.cors.allowed_origin = Some("bad\norigin".to_string());
        assert!(matches!(cors_layer(&config), Err(AppError::Internal(_))));
    }
}
