use axum::Json;
use utoipa::OpenApi;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify,
};
use crate::handlers;

/// OpenAPI文档配置
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::roles::list_roles,
        handlers::roles::get_role,
        handlers::roles::create_role,
        handlers::roles::update_role,
        handlers::roles::delete_role,
        handlers::decks::list_decks,
        handlers::decks::get_deck,
        handlers::decks::create_deck,
        handlers::decks::update_deck,
        handlers::decks::delete_deck,
        handlers::decks::preview_deck,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "健康检查端点"),
        (name = "auth", description = "注册、登录与Session"),
        (name = "roles", description = "角色卡目录"),
        (name = "decks", description = "角色组合与平衡统计"),
    ),
    info(
        title = "Werewolf Role Catalog API",
        description = "Ultimate Werewolf角色卡目录与Deck构建",
        version = "0.1.0"
    ),
    servers(
        (url = "http://localhost:5000", description = "本地开发服务器"),
    )
)]
pub struct ApiDoc;

/// 安全配置修改器
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "sessionCookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("SESSION"))),
            );
        }
    }
}

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
