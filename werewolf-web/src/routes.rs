use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use crate::handlers::*;
use crate::openapi::openapi_json;
use crate::security::auth_middleware;
use crate::AppState;

/// API路由：认证、角色卡、Deck与健康检查
///
/// 静态文件与全局中间件（CORS、Trace等）由启动程序叠加。
pub fn api_router(state: AppState) -> Router {
    let roles = Router::new()
        .route("/api/roles", get(list_roles).post(create_role))
        .route("/api/roles/:id", get(get_role).put(update_role).delete(delete_role))
        .layer(DefaultBodyLimit::max(state.max_upload_body));

    Router::new()
        .route("/health", get(health))
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .merge(roles)
        .route("/api/decks", get(list_decks).post(create_deck))
        .route("/api/decks/preview", post(preview_deck))
        .route("/api/decks/:id", get(get_deck).put(update_deck).delete(delete_deck))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
