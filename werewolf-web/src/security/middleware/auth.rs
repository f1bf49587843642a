use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;
use crate::security::session_id_from_headers;
use crate::AppState;

/// 认证中间件
/// 从SESSION Cookie解析出用户信息并注入请求扩展；未登录的请求照常放行，由提取器决定是否拒绝
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(session_id) = session_id_from_headers(request.headers()) {
        match state.session_service.get(&session_id).await {
            Ok(Some(user)) => {
                request.extensions_mut().insert(user);
            }
            Ok(None) => {}
            Err(e) => {
                // Session存储出错，按未登录处理
                warn!("Failed to load session: {}", e);
            }
        }
    }

    next.run(request).await
}
