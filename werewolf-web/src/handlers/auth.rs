use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::warn;
use werewolf_domain::{AuthenticatedUser, LoginRequest, SignupRequest, User};
use werewolf_service::ServiceError;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::security::{clear_session_cookie, session_cookie, session_id_from_headers};
use crate::AppState;

/// 用户信息（不包含敏感信息）
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<AuthenticatedUser> for UserInfo {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.user_id,
            username: user.username,
            email: user.email,
        }
    }
}

/// 创建Session并把Cookie写入响应
async fn start_session(state: &AppState, user: &User, status: StatusCode) -> Result<Response, ApiError> {
    let session_id = state
        .session_service
        .create(&AuthenticatedUser::from(user), Some(state.session.ttl))
        .await
        .map_err(|e| ServiceError::Internal(format!("Failed to create session: {}", e)))?;

    let cookie = session_cookie(&session_id, state.session.ttl, state.session.cookie_secure);
    let mut response = (status, Json(UserInfo::from(user))).into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| ServiceError::Internal(e.to_string()))?,
    );
    Ok(response)
}

/// 注册并登录
/// POST /api/auth/signup
#[utoipa::path(post, path = "/api/auth/signup", tag = "auth", responses(
    (status = 201, description = "注册成功，下发Session Cookie"),
    (status = 400, description = "字段缺失或邮箱已注册"),
))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let user = state.user_service.signup(request).await?;
    start_session(&state, &user, StatusCode::CREATED).await
}

/// 登录
/// POST /api/auth/login
#[utoipa::path(post, path = "/api/auth/login", tag = "auth", responses(
    (status = 200, description = "登录成功，下发Session Cookie"),
    (status = 401, description = "邮箱或密码错误"),
))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let user = state.user_service.login(request).await?;
    start_session(&state, &user, StatusCode::OK).await
}

/// 登出
/// POST /api/auth/logout
#[utoipa::path(post, path = "/api/auth/logout", tag = "auth", responses((status = 200, description = "已登出")))]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    if let Some(session_id) = session_id_from_headers(&headers) {
        if let Err(e) = state.session_service.delete(&session_id).await {
            // 继续执行，不因为Session删除失败而失败
            warn!("Failed to delete session during logout: {}", e);
        }
    }

    let mut response = Json(json!({ "message": "Logged out successfully" })).into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_str(&clear_session_cookie()).map_err(|e| ServiceError::Internal(e.to_string()))?,
    );
    Ok(response)
}

/// 当前用户
/// GET /api/auth/me
#[utoipa::path(get, path = "/api/auth/me", tag = "auth", responses(
    (status = 200, description = "当前用户"),
    (status = 401, description = "未登录"),
))]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserInfo> {
    Json(UserInfo::from(user))
}
