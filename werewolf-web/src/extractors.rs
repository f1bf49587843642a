pub mod role_form;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use werewolf_domain::AuthenticatedUser;
use crate::error::ApiError;

pub use role_form::RoleForm;

/// 当前用户提取器
/// 从请求扩展中提取已认证的用户信息，未登录时返回401
pub struct CurrentUser(pub AuthenticatedUser);

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or(ApiError::Unauthenticated)
    }
}
