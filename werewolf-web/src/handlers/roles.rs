use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use werewolf_domain::Role;
use crate::error::ApiError;
use crate::extractors::{CurrentUser, RoleForm};
use crate::AppState;

/// 列出所有Role（最新的在前）
/// GET /api/roles
#[utoipa::path(get, path = "/api/roles", tag = "roles", responses((status = 200, description = "Role列表")))]
pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<Role>>, ApiError> {
    Ok(Json(state.role_service.list().await?))
}

/// 获取单个Role
/// GET /api/roles/:id
#[utoipa::path(get, path = "/api/roles/{id}", tag = "roles",
    params(("id" = i32, Path, description = "Role ID")),
    responses((status = 200, description = "Role"), (status = 404, description = "Role不存在")))]
pub async fn get_role(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Role>, ApiError> {
    Ok(Json(state.role_service.get(id).await?))
}

/// 创建Role（multipart，可附带图片）
/// POST /api/roles
#[utoipa::path(post, path = "/api/roles", tag = "roles", responses(
    (status = 201, description = "创建成功"),
    (status = 409, description = "图片已被其他Role使用"),
    (status = 413, description = "图片过大"),
    (status = 415, description = "不支持的图片类型"),
))]
pub async fn create_role(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    form: RoleForm,
) -> Result<(StatusCode, Json<Role>), ApiError> {
    let role = state
        .role_service
        .create(form.input, form.image, Some(user.user_id))
        .await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// 更新Role；不提交图片时保留原图片
/// PUT /api/roles/:id
#[utoipa::path(put, path = "/api/roles/{id}", tag = "roles",
    params(("id" = i32, Path, description = "Role ID")),
    responses((status = 200, description = "更新成功"), (status = 404, description = "Role不存在"), (status = 409, description = "图片已被其他Role使用")))]
pub async fn update_role(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<i32>,
    form: RoleForm,
) -> Result<Json<Role>, ApiError> {
    Ok(Json(state.role_service.update(id, form.input, form.image).await?))
}

/// 删除Role
/// DELETE /api/roles/:id
#[utoipa::path(delete, path = "/api/roles/{id}", tag = "roles",
    params(("id" = i32, Path, description = "Role ID")),
    responses((status = 200, description = "删除成功"), (status = 404, description = "Role不存在")))]
pub async fn delete_role(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    state.role_service.delete(id).await?;
    Ok(Json(json!({ "message": "Role deleted successfully" })))
}
