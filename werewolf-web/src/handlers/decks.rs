use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use werewolf_domain::{Deck, DeckBalance, DeckRequest, DeckRoleRequest};
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::AppState;

/// 预览请求：尚未保存的角色组合
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub roles: Vec<DeckRoleRequest>,
}

/// 当前用户的Deck列表
/// GET /api/decks
#[utoipa::path(get, path = "/api/decks", tag = "decks", responses((status = 200, description = "Deck列表")))]
pub async fn list_decks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Deck>>, ApiError> {
    Ok(Json(state.deck_service.list(user.user_id).await?))
}

/// GET /api/decks/:id
#[utoipa::path(get, path = "/api/decks/{id}", tag = "decks",
    params(("id" = i32, Path, description = "Deck ID")),
    responses((status = 200, description = "Deck及其平衡统计"), (status = 404, description = "Deck不存在")))]
pub async fn get_deck(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Deck>, ApiError> {
    Ok(Json(state.deck_service.get(id, user.user_id).await?))
}

/// POST /api/decks
#[utoipa::path(post, path = "/api/decks", tag = "decks", responses(
    (status = 201, description = "创建成功"),
    (status = 400, description = "数量无效或角色不存在"),
))]
pub async fn create_deck(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<DeckRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Deck>), ApiError> {
    let Json(request) = payload?;
    let deck = state.deck_service.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(deck)))
}

/// PUT /api/decks/:id
#[utoipa::path(put, path = "/api/decks/{id}", tag = "decks",
    params(("id" = i32, Path, description = "Deck ID")),
    responses((status = 200, description = "更新成功"), (status = 404, description = "Deck不存在")))]
pub async fn update_deck(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    payload: Result<Json<DeckRequest>, JsonRejection>,
) -> Result<Json<Deck>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(state.deck_service.update(id, user.user_id, request).await?))
}

/// DELETE /api/decks/:id
#[utoipa::path(delete, path = "/api/decks/{id}", tag = "decks",
    params(("id" = i32, Path, description = "Deck ID")),
    responses((status = 200, description = "删除成功"), (status = 404, description = "Deck不存在")))]
pub async fn delete_deck(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    state.deck_service.delete(id, user.user_id).await?;
    Ok(Json(json!({ "message": "Deck deleted successfully" })))
}

/// 计算未保存组合的平衡统计
/// POST /api/decks/preview
#[utoipa::path(post, path = "/api/decks/preview", tag = "decks", responses((status = 200, description = "平衡统计")))]
pub async fn preview_deck(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<DeckBalance>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(state.deck_service.preview(&request.roles).await?))
}
