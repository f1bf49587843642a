/// 健康检查
/// GET /health
#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "服务正常")))]
pub async fn health() -> &'static str {
    "OK"
}
