use werewolf_infra::SessionService;
use werewolf_service::{DeckService, RoleService, UserService};
use std::sync::Arc;

/// Session Cookie设置
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    /// 有效期（秒）
    pub ttl: u64,
    pub cookie_secure: bool,
}

/// 应用状态
/// 包含所有需要的服务实例
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub role_service: Arc<dyn RoleService>,
    pub deck_service: Arc<dyn DeckService>,
    pub session_service: Arc<dyn SessionService>,
    pub session: SessionSettings,
    /// 角色表单请求体上限（字节）
    pub max_upload_body: usize,
}
