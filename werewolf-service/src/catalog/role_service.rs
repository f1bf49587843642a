use crate::error::ServiceError;
use crate::image::{ImageStore, ImageUpload, PreparedImage};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use validator::Validate;
use werewolf_domain::{Role, RoleInput};
use werewolf_infra::database::RoleRepository;

/// Role服务trait
#[async_trait]
pub trait RoleService: Send + Sync {
    /// 所有Role，最新的在前
    async fn list(&self) -> Result<Vec<Role>, ServiceError>;

    async fn get(&self, id: i32) -> Result<Role, ServiceError>;

    /// 创建Role，可附带图片
    async fn create(
        &self,
        input: RoleInput,
        image: Option<ImageUpload>,
        created_by: Option<i32>,
    ) -> Result<Role, ServiceError>;

    /// 更新Role；未提供图片时保留原图片
    async fn update(&self, id: i32, input: RoleInput, image: Option<ImageUpload>) -> Result<Role, ServiceError>;

    /// 删除Role，并释放不再被引用的图片
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
}

/// 默认Role服务实现
///
/// 图片文件的写入与删除都围绕Role记录的提交进行：
/// 提交失败时撤销新文件，提交成功后才释放旧文件。
pub struct DefaultRoleService {
    roles: Arc<dyn RoleRepository>,
    images: Arc<ImageStore>,
}

impl DefaultRoleService {
    pub fn new(roles: Arc<dyn RoleRepository>, images: Arc<ImageStore>) -> Self {
        Self { roles, images }
    }

    async fn discard(&self, prepared: Option<&PreparedImage>) {
        if let Some(prepared) = prepared {
            self.images.discard(prepared).await;
        }
    }

    fn commit(&self, prepared: Option<&PreparedImage>) {
        if let Some(prepared) = prepared {
            self.images.commit(prepared);
        }
    }
}

fn not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Role {} not found", id))
}

#[async_trait]
impl RoleService for DefaultRoleService {
    async fn list(&self) -> Result<Vec<Role>, ServiceError> {
        Ok(self.roles.list().await?)
    }

    async fn get(&self, id: i32) -> Result<Role, ServiceError> {
        self.roles.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    async fn create(
        &self,
        input: RoleInput,
        image: Option<ImageUpload>,
        created_by: Option<i32>,
    ) -> Result<Role, ServiceError> {
        input.validate()?;

        let prepared = match image {
            Some(upload) => Some(self.images.store_new_image(&upload).await?),
            None => None,
        };
        let pointer = prepared.as_ref().map(|p| &p.pointer);

        match self.roles.insert(&input, pointer, created_by).await {
            Ok(role) => {
                self.commit(prepared.as_ref());
                info!("Created role {} ({})", role.id, role.name);
                Ok(role)
            }
            Err(e) => {
                self.discard(prepared.as_ref()).await;
                Err(e.into())
            }
        }
    }

    async fn update(&self, id: i32, input: RoleInput, image: Option<ImageUpload>) -> Result<Role, ServiceError> {
        input.validate()?;

        let existing = self.get(id).await?;
        let prepared = match image {
            Some(upload) => Some(self.images.replace_image(&upload, &existing).await?),
            None => None,
        };
        let pointer = prepared.as_ref().map(|p| &p.pointer);

        let updated = match self.roles.update(id, &input, pointer).await {
            Ok(Some(role)) => {
                self.commit(prepared.as_ref());
                role
            }
            Ok(None) => {
                self.discard(prepared.as_ref()).await;
                return Err(not_found(id));
            }
            Err(e) => {
                self.discard(prepared.as_ref()).await;
                return Err(e.into());
            }
        };

        if let Some(old_url) = existing.image_url.as_deref() {
            if updated.image_url.as_deref() != Some(old_url) {
                self.images.release_image(id, old_url).await;
            }
        }

        info!("Updated role {}", id);
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        if !self.roles.delete(id).await? {
            return Err(not_found(id));
        }

        if let Some(url) = existing.image_url.as_deref() {
            self.images.release_image(id, url).await;
        }

        info!("Deleted role {}", id);
        Ok(())
    }
}
