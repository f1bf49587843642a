use crate::database::entities::{deck_role, role};
use werewolf_domain::{ImagePointer, Role, RoleInput};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

/// RoleRepository trait 定义Role记录的数据访问操作
///
/// 图片去重与引用检查依赖 `find_by_image_hash` 与 `find_by_image_url`。
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// 所有Role，按创建时间倒序
    async fn list(&self) -> Result<Vec<Role>, DbErr>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Role>, DbErr>;

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Role>, DbErr>;

    async fn insert(
        &self,
        input: &RoleInput,
        image: Option<&ImagePointer>,
        created_by: Option<i32>,
    ) -> Result<Role, DbErr>;

    /// 更新字段；`image` 为None时保留原图片指针。Role不存在时返回None
    async fn update(
        &self,
        id: i32,
        input: &RoleInput,
        image: Option<&ImagePointer>,
    ) -> Result<Option<Role>, DbErr>;

    /// 删除Role及其所在Deck中的条目，返回是否存在
    async fn delete(&self, id: i32) -> Result<bool, DbErr>;

    /// 查找使用该摘要的Role（可排除自身）
    async fn find_by_image_hash(&self, hash: &str, exclude_id: Option<i32>) -> Result<Option<Role>, DbErr>;

    /// 查找引用该URL的Role（可排除自身）
    async fn find_by_image_url(&self, url: &str, exclude_id: Option<i32>) -> Result<Option<Role>, DbErr>;

    /// 所有带图片的Role
    async fn list_with_images(&self) -> Result<Vec<Role>, DbErr>;
}

/// SeaOrmRoleRepository 使用Sea-ORM实现的Repository
pub struct SeaOrmRoleRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmRoleRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_domain(models: Vec<role::Model>) -> Result<Vec<Role>, DbErr> {
    models.into_iter().map(Role::try_from).collect()
}

#[async_trait]
impl RoleRepository for SeaOrmRoleRepository {
    async fn list(&self) -> Result<Vec<Role>, DbErr> {
        let models = role::Entity::find()
            .order_by_desc(role::Column::CreatedAt)
            .order_by_desc(role::Column::Id)
            .all(&*self.db)
            .await?;
        to_domain(models)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Role>, DbErr> {
        role::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .map(Role::try_from)
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Role>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = role::Entity::find()
            .filter(role::Column::Id.is_in(ids.iter().copied()))
            .all(&*self.db)
            .await?;
        to_domain(models)
    }

    async fn insert(
        &self,
        input: &RoleInput,
        image: Option<&ImagePointer>,
        created_by: Option<i32>,
    ) -> Result<Role, DbErr> {
        let active_model = role::ActiveModel {
            name: Set(input.name.clone()),
            description: Set(input.description.clone()),
            team: Set(input.team.as_str().to_string()),
            score: Set(input.score),
            image_url: Set(image.map(|i| i.url.clone())),
            image_hash: Set(image.map(|i| i.hash.clone())),
            is_official: Set(false),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = active_model.insert(&*self.db).await?;
        Role::try_from(model)
    }

    async fn update(
        &self,
        id: i32,
        input: &RoleInput,
        image: Option<&ImagePointer>,
    ) -> Result<Option<Role>, DbErr> {
        let Some(model) = role::Entity::find_by_id(id).one(&*self.db).await? else {
            return Ok(None);
        };

        let mut active_model: role::ActiveModel = model.into();
        active_model.name = Set(input.name.clone());
        active_model.description = Set(input.description.clone());
        active_model.team = Set(input.team.as_str().to_string());
        active_model.score = Set(input.score);
        if let Some(image) = image {
            active_model.image_url = Set(Some(image.url.clone()));
            active_model.image_hash = Set(Some(image.hash.clone()));
        }

        let model = active_model.update(&*self.db).await?;
        Role::try_from(model).map(Some)
    }

    async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;

        deck_role::Entity::delete_many()
            .filter(deck_role::Column::RoleId.eq(id))
            .exec(&txn)
            .await?;
        let result = role::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn find_by_image_hash(&self, hash: &str, exclude_id: Option<i32>) -> Result<Option<Role>, DbErr> {
        let mut query = role::Entity::find().filter(role::Column::ImageHash.eq(hash));
        if let Some(id) = exclude_id {
            query = query.filter(role::Column::Id.ne(id));
        }
        query.one(&*self.db).await?.map(Role::try_from).transpose()
    }

    async fn find_by_image_url(&self, url: &str, exclude_id: Option<i32>) -> Result<Option<Role>, DbErr> {
        let mut query = role::Entity::find().filter(role::Column::ImageUrl.eq(url));
        if let Some(id) = exclude_id {
            query = query.filter(role::Column::Id.ne(id));
        }
        query.one(&*self.db).await?.map(Role::try_from).transpose()
    }

    async fn list_with_images(&self) -> Result<Vec<Role>, DbErr> {
        let models = role::Entity::find()
            .filter(role::Column::ImageUrl.is_not_null())
            .order_by_asc(role::Column::Id)
            .all(&*self.db)
            .await?;
        to_domain(models)
    }
}
