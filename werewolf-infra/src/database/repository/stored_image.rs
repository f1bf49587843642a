use crate::database::entities::stored_image;
use werewolf_domain::StoredImage;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use async_trait::async_trait;
use std::sync::Arc;

/// StoredImageRepository trait 定义摘要索引的数据访问操作
#[async_trait]
pub trait StoredImageRepository: Send + Sync {
    async fn find_by_hash(&self, hash: &str) -> Result<Option<StoredImage>, DbErr>;

    async fn find_by_file_name(&self, file_name: &str) -> Result<Option<StoredImage>, DbErr>;

    /// 摘要不存在时插入；返回当前拥有该摘要的记录（可能是并发写入方的）
    async fn insert_if_absent(&self, image: &StoredImage) -> Result<StoredImage, DbErr>;

    async fn delete_by_hash(&self, hash: &str) -> Result<(), DbErr>;

    async fn delete_by_file_name(&self, file_name: &str) -> Result<(), DbErr>;
}

pub struct SeaOrmStoredImageRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmStoredImageRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StoredImageRepository for SeaOrmStoredImageRepository {
    async fn find_by_hash(&self, hash: &str) -> Result<Option<StoredImage>, DbErr> {
        let model = stored_image::Entity::find_by_id(hash.to_string())
            .one(&*self.db)
            .await?;
        Ok(model.map(StoredImage::from))
    }

    async fn find_by_file_name(&self, file_name: &str) -> Result<Option<StoredImage>, DbErr> {
        let model = stored_image::Entity::find()
            .filter(stored_image::Column::FileName.eq(file_name))
            .one(&*self.db)
            .await?;
        Ok(model.map(StoredImage::from))
    }

    async fn insert_if_absent(&self, image: &StoredImage) -> Result<StoredImage, DbErr> {
        let active_model = stored_image::ActiveModel {
            hash: Set(image.hash.clone()),
            file_name: Set(image.file_name.clone()),
            size: Set(image.size),
            created_at: Set(image.created_at),
        };

        let inserted = stored_image::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(stored_image::Column::Hash)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&*self.db)
            .await;

        match inserted {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }

        self.find_by_hash(&image.hash)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("stored image {}", image.hash)))
    }

    async fn delete_by_hash(&self, hash: &str) -> Result<(), DbErr> {
        stored_image::Entity::delete_by_id(hash.to_string())
            .exec(&*self.db)
            .await?;
        Ok(())
    }

    async fn delete_by_file_name(&self, file_name: &str) -> Result<(), DbErr> {
        stored_image::Entity::delete_many()
            .filter(stored_image::Column::FileName.eq(file_name))
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}
