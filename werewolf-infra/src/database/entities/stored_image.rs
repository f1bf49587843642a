use sea_orm::entity::prelude::*;
use werewolf_domain::StoredImage;

/// stored_images表：内容摘要到文件名的持久索引
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "stored_images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub hash: String,
    #[sea_orm(unique)]
    pub file_name: String,
    pub size: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for StoredImage {
    fn from(model: Model) -> Self {
        StoredImage {
            hash: model.hash,
            file_name: model.file_name,
            size: model.size,
            created_at: model.created_at,
        }
    }
}
