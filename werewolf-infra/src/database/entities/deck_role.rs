use sea_orm::entity::prelude::*;

/// deck_roles表
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "deck_roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub deck_id: i32,
    pub role_id: i32,
    pub quantity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
