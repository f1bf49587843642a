use sea_orm::entity::prelude::*;
use werewolf_domain::{Role, Team};

/// roles表
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub team: String,
    pub score: i32,
    #[sea_orm(nullable)]
    pub image_url: Option<String>,
    #[sea_orm(nullable)]
    pub image_hash: Option<String>,
    pub is_official: bool,
    #[sea_orm(nullable)]
    pub created_by: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Role {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let team: Team = model.team.parse()
            .map_err(|e: String| DbErr::Type(format!("role {}: {}", model.id, e)))?;

        Ok(Role {
            id: model.id,
            name: model.name,
            description: model.description,
            team,
            score: model.score,
            image_url: model.image_url,
            image_hash: model.image_hash,
            is_official: model.is_official,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}
