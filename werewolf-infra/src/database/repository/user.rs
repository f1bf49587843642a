use crate::database::entities::user;
use werewolf_domain::User;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

/// UserRepository trait 定义用户的数据访问操作
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DbErr>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbErr>;
    async fn insert(&self, username: &str, email: &str, password_hash: &str) -> Result<User, DbErr>;
}

pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DbErr> {
        let model = user::Entity::find_by_id(id).one(&*self.db).await?;
        Ok(model.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbErr> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await?;
        Ok(model.map(User::from))
    }

    async fn insert(&self, username: &str, email: &str, password_hash: &str) -> Result<User, DbErr> {
        let active_model = user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = active_model.insert(&*self.db).await?;
        Ok(User::from(model))
    }
}
