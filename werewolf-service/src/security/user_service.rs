use super::PasswordService;
use crate::error::ServiceError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use validator::Validate;
use werewolf_domain::{LoginRequest, SignupRequest, User};
use werewolf_infra::database::UserRepository;

/// 用户服务trait：注册、登录与查询
#[async_trait]
pub trait UserService: Send + Sync {
    async fn signup(&self, request: SignupRequest) -> Result<User, ServiceError>;

    /// 邮箱与密码不匹配时返回 `Unauthorized`
    async fn login(&self, request: LoginRequest) -> Result<User, ServiceError>;

    async fn get(&self, id: i32) -> Result<User, ServiceError>;
}

pub struct DefaultUserService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl DefaultUserService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }
}

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[async_trait]
impl UserService for DefaultUserService {
    async fn signup(&self, request: SignupRequest) -> Result<User, ServiceError> {
        if !request.is_complete() {
            return Err(ServiceError::Validation("All fields required".to_string()));
        }
        request.validate()?;

        let email = request.email.trim();
        if self.users.find_by_email(email).await?.is_some() {
            return Err(ServiceError::Conflict("Email already registered".to_string()));
        }

        let password_hash = self
            .passwords
            .hash(&request.password)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let user = self
            .users
            .insert(request.username.trim(), email, &password_hash)
            .await?;

        info!("Registered user {} ({})", user.id, user.username);
        Ok(user)
    }

    async fn login(&self, request: LoginRequest) -> Result<User, ServiceError> {
        let Some(user) = self.users.find_by_email(request.email.trim()).await? else {
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let valid = self
            .passwords
            .verify(&request.password, &user.password_hash)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        if !valid {
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
        Ok(user)
    }

    async fn get(&self, id: i32) -> Result<User, ServiceError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::DefaultPasswordService;
    use sea_orm::Database;
    use werewolf_infra::database::{DatabaseManager, SeaOrmUserRepository};
    use werewolf_migration::{Migrator, MigratorTrait};

    async fn service() -> DefaultUserService {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let manager = DatabaseManager::from_connection(db);
        DefaultUserService::new(
            Arc::new(SeaOrmUserRepository::new(manager.primary_db())),
            Arc::new(DefaultPasswordService::new().with_bcrypt_cost(4)),
        )
    }

    fn signup(username: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let service = service().await;

        let user = service.signup(signup("moderator", "mod@example.com", "howl")).await.unwrap();
        assert_ne!(user.password_hash, "howl");

        let logged_in = service
            .login(LoginRequest { email: "mod@example.com".to_string(), password: "howl".to_string() })
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);
        assert_eq!(service.get(user.id).await.unwrap().username, "moderator");
    }

    #[tokio::test]
    async fn test_signup_errors() {
        let service = service().await;

        let err = service.signup(signup("", "a@example.com", "pw")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "All fields required"));

        service.signup(signup("first", "taken@example.com", "pw")).await.unwrap();
        let err = service.signup(signup("second", "taken@example.com", "pw")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "Email already registered"));
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let service = service().await;
        service.signup(signup("seer", "seer@example.com", "right")).await.unwrap();

        let wrong = LoginRequest { email: "seer@example.com".to_string(), password: "wrong".to_string() };
        assert!(matches!(service.login(wrong).await, Err(ServiceError::Unauthorized(_))));

        let unknown = LoginRequest { email: "nobody@example.com".to_string(), password: "right".to_string() };
        assert!(matches!(service.login(unknown).await, Err(ServiceError::Unauthorized(_))));
    }
}
