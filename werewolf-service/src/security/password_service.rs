use async_trait::async_trait;
use bcrypt::{hash, verify, DEFAULT_COST};

/// 密码服务trait
#[async_trait]
pub trait PasswordService: Send + Sync {
    /// 加密密码
    async fn hash(&self, password: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// 验证密码
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}

/// 基于bcrypt的密码服务
///
/// bcrypt是CPU密集型计算，放到阻塞线程池中执行。
pub struct DefaultPasswordService {
    bcrypt_cost: u32,
}

impl DefaultPasswordService {
    pub fn new() -> Self {
        Self {
            bcrypt_cost: DEFAULT_COST,
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}

impl Default for DefaultPasswordService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordService for DefaultPasswordService {
    async fn hash(&self, password: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || hash(password, cost))
            .await?
            .map_err(|e| format!("Bcrypt hash error: {}", e).into())
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || verify(password, &hash))
            .await?
            .map_err(|e| format!("Bcrypt verify error: {}", e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bcrypt_round_trip() {
        let service = DefaultPasswordService::new().with_bcrypt_cost(4);
        let hashed = service.hash("full-moon").await.unwrap();

        assert!(hashed.starts_with("$2"));
        assert!(service.verify("full-moon", &hashed).await.unwrap());
        assert!(!service.verify("new-moon", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_is_an_error() {
        let service = DefaultPasswordService::new();
        assert!(service.verify("anything", "not-a-bcrypt-hash").await.is_err());
    }
}
