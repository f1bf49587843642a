use thiserror::Error;
use werewolf_service::ImageStoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Image index error: {0}")]
    ImageStore(#[from] ImageStoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Internal(err)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
