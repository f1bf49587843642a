//! 角色卡图片的内容寻址存储
//!
//! 同一份字节至多落盘一次：上传先计算SHA-256摘要，再按摘要查重或复用，
//! 只有全新的内容才会写入新文件。文件的生命周期等于仍引用它的最后一个Role。

pub mod digest;
pub mod upload;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use digest::ImageDigest;
pub use upload::{ImageUpload, UploadPolicy};
pub use store::{ImageStore, ImageStoreConfig, PreparedImage, ReleaseOutcome, ReindexReport};

use sea_orm::DbErr;
use serde::Deserialize;
use thiserror::Error;

/// 图片存储错误
#[derive(Error, Debug)]
pub enum ImageStoreError {
    /// 内容已被其他Role使用
    #[error("This image is already used by the role \"{role_name}\"")]
    DuplicateImage { role_id: i32, role_name: String },

    #[error("Only JPG, PNG, WEBP allowed")]
    UnsupportedType(String),

    #[error("File too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: usize, limit: usize },

    #[error("Empty file")]
    EmptyFile,

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Repository(#[from] DbErr),
}

/// 相同内容被第二个Role上传时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// 拒绝并报告占用该图片的Role
    #[default]
    Reject,
    /// 两个Role指向同一个文件
    Share,
}
