pub mod local;
pub mod file_validator;

pub use local::LocalImageStorage;
pub use file_validator::FileTypeValidator;

use async_trait::async_trait;
use tokio::io::AsyncRead;

/// 可读取的文件流
pub type FileStream = Box<dyn AsyncRead + Send + Unpin>;

/// 图片文件存储trait
///
/// 一个扁平目录，文件仅通过文件名寻址。
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// 原子写入：部分写入的文件不会以最终文件名出现；文件已存在时失败
    async fn write(&self, file_name: &str, content: &[u8]) -> anyhow::Result<()>;

    /// 打开文件流
    async fn open(&self, file_name: &str) -> anyhow::Result<FileStream>;

    /// 删除文件，返回文件是否存在
    async fn delete(&self, file_name: &str) -> anyhow::Result<bool>;

    /// 检查文件是否存在
    async fn exists(&self, file_name: &str) -> anyhow::Result<bool>;

    /// 获取文件大小
    async fn size(&self, file_name: &str) -> anyhow::Result<u64>;

    /// 列出目录中的普通文件（忽略隐藏文件）
    async fn list(&self) -> anyhow::Result<Vec<String>>;
}
