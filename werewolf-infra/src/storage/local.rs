use super::{FileStream, ImageStorage};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// 本地文件存储实现
pub struct LocalImageStorage {
    base_path: PathBuf,
}

impl LocalImageStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// 创建存储目录（如果不存在）
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)
            .await
            .with_context(|| format!("Failed to create upload directory {}", self.base_path.display()))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// 构建完整文件路径，拒绝任何可能跳出存储目录的文件名
    fn build_path(&self, file_name: &str) -> Result<PathBuf> {
        if file_name.is_empty()
            || file_name.starts_with('.')
            || file_name.contains(['/', '\\'])
        {
            bail!("Invalid file name: {:?}", file_name);
        }
        Ok(self.base_path.join(file_name))
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn write(&self, file_name: &str, content: &[u8]) -> Result<()> {
        let full_path = self.build_path(file_name)?;
        if fs::try_exists(&full_path).await? {
            bail!("File already exists: {}", file_name);
        }

        fs::create_dir_all(&self.base_path).await?;

        // 先写入同目录下的隐藏临时文件，再rename到最终文件名
        let temp_path = self.base_path.join(format!(".{}.part", file_name));
        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(content).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp_path, &full_path).await?;
            Ok::<(), std::io::Error>(())
        }
        .await;

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!(file = %temp_path.display(), error = %cleanup, "Failed to remove partial upload");
                }
            }
            return Err(e).with_context(|| format!("Failed to write {}", file_name));
        }

        debug!(file = %full_path.display(), size = content.len(), "Image written");
        Ok(())
    }

    async fn open(&self, file_name: &str) -> Result<FileStream> {
        let full_path = self.build_path(file_name)?;
        let file = fs::File::open(&full_path)
            .await
            .with_context(|| format!("Failed to open {}", file_name))?;
        Ok(Box::new(file))
    }

    async fn delete(&self, file_name: &str) -> Result<bool> {
        let full_path = self.build_path(file_name)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to delete {}", file_name)),
        }
    }

    async fn exists(&self, file_name: &str) -> Result<bool> {
        let full_path = self.build_path(file_name)?;
        Ok(fs::try_exists(&full_path).await?)
    }

    async fn size(&self, file_name: &str) -> Result<u64> {
        let full_path = self.build_path(file_name)?;
        let metadata = fs::metadata(&full_path).await?;
        Ok(metadata.len())
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            // 单个条目无法读取时跳过
            match entry.file_type().await {
                Ok(file_type) if file_type.is_file() => names.push(name),
                Ok(_) => {}
                Err(e) => warn!(file = %name, error = %e, "Skipping unreadable directory entry"),
            }
        }
        names.sort();
        Ok(names)
    }
}
