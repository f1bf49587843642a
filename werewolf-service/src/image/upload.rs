use super::ImageStoreError;
use bytes::Bytes;
use std::path::Path;
use werewolf_infra::FileTypeValidator;

/// 默认上传上限：5 MiB
pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// 一次图片上传
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Bytes,
    /// 客户端提供的原始文件名
    pub file_name: Option<String>,
    /// 声明的MIME类型
    pub content_type: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: impl Into<Bytes>, file_name: Option<String>, content_type: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name,
            content_type,
        }
    }
}

/// 上传边界：类型白名单与大小限制，在计算摘要之前执行
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    validator: FileTypeValidator,
    max_file_size: usize,
}

impl UploadPolicy {
    pub fn new(validator: FileTypeValidator, max_file_size: usize) -> Self {
        Self {
            validator,
            max_file_size,
        }
    }

    /// JPEG/PNG/WEBP，指定大小上限
    pub fn role_images(max_file_size: usize) -> Self {
        Self::new(FileTypeValidator::new().allow_role_images(), max_file_size)
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// 检查上传并返回落盘使用的扩展名（不含点）
    pub fn check(&self, upload: &ImageUpload) -> Result<String, ImageStoreError> {
        let content_type = upload.content_type.as_deref();
        let mime_extension = self
            .validator
            .extension_for(content_type)
            .ok_or_else(|| ImageStoreError::UnsupportedType(content_type.unwrap_or_default().to_string()))?;

        let size = upload.bytes.len();
        if size == 0 {
            return Err(ImageStoreError::EmptyFile);
        }
        if size > self.max_file_size {
            return Err(ImageStoreError::FileTooLarge {
                size,
                limit: self.max_file_size,
            });
        }

        // 原始扩展名必须属于声明的类型，否则用类型的默认扩展名
        Ok(upload
            .file_name
            .as_deref()
            .and_then(original_extension)
            .filter(|ext| self.validator.matches_extension(content_type, ext))
            .unwrap_or_else(|| mime_extension.to_string()))
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::role_images(DEFAULT_MAX_FILE_SIZE)
    }
}

/// 原始文件名的扩展名（小写）；只接受短的字母数字扩展名
fn original_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 5 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
