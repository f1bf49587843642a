use std::collections::HashMap;

/// 文件类型验证器
///
/// 按声明的MIME类型做白名单检查。每个类型登记一组可接受的扩展名，
/// 第一个为该类型的默认扩展名。
#[derive(Debug, Clone, Default)]
pub struct FileTypeValidator {
    /// MIME类型 -> 扩展名（首个为默认）
    allowed_types: HashMap<String, Vec<String>>,
}

impl FileTypeValidator {
    /// 创建空验证器（拒绝所有类型）
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加允许的MIME类型及其扩展名
    pub fn allow_mime_type(mut self, mime_type: impl Into<String>, extensions: &[&str]) -> Self {
        self.allowed_types.insert(
            mime_type.into().to_ascii_lowercase(),
            extensions.iter().map(|e| e.to_ascii_lowercase()).collect(),
        );
        self
    }

    /// 角色卡图片：JPEG、PNG、WEBP
    pub fn allow_role_images(self) -> Self {
        self.allow_mime_type("image/jpeg", &["jpg", "jpeg"])
            .allow_mime_type("image/png", &["png"])
            .allow_mime_type("image/webp", &["webp"])
    }

    /// 验证文件类型
    pub fn validate(&self, mime_type: Option<&str>) -> bool {
        self.extension_for(mime_type).is_some()
    }

    /// MIME类型对应的默认扩展名；类型不被允许时返回None
    pub fn extension_for(&self, mime_type: Option<&str>) -> Option<&str> {
        self.extensions(mime_type)?.first().map(String::as_str)
    }

    /// 扩展名是否属于该MIME类型
    pub fn matches_extension(&self, mime_type: Option<&str>, extension: &str) -> bool {
        self.extensions(mime_type)
            .is_some_and(|exts| exts.iter().any(|e| e.eq_ignore_ascii_case(extension)))
    }

    fn extensions(&self, mime_type: Option<&str>) -> Option<&Vec<String>> {
        self.allowed_types.get(&normalize(mime_type?))
    }
}

/// 去掉参数部分并转小写，如 `image/PNG; q=1` -> `image/png`
fn normalize(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_validator() {
        let validator = FileTypeValidator::new().allow_role_images();

        assert!(validator.validate(Some("image/jpeg")));
        assert!(validator.validate(Some("image/png")));
        assert!(validator.validate(Some("IMAGE/WEBP")));
        assert!(validator.validate(Some("image/png; charset=binary")));
        assert!(!validator.validate(Some("image/gif")));
        assert!(!validator.validate(Some("application/pdf")));
        assert!(!validator.validate(None));

        assert_eq!(validator.extension_for(Some("image/jpeg")), Some("jpg"));
        assert_eq!(validator.extension_for(Some("image/svg+xml")), None);
    }

    #[test]
    fn test_extension_must_belong_to_type() {
        let validator = FileTypeValidator::new().allow_role_images();

        assert!(validator.matches_extension(Some("image/jpeg"), "jpeg"));
        assert!(validator.matches_extension(Some("image/jpeg"), "JPG"));
        assert!(validator.matches_extension(Some("image/png"), "png"));
        assert!(!validator.matches_extension(Some("image/png"), "html"));
        assert!(!validator.matches_extension(Some("image/png"), "jpg"));
        assert!(!validator.matches_extension(Some("text/html"), "html"));
        assert!(!validator.matches_extension(None, "png"));
    }

    #[test]
    fn test_empty_validator_rejects_everything() {
        let validator = FileTypeValidator::new();
        assert!(!validator.validate(Some("image/png")));
    }
}
