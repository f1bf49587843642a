use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// 内容寻址存储中的一个物理文件
///
/// 每个内容摘要至多对应一个文件；`hash` 是SHA-256的小写十六进制表示。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    pub hash: String,
    pub file_name: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

/// Role记录上的图片指针
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePointer {
    pub hash: String,
    pub url: String,
}
