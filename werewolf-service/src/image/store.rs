use super::{DuplicatePolicy, ImageDigest, ImageStoreError, ImageUpload, UploadPolicy};
use chrono::Utc;
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};
use werewolf_domain::{ImagePointer, Role, StoredImage};
use werewolf_infra::database::{RoleRepository, StoredImageRepository};
use werewolf_infra::ImageStorage;

const NAME_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const NAME_SUFFIX_LEN: usize = 9;
const MAX_NAME_ATTEMPTS: usize = 8;

/// 图片存储配置
#[derive(Debug, Clone)]
pub struct ImageStoreConfig {
    /// 对外URL前缀，如 `/uploads/roles`
    pub url_prefix: String,
    pub duplicate_policy: DuplicatePolicy,
    pub upload_policy: UploadPolicy,
}

impl Default for ImageStoreConfig {
    fn default() -> Self {
        Self {
            url_prefix: "/uploads/roles".to_string(),
            duplicate_policy: DuplicatePolicy::default(),
            upload_policy: UploadPolicy::default(),
        }
    }
}

/// 已就绪、尚未被Role提交的图片
///
/// 在 [`ImageStore::commit`] 或 [`ImageStore::discard`] 之前，文件处于占用状态，
/// 不会被其他调用删除。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedImage {
    pub pointer: ImagePointer,
    pub file_name: String,
    /// 本次调用新写入的文件；为false时是复用已有文件
    pub fresh: bool,
}

/// `release_image` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// 文件已删除
    Deleted,
    /// 仍被其他Role引用，保留
    StillReferenced,
    /// 引用查询失败，保留
    Kept,
    /// 文件本就不存在
    Missing,
    /// URL不在本存储下
    Foreign,
}

/// 启动时重建索引的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReindexReport {
    /// 由Role记录写入的索引行
    pub seeded: usize,
    /// 由目录扫描写入的索引行
    pub indexed: usize,
    /// 无法读取而跳过的条目
    pub skipped: usize,
}

/// 内容寻址图片存储
///
/// 记录存储（Role表与摘要索引）和二进制存储都以trait注入。
pub struct ImageStore {
    roles: Arc<dyn RoleRepository>,
    index: Arc<dyn StoredImageRepository>,
    storage: Arc<dyn ImageStorage>,
    config: ImageStoreConfig,
    /// 已准备但尚未提交或撤销的文件 -> 占用次数
    pending: Mutex<HashMap<String, usize>>,
}

impl ImageStore {
    pub fn new(
        roles: Arc<dyn RoleRepository>,
        index: Arc<dyn StoredImageRepository>,
        storage: Arc<dyn ImageStorage>,
        config: ImageStoreConfig,
    ) -> Self {
        Self {
            roles,
            index,
            storage,
            config,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.config.upload_policy
    }

    /// 为尚未创建的Role准备图片
    pub async fn store_new_image(&self, upload: &ImageUpload) -> Result<PreparedImage, ImageStoreError> {
        self.prepare(upload, None).await
    }

    /// 为已有Role准备新图片；内容与当前图片相同且文件仍在时原样返回
    pub async fn replace_image(&self, upload: &ImageUpload, role: &Role) -> Result<PreparedImage, ImageStoreError> {
        self.prepare(upload, Some(role)).await
    }

    async fn prepare(&self, upload: &ImageUpload, owner: Option<&Role>) -> Result<PreparedImage, ImageStoreError> {
        let extension = self.config.upload_policy.check(upload)?;
        let digest = ImageDigest::of(&upload.bytes);

        if let Some(role) = owner {
            if let Some(unchanged) = self.current_image(role, &digest).await? {
                debug!(role_id = role.id, hash = %digest, "Role re-uploaded its current image");
                return Ok(unchanged);
            }
        }

        if self.config.duplicate_policy == DuplicatePolicy::Reject {
            if let Some(existing) = self
                .roles
                .find_by_image_hash(digest.as_str(), owner.map(|r| r.id))
                .await?
            {
                info!(hash = %digest, role_id = existing.id, "Rejected duplicate image");
                return Err(ImageStoreError::DuplicateImage {
                    role_id: existing.id,
                    role_name: existing.name,
                });
            }
        }

        if let Some(stored) = self.index.find_by_hash(digest.as_str()).await? {
            if self.storage.exists(&stored.file_name).await? {
                debug!(hash = %digest, file = %stored.file_name, "Reusing stored file");
                return Ok(self.prepared(digest, stored.file_name, false));
            }
            warn!(hash = %digest, file = %stored.file_name, "Index entry points to a missing file, dropping it");
            self.index.delete_by_hash(digest.as_str()).await?;
        }

        let file_name = self.allocate_name(&extension).await?;
        self.storage.write(&file_name, &upload.bytes).await?;

        let candidate = StoredImage {
            hash: digest.as_str().to_string(),
            file_name: file_name.clone(),
            size: upload.bytes.len() as i64,
            created_at: Utc::now(),
        };
        let winner = match self.index.insert_if_absent(&candidate).await {
            Ok(winner) => winner,
            Err(e) => {
                self.remove_quietly(&file_name).await;
                return Err(e.into());
            }
        };

        if winner.file_name != file_name {
            // 并发写入者先登记了同一摘要
            info!(hash = %digest, winner = %winner.file_name, file = %file_name, "Concurrent upload won, removing our copy");
            let prepared = self.prepared(digest, winner.file_name, false);
            self.remove_quietly(&file_name).await;
            return Ok(prepared);
        }

        info!(hash = %digest, file = %file_name, "Stored new image");
        Ok(self.prepared(digest, file_name, true))
    }

    /// Role当前图片与上传内容一致且文件仍存在
    async fn current_image(&self, role: &Role, digest: &ImageDigest) -> Result<Option<PreparedImage>, ImageStoreError> {
        let (Some(hash), Some(url)) = (role.image_hash.as_deref(), role.image_url.as_deref()) else {
            return Ok(None);
        };
        if digest != hash {
            return Ok(None);
        }
        let Some(file_name) = self.file_name_of(url) else {
            return Ok(None);
        };
        if !self.storage.exists(file_name).await? {
            return Ok(None);
        }
        self.hold(file_name);
        Ok(Some(PreparedImage {
            pointer: ImagePointer {
                hash: hash.to_string(),
                url: url.to_string(),
            },
            file_name: file_name.to_string(),
            fresh: false,
        }))
    }

    /// Role已提交，解除对文件的占用
    pub fn commit(&self, prepared: &PreparedImage) {
        self.unhold(&prepared.file_name);
    }

    /// 撤销一次新写入（Role未能提交时调用）；复用的文件不受影响
    pub async fn discard(&self, prepared: &PreparedImage) {
        self.unhold(&prepared.file_name);
        if !prepared.fresh {
            return;
        }

        // 提交前的窗口内，其他上传可能已经复用了这个文件
        if self.is_held(&prepared.file_name) {
            info!(file = %prepared.file_name, "Keeping file after failed commit, another upload is using it");
            return;
        }
        match self.roles.find_by_image_url(&prepared.pointer.url, None).await {
            Ok(None) => {}
            Ok(Some(role)) => {
                info!(file = %prepared.file_name, role_id = role.id, "Keeping file after failed commit, now in use");
                return;
            }
            Err(e) => {
                warn!(file = %prepared.file_name, error = %e, "Reference lookup failed, keeping file");
                return;
            }
        }

        if let Err(e) = self.index.delete_by_file_name(&prepared.file_name).await {
            warn!(file = %prepared.file_name, error = %e, "Failed to drop index entry, keeping file");
            return;
        }
        self.remove_quietly(&prepared.file_name).await;
    }

    /// Role被删除或改指其他图片后释放旧文件
    ///
    /// 只有在没有其他Role引用该URL时才删除；引用查询失败时保留文件。
    pub async fn release_image(&self, role_id: i32, image_url: &str) -> ReleaseOutcome {
        let Some(file_name) = self.file_name_of(image_url) else {
            warn!(url = %image_url, prefix = %self.config.url_prefix, "Not releasing a file outside the upload prefix");
            return ReleaseOutcome::Foreign;
        };

        if self.is_held(file_name) {
            info!(file = %file_name, "Keeping file claimed by a pending upload");
            return ReleaseOutcome::StillReferenced;
        }

        match self.roles.find_by_image_url(image_url, Some(role_id)).await {
            Ok(None) => {}
            Ok(Some(other)) => {
                info!(file = %file_name, role_id = other.id, "Keeping file still used by another role");
                return ReleaseOutcome::StillReferenced;
            }
            Err(e) => {
                warn!(file = %file_name, error = %e, "Reference lookup failed, keeping file");
                return ReleaseOutcome::Kept;
            }
        }

        if let Err(e) = self.index.delete_by_file_name(file_name).await {
            warn!(file = %file_name, error = %e, "Failed to drop index entry, keeping file");
            return ReleaseOutcome::Kept;
        }

        match self.storage.delete(file_name).await {
            Ok(true) => {
                info!(file = %file_name, "Deleted unreferenced image");
                ReleaseOutcome::Deleted
            }
            Ok(false) => ReleaseOutcome::Missing,
            Err(e) => {
                warn!(file = %file_name, error = %e, "Failed to delete image");
                ReleaseOutcome::Kept
            }
        }
    }

    /// 重建摘要索引：先由Role记录回填，再扫描未登记的文件
    pub async fn reindex(&self) -> Result<ReindexReport, ImageStoreError> {
        let mut report = ReindexReport::default();

        for role in self.roles.list_with_images().await? {
            let (Some(hash), Some(url)) = (role.image_hash, role.image_url) else {
                continue;
            };
            let Some(file_name) = self.file_name_of(&url) else {
                continue;
            };
            if self.index.find_by_hash(&hash).await?.is_some() {
                continue;
            }
            let size = match self.storage.size(file_name).await {
                Ok(size) => size,
                Err(e) => {
                    warn!(role_id = role.id, file = %file_name, error = %e, "Role points to an unreadable file");
                    report.skipped += 1;
                    continue;
                }
            };
            let image = StoredImage {
                hash,
                file_name: file_name.to_string(),
                size: size as i64,
                created_at: Utc::now(),
            };
            if self.index.insert_if_absent(&image).await?.file_name == image.file_name {
                report.seeded += 1;
            }
        }

        for file_name in self.storage.list().await? {
            if self.index.find_by_file_name(&file_name).await?.is_some() {
                continue;
            }
            let (digest, size) = match self.hash_file(&file_name).await {
                Ok(found) => found,
                Err(e) => {
                    warn!(file = %file_name, error = %e, "Skipping unreadable file");
                    report.skipped += 1;
                    continue;
                }
            };
            let image = StoredImage {
                hash: digest.into_string(),
                file_name: file_name.clone(),
                size: size as i64,
                created_at: Utc::now(),
            };
            let owner = self.index.insert_if_absent(&image).await?;
            if owner.file_name == file_name {
                report.indexed += 1;
            } else {
                debug!(file = %file_name, indexed = %owner.file_name, "File duplicates an indexed file");
            }
        }

        info!(
            seeded = report.seeded,
            indexed = report.indexed,
            skipped = report.skipped,
            "Image index rebuilt"
        );
        Ok(report)
    }

    async fn hash_file(&self, file_name: &str) -> anyhow::Result<(ImageDigest, u64)> {
        let size = self.storage.size(file_name).await?;
        let reader = self.storage.open(file_name).await?;
        let digest = ImageDigest::from_reader(reader).await?;
        Ok((digest, size))
    }

    /// 生成 `<毫秒时间戳>-<9位base36随机串>.<扩展名>`，与已有文件冲突时重试
    async fn allocate_name(&self, extension: &str) -> Result<String, ImageStoreError> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let candidate = generate_name(Utc::now().timestamp_millis(), extension);
            if !self.storage.exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(anyhow::anyhow!("could not allocate a unique file name").into())
    }

    fn prepared(&self, digest: ImageDigest, file_name: String, fresh: bool) -> PreparedImage {
        self.hold(&file_name);
        PreparedImage {
            pointer: ImagePointer {
                hash: digest.into_string(),
                url: self.url_of(&file_name),
            },
            file_name,
            fresh,
        }
    }

    fn hold(&self, file_name: &str) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        *pending.entry(file_name.to_string()).or_insert(0) += 1;
    }

    fn unhold(&self, file_name: &str) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(count) = pending.get_mut(file_name) {
            *count -= 1;
            if *count == 0 {
                pending.remove(file_name);
            }
        }
    }

    fn is_held(&self, file_name: &str) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(file_name)
    }

    pub fn url_of(&self, file_name: &str) -> String {
        format!("{}/{}", self.config.url_prefix.trim_end_matches('/'), file_name)
    }

    /// URL对应的文件名；不在本存储前缀下时返回None
    pub fn file_name_of<'a>(&self, url: &'a str) -> Option<&'a str> {
        let name = url
            .strip_prefix(self.config.url_prefix.trim_end_matches('/'))?
            .strip_prefix('/')?;
        if name.is_empty() || name.contains('/') {
            return None;
        }
        Some(name)
    }

    async fn remove_quietly(&self, file_name: &str) {
        if let Err(e) = self.storage.delete(file_name).await {
            warn!(file = %file_name, error = %e, "Failed to remove file");
        }
    }
}

fn generate_name(millis: i64, extension: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..NAME_SUFFIX_LEN)
        .map(|_| NAME_ALPHABET[rng.gen_range(0..NAME_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}.{}", millis, suffix, extension)
}
