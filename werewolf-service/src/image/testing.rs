//! 内存中的记录存储与可注入故障的二进制存储

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::DbErr;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::Mutex;
use werewolf_domain::{ImagePointer, Role, RoleInput, StoredImage, Team};
use werewolf_infra::database::{RoleRepository, StoredImageRepository};
use werewolf_infra::storage::FileStream;
use werewolf_infra::{ImageStorage, LocalImageStorage};

fn injected() -> DbErr {
    DbErr::Custom("injected failure".to_string())
}

#[derive(Default)]
pub struct FakeRoleRepository {
    roles: Mutex<Vec<Role>>,
    next_id: AtomicI32,
    fail_lookups: AtomicBool,
    fail_writes: AtomicBool,
}

impl FakeRoleRepository {
    /// 直接放入一条Role（绕过服务层）
    pub fn add(&self, name: &str, image: Option<&ImagePointer>) -> Role {
        let role = Role {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: name.to_string(),
            description: None,
            team: Team::Villager,
            score: 0,
            image_url: image.map(|p| p.url.clone()),
            image_hash: image.map(|p| p.hash.clone()),
            is_official: false,
            created_by: None,
            created_at: Utc::now(),
        };
        self.roles.lock().unwrap().push(role.clone());
        role
    }

    pub fn remove(&self, id: i32) {
        self.roles.lock().unwrap().retain(|r| r.id != id);
    }

    pub fn get(&self, id: i32) -> Option<Role> {
        self.roles.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }

    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_lookup(&self) -> Result<(), DbErr> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(injected());
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), DbErr> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected());
        }
        Ok(())
    }

    fn find_where(&self, exclude_id: Option<i32>, pred: impl Fn(&Role) -> bool) -> Result<Option<Role>, DbErr> {
        self.check_lookup()?;
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| Some(r.id) != exclude_id && pred(r))
            .cloned())
    }
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn list(&self) -> Result<Vec<Role>, DbErr> {
        let mut roles = self.roles.lock().unwrap().clone();
        roles.reverse();
        Ok(roles)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Role>, DbErr> {
        Ok(self.get(id))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Role>, DbErr> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn insert(
        &self,
        input: &RoleInput,
        image: Option<&ImagePointer>,
        created_by: Option<i32>,
    ) -> Result<Role, DbErr> {
        self.check_write()?;
        let mut role = self.add(&input.name, image);
        role.description = input.description.clone();
        role.team = input.team;
        role.score = input.score;
        role.created_by = created_by;
        self.remove(role.id);
        self.roles.lock().unwrap().push(role.clone());
        Ok(role)
    }

    async fn update(
        &self,
        id: i32,
        input: &RoleInput,
        image: Option<&ImagePointer>,
    ) -> Result<Option<Role>, DbErr> {
        self.check_write()?;
        let mut roles = self.roles.lock().unwrap();
        let Some(role) = roles.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        role.name = input.name.clone();
        role.description = input.description.clone();
        role.team = input.team;
        role.score = input.score;
        if let Some(image) = image {
            role.image_hash = Some(image.hash.clone());
            role.image_url = Some(image.url.clone());
        }
        Ok(Some(role.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        self.check_write()?;
        let existed = self.get(id).is_some();
        self.remove(id);
        Ok(existed)
    }

    async fn find_by_image_hash(&self, hash: &str, exclude_id: Option<i32>) -> Result<Option<Role>, DbErr> {
        self.find_where(exclude_id, |r| r.image_hash.as_deref() == Some(hash))
    }

    async fn find_by_image_url(&self, url: &str, exclude_id: Option<i32>) -> Result<Option<Role>, DbErr> {
        self.find_where(exclude_id, |r| r.image_url.as_deref() == Some(url))
    }

    async fn list_with_images(&self) -> Result<Vec<Role>, DbErr> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.image_url.is_some())
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct FakeStoredImageRepository {
    rows: Mutex<HashMap<String, StoredImage>>,
    /// 下一次插入前由"并发写入者"抢先登记的记录
    racer: Mutex<Option<StoredImage>>,
    fail_inserts: AtomicBool,
}

impl FakeStoredImageRepository {
    pub fn race_with(&self, image: StoredImage) {
        *self.racer.lock().unwrap() = Some(image);
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl StoredImageRepository for FakeStoredImageRepository {
    async fn find_by_hash(&self, hash: &str) -> Result<Option<StoredImage>, DbErr> {
        Ok(self.rows.lock().unwrap().get(hash).cloned())
    }

    async fn find_by_file_name(&self, file_name: &str) -> Result<Option<StoredImage>, DbErr> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|i| i.file_name == file_name)
            .cloned())
    }

    async fn insert_if_absent(&self, image: &StoredImage) -> Result<StoredImage, DbErr> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(injected());
        }
        let mut rows = self.rows.lock().unwrap();
        if let Some(racer) = self.racer.lock().unwrap().take() {
            rows.entry(racer.hash.clone()).or_insert(racer);
        }
        Ok(rows
            .entry(image.hash.clone())
            .or_insert_with(|| image.clone())
            .clone())
    }

    async fn delete_by_hash(&self, hash: &str) -> Result<(), DbErr> {
        self.rows.lock().unwrap().remove(hash);
        Ok(())
    }

    async fn delete_by_file_name(&self, file_name: &str) -> Result<(), DbErr> {
        self.rows.lock().unwrap().retain(|_, i| i.file_name != file_name);
        Ok(())
    }
}

/// 包装本地存储，可按需注入写入或读取失败
pub struct FlakyStorage {
    inner: LocalImageStorage,
    fail_writes: AtomicBool,
    unreadable: Mutex<HashSet<String>>,
    writes: AtomicUsize,
}

impl FlakyStorage {
    pub fn new(inner: LocalImageStorage) -> Self {
        Self {
            inner,
            fail_writes: AtomicBool::new(false),
            unreadable: Mutex::new(HashSet::new()),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_open(&self, file_name: &str) {
        self.unreadable.lock().unwrap().insert(file_name.to_string());
    }

    /// 成功写入的次数
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn files(&self) -> Vec<String> {
        self.inner.list().await.unwrap()
    }
}

#[async_trait]
impl ImageStorage for FlakyStorage {
    async fn write(&self, file_name: &str, content: &[u8]) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("disk full");
        }
        self.inner.write(file_name, content).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn open(&self, file_name: &str) -> anyhow::Result<FileStream> {
        if self.unreadable.lock().unwrap().contains(file_name) {
            anyhow::bail!("permission denied: {}", file_name);
        }
        self.inner.open(file_name).await
    }

    async fn delete(&self, file_name: &str) -> anyhow::Result<bool> {
        self.inner.delete(file_name).await
    }

    async fn exists(&self, file_name: &str) -> anyhow::Result<bool> {
        self.inner.exists(file_name).await
    }

    async fn size(&self, file_name: &str) -> anyhow::Result<u64> {
        self.inner.size(file_name).await
    }

    async fn list(&self) -> anyhow::Result<Vec<String>> {
        self.inner.list().await
    }
}
