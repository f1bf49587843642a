use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use moka::Expiry;
use std::time::{Duration, Instant};

/// Cache trait 定义缓存操作
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;
    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    async fn delete(&self, key: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Option<Duration>,
}

/// 条目级过期：取条目TTL与 `max_ttl` 中较短者，覆盖写入时重新计时
struct EntryExpiry {
    max_ttl: Duration,
}

impl EntryExpiry {
    fn ttl_of(&self, entry: &Entry) -> Option<Duration> {
        Some(entry.ttl.map_or(self.max_ttl, |ttl| ttl.min(self.max_ttl)))
    }
}

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        self.ttl_of(value)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        self.ttl_of(value)
    }
}

/// MemoryCache 使用moka实现的进程内缓存
///
/// `max_ttl` 是所有条目的存活上限。
pub struct MemoryCache {
    inner: MokaCache<String, Entry>,
}

impl MemoryCache {
    pub fn new(max_capacity: u64, max_ttl: u64) -> Self {
        let inner = MokaCache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryExpiry {
                max_ttl: Duration::from_secs(max_ttl),
            })
            .build();
        Self { inner }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.inner.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let entry = Entry {
            value: value.to_string(),
            ttl: ttl.map(Duration::from_secs),
        };
        self.inner.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.inner.invalidate(key).await;
        Ok(())
    }
}
