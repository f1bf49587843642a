pub mod database;
pub mod storage;
pub mod cache;
pub mod security;

pub use database::DatabaseManager;
pub use storage::{ImageStorage, LocalImageStorage, FileTypeValidator};
pub use cache::{Cache, MemoryCache};
pub use security::{SessionService, CacheSessionService};
