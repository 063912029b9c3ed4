pub mod cache;
pub mod favorites;
pub mod sqlite;

pub use cache::create_redis_client;
pub use cache::Cache;
pub use cache::CacheKey;
pub use cache::CacheWriterHandle;
pub use sqlite::{create_pool, run_migrations};
