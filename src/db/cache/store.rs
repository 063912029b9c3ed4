use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use super::memory::MemoryStore;
use crate::error::AppError;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Discover(String),
    Search(String),
    Trending(String),
    TopRated(String),
    Details(String),
    WatchProviders(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Discover(query) => write!(f, "discover:{}", query),
            CacheKey::Search(query) => write!(f, "search:{}", query.to_lowercase()),
            CacheKey::Trending(page) => write!(f, "trending:{}", page),
            CacheKey::TopRated(page) => write!(f, "top_rated:{}", page),
            CacheKey::Details(id) => write!(f, "details:{}", id),
            CacheKey::WatchProviders(id) => write!(f, "providers:{}", id),
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

#[derive(Clone)]
enum Backend {
    Memory(MemoryStore),
    Redis {
        client: Client,
        write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
    },
}

/// TTL cache for serialized catalog responses.
///
/// Values are stored as JSON strings in either a process-local map or Redis.
#[derive(Clone)]
pub struct Cache {
    backend: Backend,
}

/// Handle for gracefully shutting down the Redis cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Initiates a graceful shutdown of the cache writer
    ///
    /// Sends a shutdown signal to the writer task, which flushes pending
    /// writes to Redis before exiting.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates a cache backed by process memory
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryStore::new()),
        }
    }

    /// Creates a Redis-backed cache with an async write background task
    ///
    /// Writes go through a channel so cache operations never block API responses.
    pub fn redis(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            backend: Backend::Redis {
                client: redis_client,
                write_tx,
            },
        };

        (cache, CacheWriterHandle { shutdown_tx })
    }

    /// Background task that processes cache write messages
    ///
    /// On shutdown signal, flushes all remaining messages before exiting.
    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    write_rx.close();
                    tracing::info!("Cache writer shutting down, flushing remaining writes");

                    while let Some(msg) = write_rx.recv().await {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }

                    tracing::info!("Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Retrieves a value from the cache by key
    ///
    /// Returns `None` on a miss or when the entry has expired.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let cached: Option<String> = match &self.backend {
            Backend::Memory(store) => store.get(&key.to_string()),
            Backend::Redis { client, .. } => {
                let mut conn = client.get_multiplexed_async_connection().await?;
                conn.get(key.to_string()).await?
            }
        };

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                tracing::debug!(key = %key, "Cache hit");
                Ok(Some(data))
            }
            None => {
                tracing::debug!(key = %key, "Cache miss");
                Ok(None)
            }
        }
    }

    /// Stores a value in the cache without blocking the caller
    ///
    /// The memory backend writes immediately; the Redis backend hands the
    /// write to the background writer.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        match &self.backend {
            Backend::Memory(store) => store.set(key.to_string(), json, ttl),
            Backend::Redis { write_tx, .. } => {
                let msg = CacheWriteMessage {
                    key: key.to_string(),
                    value: json,
                    ttl,
                };
                if let Err(e) = write_tx.send(msg) {
                    tracing::error!(error = %e, "Failed to send cache write message");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cache_key_display_search_lowercase() {
        let key = CacheKey::Search("movie:THE MATRIX:1".to_string());
        assert_eq!(key.to_string(), "search:movie:the matrix:1");
    }

    #[test]
    fn test_cache_key_display_namespaces() {
        assert_eq!(
            CacheKey::Discover("movie:27:*:popularity.desc:1:100".to_string()).to_string(),
            "discover:movie:27:*:popularity.desc:1:100"
        );
        assert_eq!(CacheKey::Trending("tv:2".to_string()).to_string(), "trending:tv:2");
        assert_eq!(CacheKey::TopRated("movie:1".to_string()).to_string(), "top_rated:movie:1");
        assert_eq!(CacheKey::Details("movie:27205".to_string()).to_string(), "details:movie:27205");
        assert_eq!(
            CacheKey::WatchProviders("movie:27205:IN".to_string()).to_string(),
            "providers:movie:27205:IN"
        );
    }

    #[tokio::test]
    async fn test_memory_cache_miss() {
        let cache = Cache::memory();
        let key = CacheKey::Search("nonexistent_key_12345".to_string());
        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    async fn test_memory_cache_round_trip() {
        let cache = Cache::memory();
        let key = CacheKey::Trending("movie:1".to_string());
        let value = vec!["item1".to_string(), "item2".to_string()];

        cache.set_in_background(&key, &value, 60);

        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, Some(value));
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_cache_expires() {
        let cache = Cache::memory();
        let key = CacheKey::Details("movie:1".to_string());
        cache.set_in_background(&key, &42u32, 5);

        tokio::time::advance(Duration::from_secs(6)).await;

        let retrieved: Option<u32> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    async fn test_memory_cache_type_mismatch_is_error() {
        let cache = Cache::memory();
        let key = CacheKey::Details("movie:2".to_string());
        cache.set_in_background(&key, &"not a number", 60);

        let result: AppResult<Option<u32>> = cache.get_from_cache(&key).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
