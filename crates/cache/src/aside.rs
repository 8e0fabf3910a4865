use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use crate::Cache;

/// Where a read was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Cache,
    Database,
}

impl DataSource {
    pub fn as_str(self) -> &'static str {
        match self {
            DataSource::Cache => "cache",
            DataSource::Database => "database",
        }
    }
}

/// A value together with the tier that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub source: DataSource,
}

impl<T> Fetched<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            value: f(self.value),
            source: self.source,
        }
    }
}

/// Cache-aside access over any [`Cache`] backend.
///
/// Cache problems never surface as errors here: an unreachable backend, a
/// failed write, or an entry that no longer decodes is logged and treated as
/// a miss.
#[derive(Clone)]
pub struct CacheAside {
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl CacheAside {
    pub fn new(cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Serve `key` from the cache, or run `load` and cache what it returns.
    ///
    /// Errors from `load` are returned as-is and nothing is cached.
    pub async fn fetch<T, E, F, Fut>(&self, key: &str, load: F) -> Result<Fetched<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.lookup(key).await {
            tracing::debug!(target: "libris-cache", key, "cache hit");
            return Ok(Fetched {
                value,
                source: DataSource::Cache,
            });
        }

        tracing::debug!(target: "libris-cache", key, "cache miss");
        let value = load().await?;
        self.store(key, &value).await;

        Ok(Fetched {
            value,
            source: DataSource::Database,
        })
    }

    /// Decode the entry under `key`, if there is a usable one.
    pub async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.cache.get(key).await {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(target: "libris-cache", key, error = %err, "cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(target: "libris-cache", key, error = %err, "discarding undecodable cache entry");
                None
            }
        }
    }

    /// Write `value` under `key` with the configured TTL.
    pub async fn store<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(target: "libris-cache", key, error = %err, "failed to encode cache entry");
                return;
            }
        };

        if let Err(err) = self.cache.set(key, payload, self.ttl).await {
            tracing::warn!(target: "libris-cache", key, error = %err, "cache write failed");
        }
    }

    pub async fn invalidate(&self, keys: &[String]) {
        if let Err(err) = self.cache.delete(keys).await {
            tracing::warn!(target: "libris-cache", ?keys, error = %err, "cache invalidation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CacheError, MemoryCache};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend whose every operation fails, as if Redis were down.
    struct FailingCache;

    #[async_trait]
    impl Cache for FailingCache {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(serde_json::from_str::<()>("down").unwrap_err().into())
        }

        async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
            Err(serde_json::from_str::<()>("down").unwrap_err().into())
        }

        async fn delete(&self, _keys: &[String]) -> Result<(), CacheError> {
            Err(serde_json::from_str::<()>("down").unwrap_err().into())
        }
    }

    fn memory_aside() -> (Arc<MemoryCache>, CacheAside) {
        let cache = Arc::new(MemoryCache::new(64));
        let aside = CacheAside::new(cache.clone(), Duration::from_secs(60));
        (cache, aside)
    }

    async fn load_titles(calls: &AtomicUsize) -> Result<Vec<String>, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec!["Dune".to_string(), "Emma".to_string()])
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let (_, aside) = memory_aside();
        let calls = AtomicUsize::new(0);

        let first = aside.fetch("books_all", || load_titles(&calls)).await.unwrap();
        assert_eq!(first.source, DataSource::Database);

        let second = aside.fetch("books_all", || load_titles(&calls)).await.unwrap();
        assert_eq!(second.source, DataSource::Cache);
        assert_eq!(second.value, first.value);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_undecodable_entry_falls_through_and_is_replaced() {
        let (cache, aside) = memory_aside();
        cache
            .set("books_all", "{not json".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        let calls = AtomicUsize::new(0);

        let fetched = aside.fetch("books_all", || load_titles(&calls)).await.unwrap();
        assert_eq!(fetched.source, DataSource::Database);

        let again = aside.fetch("books_all", || load_titles(&calls)).await.unwrap();
        assert_eq!(again.source, DataSource::Cache);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failing_backend_degrades_to_loader() {
        let aside = CacheAside::new(Arc::new(FailingCache), Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let fetched = aside.fetch("books_all", || load_titles(&calls)).await.unwrap();
            assert_eq!(fetched.source, DataSource::Database);
        }
        aside.invalidate(&["books_all".to_string()]).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_loader_error_is_returned_and_not_cached() {
        let (cache, aside) = memory_aside();

        let result: Result<Fetched<Vec<String>>, String> = aside
            .fetch("book_9", || async { Err("record not found".to_string()) })
            .await;

        assert_eq!(result.unwrap_err(), "record not found");
        assert_eq!(cache.get("book_9").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let (_, aside) = memory_aside();
        let calls = AtomicUsize::new(0);

        aside.fetch("books_all", || load_titles(&calls)).await.unwrap();
        aside.invalidate(&["books_all".to_string()]).await;
        let fetched = aside.fetch("books_all", || load_titles(&calls)).await.unwrap();

        assert_eq!(fetched.source, DataSource::Database);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
