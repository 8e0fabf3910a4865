use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use tokio::sync::OnceCell;

use crate::{Cache, CacheError};

/// Bounds on a single connection attempt and on each command. An outage must
/// turn into a quick miss, well inside the request timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);
const RESPONSE_TIMEOUT: Duration = Duration::from_millis(500);
const CONNECT_RETRIES: usize = 1;

/// Redis backend sharing one multiplexed, auto-reconnecting connection.
///
/// The connection is established on first use. A failed attempt leaves the
/// cell empty, so the next operation tries again.
pub struct RedisCache {
    client: redis::Client,
    conn: OnceCell<ConnectionManager>,
}

impl RedisCache {
    /// Parse `url` without connecting.
    pub fn open(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(|source| CacheError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        Ok(Self {
            client,
            conn: OnceCell::new(),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        let conn = self
            .conn
            .get_or_try_init(|| {
                ConnectionManager::new_with_config(self.client.clone(), manager_config())
            })
            .await?;
        Ok(conn.clone())
    }
}

fn manager_config() -> ConnectionManagerConfig {
    ConnectionManagerConfig::new()
        .set_number_of_retries(CONNECT_RETRIES)
        .set_connection_timeout(CONNECT_TIMEOUT)
        .set_response_timeout(RESPONSE_TIMEOUT)
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        // SETEX rejects a zero expiry.
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, seconds).await?;
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.connection().await?;
        let _: () = conn.del(keys).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_malformed_url() {
        let err = RedisCache::open("not a url").err().unwrap();
        assert!(matches!(err, CacheError::InvalidUrl { .. }));
    }

    #[test]
    fn test_open_does_not_connect() {
        // Nothing listens on port 1; opening must still succeed.
        assert!(RedisCache::open("redis://127.0.0.1:1").is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_server_degrades_to_loader_quickly() {
        use crate::{CacheAside, DataSource};
        use std::sync::Arc;

        let cache = Arc::new(RedisCache::open("redis://127.0.0.1:1").unwrap());
        let aside = CacheAside::new(cache, Duration::from_secs(10));

        // Well under the default 15s request timeout, covering get, set and delete.
        let bound = Duration::from_secs(5);
        let fetched = tokio::time::timeout(bound, aside.fetch("book_1", || async {
            Ok::<_, String>(1u32)
        }))
        .await
        .expect("fetch outlived the bound while redis was down")
        .unwrap();
        assert_eq!(fetched.source, DataSource::Database);
        assert_eq!(fetched.value, 1);

        tokio::time::timeout(bound, aside.invalidate(&["book_1".to_string()]))
            .await
            .expect("invalidate outlived the bound while redis was down");
    }
}
