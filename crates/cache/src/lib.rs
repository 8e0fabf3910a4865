//! Cache adapters for Libris and the cache-aside read path built on them.
//!
//! Values are stored as JSON text. A [`Cache`] backend only moves strings;
//! [`CacheAside`] owns serialization, the TTL, and the rule that cache
//! failures degrade to the store instead of failing a request.

mod aside;
mod error;
mod memory;
mod redis_store;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use libris_kernel::settings::{CacheBackend, CacheSettings};

pub use aside::{CacheAside, DataSource, Fetched};
pub use error::CacheError;
pub use memory::MemoryCache;
pub use redis_store::RedisCache;

/// Key/value cache with per-entry expiration.
#[async_trait]
pub trait Cache: Send + Sync {
    /// `Ok(None)` is a miss.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Removing absent keys is not an error.
    async fn delete(&self, keys: &[String]) -> Result<(), CacheError>;
}

/// Build the configured backend.
///
/// Redis connects lazily, so an unreachable server does not stop startup; it
/// only turns every lookup into a logged miss until it comes back.
pub fn from_settings(settings: &CacheSettings) -> anyhow::Result<Arc<dyn Cache>> {
    match settings.backend {
        CacheBackend::Redis => {
            let cache = RedisCache::open(&settings.url)?;
            tracing::info!(target: "libris-cache", url = %settings.url, "using redis cache");
            Ok(Arc::new(cache))
        }
        CacheBackend::Memory => {
            tracing::info!(
                target: "libris-cache",
                capacity = settings.memory_capacity,
                "using in-process cache"
            );
            Ok(Arc::new(MemoryCache::new(settings.memory_capacity)))
        }
    }
}
