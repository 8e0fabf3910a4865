use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::StoreError;

/// A catalog record type.
///
/// Records are what reads return, relations preloaded. They must round-trip
/// through JSON because the cache stores them serialized. `Draft` is the
/// writable subset a client sends on create and full-replace update.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Draft: DeserializeOwned + Clone + Send + Sync + 'static;

    /// Plural name, e.g. `books`. Used for routes and the collection cache key.
    const COLLECTION: &'static str;
    /// Singular name, e.g. `book`. Used for per-record cache keys.
    const NAME: &'static str;
    /// Capitalized name for client-facing messages, e.g. `Book`.
    const LABEL: &'static str;

    fn id(&self) -> i64;
}

/// Persistence operations for one entity type.
///
/// Every read returns records with their relations preloaded, and every write
/// returns the record as a subsequent read would see it.
#[async_trait]
pub trait Store<E: Entity>: Send + Sync {
    async fn find_all(&self) -> Result<Vec<E>, StoreError>;

    /// Fails with [`StoreError::NotFound`] for unknown ids.
    async fn find_by_id(&self, id: i64) -> Result<E, StoreError>;

    async fn create(&self, draft: &E::Draft) -> Result<E, StoreError>;

    /// Full replace of the record with `id`, inserting it when absent.
    async fn update(&self, id: i64, draft: &E::Draft) -> Result<E, StoreError>;

    /// Fails with [`StoreError::NotFound`] when nothing was deleted.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}
