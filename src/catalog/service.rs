use std::sync::Arc;

use libris_cache::{CacheAside, Fetched};
use libris_db::{Entity, Store, StoreError};

/// Cache-aside orchestration of one entity's store.
///
/// Reads go through the cache; writes go to the store and then drop the
/// record's key and the collection key. Projections of other entities that
/// embed this one are left to expire.
pub struct EntityService<E: Entity> {
    store: Arc<dyn Store<E>>,
    cache: CacheAside,
}

impl<E: Entity> EntityService<E> {
    pub fn new(store: Arc<dyn Store<E>>, cache: CacheAside) -> Self {
        Self { store, cache }
    }

    /// `books_all`
    pub fn collection_key() -> String {
        format!("{}_all", E::COLLECTION)
    }

    /// `book_7`
    pub fn record_key(id: i64) -> String {
        format!("{}_{}", E::NAME, id)
    }

    pub async fn list(&self) -> Result<Fetched<Vec<E>>, StoreError> {
        self.cache
            .fetch(&Self::collection_key(), || self.store.find_all())
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Fetched<E>, StoreError> {
        self.cache
            .fetch(&Self::record_key(id), || self.store.find_by_id(id))
            .await
    }

    pub async fn create(&self, draft: &E::Draft) -> Result<E, StoreError> {
        let record = self.store.create(draft).await?;
        self.invalidate(record.id()).await;
        tracing::info!(entity = E::NAME, id = record.id(), "created");
        Ok(record)
    }

    pub async fn update(&self, id: i64, draft: &E::Draft) -> Result<E, StoreError> {
        let record = self.store.update(id, draft).await?;
        self.invalidate(id).await;
        tracing::info!(entity = E::NAME, id, "updated");
        Ok(record)
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.store.delete(id).await?;
        self.invalidate(id).await;
        tracing::info!(entity = E::NAME, id, "deleted");
        Ok(())
    }

    async fn invalidate(&self, id: i64) {
        self.cache
            .invalidate(&[Self::record_key(id), Self::collection_key()])
            .await;
    }
}
