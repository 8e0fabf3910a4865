use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use libris_cache::CacheAside;
use libris_db::{Entity, Store};
use libris_kernel::{InitCtx, Migration, Module};
use serde_json::Value;

use super::{crud_fragment, handlers, EntityService};

/// What an entity adds on top of [`Entity`] to be served as a catalog module.
pub trait Resource: Entity {
    /// Field-level checks on a bound request body.
    fn validate(draft: &Self::Draft) -> Result<(), Vec<Value>>;

    /// Schema for this entity's tables.
    fn migrations() -> Vec<Migration>;

    /// JSON schema of a record as returned by reads.
    fn schema() -> Value;

    /// JSON schema of the request body for create and update.
    fn draft_schema() -> Value;
}

/// Kernel module serving one entity type.
pub struct CatalogModule<E: Resource> {
    service: Arc<EntityService<E>>,
}

impl<E: Resource> CatalogModule<E> {
    pub fn new(service: EntityService<E>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

#[async_trait]
impl<E: Resource> Module for CatalogModule<E> {
    fn name(&self) -> &'static str {
        E::COLLECTION
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            cache_ttl_secs = ctx.settings.cache.ttl_secs,
            "{} module initialized",
            E::COLLECTION
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        handlers::router(Arc::clone(&self.service))
    }

    fn openapi(&self) -> Option<Value> {
        Some(crud_fragment::<E>())
    }

    fn migrations(&self) -> Vec<Migration> {
        E::migrations()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "{} module started", E::COLLECTION);
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "{} module stopped", E::COLLECTION);
        Ok(())
    }
}

/// Create the module for `E` over the given store and cache.
pub fn create_module<E: Resource>(store: Arc<dyn Store<E>>, cache: CacheAside) -> Arc<dyn Module> {
    Arc::new(CatalogModule::new(EntityService::new(store, cache)))
}
