//! Application bootstrap: wire stores, cache and modules, then serve.

use anyhow::Context;
use libris_cache::{CacheAside, MemoryCache};
use libris_db::PgPool;
use libris_kernel::{
    settings::{CacheSettings, Settings},
    InitCtx, ModuleRegistry,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use crate::modules;

/// Cache-aside access over the configured backend.
pub fn cache_aside(settings: &CacheSettings) -> anyhow::Result<CacheAside> {
    let cache = libris_cache::from_settings(settings)?;
    Ok(CacheAside::new(cache, settings.ttl()))
}

/// Registry holding every catalog module, in foreign-key order.
pub fn build_registry(pool: &PgPool, cache: &CacheAside) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, pool, cache);
    registry
}

/// Apply pending migrations and return how many ran.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let pool = libris_db::connect(&settings.database).await?;
    let cache = CacheAside::new(
        Arc::new(MemoryCache::new(settings.cache.memory_capacity)),
        settings.cache.ttl(),
    );
    let registry = build_registry(&pool, &cache);

    let applied = libris_db::migrate::run(&pool, &registry.collect_migrations()).await?;
    pool.close().await;
    Ok(applied)
}

/// `METHOD path` of every mounted endpoint. Connects to nothing.
pub fn routes(settings: &Settings) -> anyhow::Result<Vec<String>> {
    let pool = PgPoolOptions::new()
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_lazy_with(libris_db::connect_options(&settings.database)?);
    let cache = CacheAside::new(
        Arc::new(MemoryCache::new(settings.cache.memory_capacity)),
        settings.cache.ttl(),
    );
    let registry = build_registry(&pool, &cache);

    let document = libris_http::router::openapi_document(&registry, &settings.server);
    Ok(libris_http::router::list_operations(&document))
}

/// Migrate, bring the modules up and serve until Ctrl-C.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        cache_backend = ?settings.cache.backend,
        cache_ttl_secs = settings.cache.ttl_secs,
        "libris bootstrap starting"
    );

    let pool = libris_db::connect(&settings.database).await?;
    libris_db::ping(&pool)
        .await
        .with_context(|| "postgres did not answer")?;
    let cache = cache_aside(&settings.cache)?;
    let registry = build_registry(&pool, &cache);

    let applied = libris_db::migrate::run(&pool, &registry.collect_migrations()).await?;
    tracing::info!(applied, "schema up to date");

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = libris_http::start_server(&registry, &settings).await;

    registry.stop_modules().await?;
    pool.close().await;
    served
}
