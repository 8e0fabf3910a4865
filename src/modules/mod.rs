//! Catalog entity modules.

pub mod authors;
pub mod books;
pub mod borrowings;
pub mod categories;
pub mod publishers;
pub mod reviews;
pub mod users;

use libris_cache::CacheAside;
use libris_db::PgPool;
use libris_kernel::ModuleRegistry;

/// Register every catalog module. Order follows foreign-key dependencies,
/// which is also the order migrations run in.
pub fn register_all(registry: &mut ModuleRegistry, pool: &PgPool, cache: &CacheAside) {
    registry.register(authors::create_module(pool.clone(), cache.clone()));
    registry.register(publishers::create_module(pool.clone(), cache.clone()));
    registry.register(categories::create_module(pool.clone(), cache.clone()));
    registry.register(users::create_module(pool.clone(), cache.clone()));
    registry.register(books::create_module(pool.clone(), cache.clone()));
    registry.register(reviews::create_module(pool.clone(), cache.clone()));
    registry.register(borrowings::create_module(pool.clone(), cache.clone()));
}
