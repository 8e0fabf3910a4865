//! Generic catalog plumbing: everything every entity shares.
//!
//! An entity module supplies its record/draft types, a [`Store`] and a
//! [`Resource`] impl; this module turns that into cache-aside reads, write
//! invalidation, HTTP handlers, OpenAPI paths and a kernel [`Module`].
//!
//! [`Store`]: libris_db::Store
//! [`Module`]: libris_kernel::Module

mod errors;
mod handlers;
mod module;
mod openapi;
pub mod pagination;
mod service;
mod validate;

pub use errors::store_error;
pub use handlers::router;
pub use module::{create_module, CatalogModule, Resource};
pub use openapi::crud_fragment;
pub use pagination::{Page, PageParams, PageRequest};
pub use service::EntityService;
pub use validate::Violations;
