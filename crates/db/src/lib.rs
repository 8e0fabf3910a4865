//! Postgres connectivity for Libris plus the persistence seam every catalog
//! entity goes through.

mod connection;
mod error;
pub mod memory;
pub mod migrate;
mod store;

pub use connection::{connect, connect_options, delete_by_id, ping, sync_id_sequence};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::{Entity, Store};

pub use sqlx::PgPool;
