//! Book categories. A category's books are linked through `book_categories`,
//! which the books module owns.

mod models;
mod store;

use std::sync::Arc;

use libris_cache::CacheAside;
use libris_db::PgPool;
use libris_kernel::{Migration, Module};
use serde_json::{json, Value};

use crate::catalog::{self, Resource, Violations};

pub use models::{Category, CategoryDraft, CategorySummary};
pub use store::PgCategoryStore;

impl Resource for Category {
    fn validate(draft: &CategoryDraft) -> Result<(), Vec<Value>> {
        Violations::new().require(&draft.name, "name").finish()
    }

    fn migrations() -> Vec<Migration> {
        vec![Migration {
            id: "001_create_categories",
            up: r#"
                CREATE TABLE IF NOT EXISTS categories (
                    id   BIGSERIAL PRIMARY KEY,
                    name TEXT NOT NULL
                );
            "#,
        }]
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": { "type": "integer", "format": "int64" },
                "name": { "type": "string" },
                "books": { "type": "array", "items": crate::modules::books::summary_schema() }
            },
            "required": ["id", "name", "books"]
        })
    }

    fn draft_schema() -> Value {
        json!({
            "type": "object",
            "properties": { "name": { "type": "string", "minLength": 1 } },
            "required": ["name"]
        })
    }
}

pub fn create_module(pool: PgPool, cache: CacheAside) -> Arc<dyn Module> {
    catalog::create_module::<Category>(Arc::new(PgCategoryStore::new(pool)), cache)
}
