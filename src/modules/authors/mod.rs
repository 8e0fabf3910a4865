//! Authors and the books they wrote.

mod models;
mod store;

use std::sync::Arc;

use libris_cache::CacheAside;
use libris_db::PgPool;
use libris_kernel::{Migration, Module};
use serde_json::{json, Value};

use crate::catalog::{self, Resource, Violations};

pub use models::{Author, AuthorDraft, AuthorSummary};
pub use store::PgAuthorStore;

impl Resource for Author {
    fn validate(draft: &AuthorDraft) -> Result<(), Vec<Value>> {
        Violations::new().require(&draft.name, "name").finish()
    }

    fn migrations() -> Vec<Migration> {
        vec![Migration {
            id: "001_create_authors",
            up: r#"
                CREATE TABLE IF NOT EXISTS authors (
                    id    BIGSERIAL PRIMARY KEY,
                    name  TEXT NOT NULL,
                    bio   TEXT NOT NULL DEFAULT '',
                    email TEXT NOT NULL DEFAULT ''
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
                "bio": { "type": "string" },
                "email": { "type": "string" },
                "books": { "type": "array", "items": crate::modules::books::summary_schema() }
            },
            "required": ["id", "name", "bio", "email", "books"]
        })
    }

    fn draft_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "minLength": 1 },
                "bio": { "type": "string" },
                "email": { "type": "string" }
            },
            "required": ["name"]
        })
    }
}

pub fn create_module(pool: PgPool, cache: CacheAside) -> Arc<dyn Module> {
    catalog::create_module::<Author>(Arc::new(PgAuthorStore::new(pool)), cache)
}
