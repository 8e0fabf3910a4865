//! Publishers and the books on their list.

mod models;
mod store;

use std::sync::Arc;

use libris_cache::CacheAside;
use libris_db::PgPool;
use libris_kernel::{Migration, Module};
use serde_json::{json, Value};

use crate::catalog::{self, Resource, Violations};

pub use models::{Publisher, PublisherDraft, PublisherSummary};
pub use store::PgPublisherStore;

impl Resource for Publisher {
    fn validate(draft: &PublisherDraft) -> Result<(), Vec<Value>> {
        Violations::new().require(&draft.name, "name").finish()
    }

    fn migrations() -> Vec<Migration> {
        vec![Migration {
            id: "001_create_publishers",
            up: r#"
                CREATE TABLE IF NOT EXISTS publishers (
                    id    BIGSERIAL PRIMARY KEY,
                    name  TEXT NOT NULL,
                    address   TEXT NOT NULL DEFAULT '',
                    phone TEXT NOT NULL DEFAULT ''
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
                "address": { "type": "string" },
                "phone": { "type": "string" },
                "books": { "type": "array", "items": crate::modules::books::summary_schema() }
            },
            "required": ["id", "name", "address", "phone", "books"]
        })
    }

    fn draft_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "minLength": 1 },
                "address": { "type": "string" },
                "phone": { "type": "string" }
            },
            "required": ["name"]
        })
    }
}

pub fn create_module(pool: PgPool, cache: CacheAside) -> Arc<dyn Module> {
    catalog::create_module::<Publisher>(Arc::new(PgPublisherStore::new(pool)), cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_is_rejected() {
        let draft: PublisherDraft =
            serde_json::from_value(json!({"name": "", "address": "Via Roma 1"})).unwrap();
        assert_eq!(
            Publisher::validate(&draft).unwrap_err(),
            vec![json!({"field": "name", "error": "required"})]
        );
    }

    #[test]
    fn test_missing_name_fails_to_bind() {
        assert!(serde_json::from_value::<PublisherDraft>(json!({"phone": "555-0100"})).is_err());
    }
}
