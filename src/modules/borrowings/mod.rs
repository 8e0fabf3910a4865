//! Borrow records: which user has which book, and until when.

mod models;
mod store;

use std::sync::Arc;

use libris_cache::CacheAside;
use libris_db::PgPool;
use libris_kernel::{Migration, Module};
use serde_json::{json, Value};

use crate::catalog::{self, Resource, Violations};
use crate::modules::{books, users};

pub use models::{Borrowing, BorrowingDraft};
pub use store::PgBorrowingStore;

impl Resource for Borrowing {
    fn validate(draft: &BorrowingDraft) -> Result<(), Vec<Value>> {
        Violations::new()
            .positive(draft.book_id, "book_id")
            .positive(draft.user_id, "user_id")
            .check(
                draft.due_date >= draft.borrowed_at(),
                "due_date",
                "must not be before borrowed_at",
            )
            .finish()
    }

    fn migrations() -> Vec<Migration> {
        vec![Migration {
            id: "001_create_borrowed_books",
            up: r#"
                CREATE TABLE IF NOT EXISTS borrowed_books (
                    id          BIGSERIAL PRIMARY KEY,
                    book_id     BIGINT NOT NULL REFERENCES books (id) ON DELETE CASCADE,
                    user_id     BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
                    borrowed_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                    due_date    TIMESTAMPTZ NOT NULL
                );
                CREATE INDEX IF NOT EXISTS borrowed_books_user_id_idx ON borrowed_books (user_id);
            "#,
        }]
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": { "type": "integer", "format": "int64" },
                "book_id": { "type": "integer", "format": "int64" },
                "user_id": { "type": "integer", "format": "int64" },
                "borrowed_at": { "type": "string", "format": "date-time" },
                "due_date": { "type": "string", "format": "date-time" },
                "book": books::summary_schema(),
                "user": users::summary_schema()
            },
            "required": ["id", "book_id", "user_id", "borrowed_at", "due_date"]
        })
    }

    fn draft_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "book_id": { "type": "integer", "format": "int64" },
                "user_id": { "type": "integer", "format": "int64" },
                "borrowed_at": { "type": "string", "format": "date-time" },
                "due_date": { "type": "string", "format": "date-time" }
            },
            "required": ["book_id", "user_id", "due_date"]
        })
    }
}

pub fn create_module(pool: PgPool, cache: CacheAside) -> Arc<dyn Module> {
    catalog::create_module::<Borrowing>(Arc::new(PgBorrowingStore::new(pool)), cache)
}
