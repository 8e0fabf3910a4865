//! Books: the catalog's central entity.
//!
//! A book optionally references an author and a publisher, belongs to any
//! number of categories through `book_categories`, and carries its reviews.
//! Titles are unique.

mod models;
mod store;

use std::sync::Arc;

use libris_cache::CacheAside;
use libris_db::PgPool;
use libris_kernel::{Migration, Module};
use serde_json::{json, Value};

use crate::catalog::{self, Resource, Violations};
use crate::modules::reviews;

pub use models::{Book, BookDraft, BookSummary};
pub use store::PgBookStore;

impl Resource for Book {
    fn validate(draft: &BookDraft) -> Result<(), Vec<Value>> {
        let mut violations = Violations::new();
        violations
            .require(&draft.title, "title")
            .check(draft.published_year >= 0, "published_year", "must not be negative");
        if let Some(author_id) = draft.author_id {
            violations.positive(author_id, "author_id");
        }
        if let Some(publisher_id) = draft.publisher_id {
            violations.positive(publisher_id, "publisher_id");
        }
        if draft.category_ids.iter().any(|id| *id <= 0) {
            violations.check(false, "category_ids", "must all be positive ids");
        }
        violations.finish()
    }

    fn migrations() -> Vec<Migration> {
        vec![
            Migration {
                id: "001_create_books",
                up: r#"
                    CREATE TABLE IF NOT EXISTS books (
                        id             BIGSERIAL PRIMARY KEY,
                        title          TEXT NOT NULL CONSTRAINT books_title_key UNIQUE,
                        description    TEXT NOT NULL DEFAULT '',
                        published_year INTEGER NOT NULL DEFAULT 0,
                        author_id      BIGINT REFERENCES authors (id) ON DELETE SET NULL,
                        publisher_id   BIGINT REFERENCES publishers (id) ON DELETE SET NULL,
                        availability   BOOLEAN NOT NULL DEFAULT TRUE
                    );
                    CREATE INDEX IF NOT EXISTS books_author_id_idx ON books (author_id);
                    CREATE INDEX IF NOT EXISTS books_publisher_id_idx ON books (publisher_id);
                "#,
            },
            Migration {
                id: "002_create_book_categories",
                up: r#"
                    CREATE TABLE IF NOT EXISTS book_categories (
                        book_id     BIGINT NOT NULL REFERENCES books (id) ON DELETE CASCADE,
                        category_id BIGINT NOT NULL REFERENCES categories (id) ON DELETE CASCADE,
                        PRIMARY KEY (book_id, category_id)
                    );
                    CREATE INDEX IF NOT EXISTS book_categories_category_id_idx
                        ON book_categories (category_id);
                "#,
            },
        ]
    }

    fn schema() -> Value {
        let named = json!({
            "type": "object",
            "properties": {
                "id": { "type": "integer", "format": "int64" },
                "name": { "type": "string" }
            }
        });
        let mut optional = named.clone();
        optional["type"] = json!(["object", "null"]);

        json!({
            "type": "object",
            "properties": {
                "id": { "type": "integer", "format": "int64" },
                "title": { "type": "string" },
                "description": { "type": "string" },
                "published_year": { "type": "integer" },
                "author_id": { "type": ["integer", "null"], "format": "int64" },
                "publisher_id": { "type": ["integer", "null"], "format": "int64" },
                "availability": { "type": "boolean" },
                "author": optional,
                "publisher": optional,
                "categories": { "type": "array", "items": named },
                "reviews": { "type": "array", "items": reviews::summary_schema() }
            },
            "required": ["id", "title", "description", "published_year", "availability", "categories", "reviews"]
        })
    }

    fn draft_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": { "type": "string", "minLength": 1 },
                "description": { "type": "string" },
                "published_year": { "type": "integer", "minimum": 0 },
                "author_id": { "type": ["integer", "null"], "format": "int64" },
                "publisher_id": { "type": ["integer", "null"], "format": "int64" },
                "availability": { "type": "boolean", "default": true },
                "category_ids": {
                    "type": "array",
                    "items": { "type": "integer", "format": "int64" }
                }
            },
            "required": ["title"]
        })
    }
}

pub fn create_module(pool: PgPool, cache: CacheAside) -> Arc<dyn Module> {
    catalog::create_module::<Book>(Arc::new(PgBookStore::new(pool)), cache)
}

/// JSON schema of [`BookSummary`].
pub fn summary_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer", "format": "int64" },
            "title": { "type": "string" },
            "published_year": { "type": "integer" },
            "availability": { "type": "boolean" }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(value: Value) -> BookDraft {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_minimal_draft_defaults() {
        let draft = draft(json!({"title": "The Dispossessed"}));

        assert!(draft.availability);
        assert_eq!(draft.author_id, None);
        assert!(draft.category_ids.is_empty());
        assert!(Book::validate(&draft).is_ok());
    }

    #[test]
    fn test_rejects_bad_references() {
        let draft = draft(json!({
            "title": "The Dispossessed",
            "published_year": -1,
            "author_id": 0,
            "category_ids": [3, -2]
        }));
        let fields: Vec<Value> = Book::validate(&draft)
            .unwrap_err()
            .into_iter()
            .map(|detail| detail["field"].clone())
            .collect();

        assert_eq!(
            fields,
            vec![json!("published_year"), json!("author_id"), json!("category_ids")]
        );
    }

    #[test]
    fn test_record_shape() {
        let book = Book::from_draft(2, &draft(json!({"title": "Kindred", "published_year": 1979})));
        let value = serde_json::to_value(&book).unwrap();

        assert_eq!(value["author"], Value::Null);
        assert_eq!(value["categories"], json!([]));
        assert_eq!(value["published_year"], 1979);
    }

    #[test]
    fn test_book_categories_follow_books() {
        let ids: Vec<&str> = Book::migrations().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["001_create_books", "002_create_book_categories"]);
        assert!(Book::migrations()[1].up.contains("REFERENCES categories"));
    }
}
