//! Reader reviews: a 1 to 5 rating of a book by a user.

mod models;
mod store;

use std::sync::Arc;

use libris_cache::CacheAside;
use libris_db::PgPool;
use libris_kernel::{Migration, Module};
use serde_json::{json, Value};

use crate::catalog::{self, Resource, Violations};
use crate::modules::{books, users};

pub use models::{Review, ReviewDraft, ReviewSummary};
pub use store::PgReviewStore;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

impl Resource for Review {
    fn validate(draft: &ReviewDraft) -> Result<(), Vec<Value>> {
        Violations::new()
            .positive(draft.book_id, "book_id")
            .positive(draft.user_id, "user_id")
            .check(
                (MIN_RATING..=MAX_RATING).contains(&draft.rating),
                "rating",
                "must be between 1 and 5",
            )
            .finish()
    }

    fn migrations() -> Vec<Migration> {
        vec![Migration {
            id: "001_create_reviews",
            up: r#"
                CREATE TABLE IF NOT EXISTS reviews (
                    id      BIGSERIAL PRIMARY KEY,
                    book_id BIGINT NOT NULL REFERENCES books (id) ON DELETE CASCADE,
                    user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
                    rating  INTEGER NOT NULL CONSTRAINT reviews_rating_check CHECK (rating BETWEEN 1 AND 5),
                    comment TEXT NOT NULL DEFAULT ''
                );
                CREATE INDEX IF NOT EXISTS reviews_book_id_idx ON reviews (book_id);
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
                "rating": { "type": "integer", "minimum": MIN_RATING, "maximum": MAX_RATING },
                "comment": { "type": "string" },
                "book": books::summary_schema(),
                "user": users::summary_schema()
            },
            "required": ["id", "book_id", "user_id", "rating", "comment"]
        })
    }

    fn draft_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "book_id": { "type": "integer", "format": "int64" },
                "user_id": { "type": "integer", "format": "int64" },
                "rating": { "type": "integer", "minimum": MIN_RATING, "maximum": MAX_RATING },
                "comment": { "type": "string" }
            },
            "required": ["book_id", "user_id", "rating"]
        })
    }
}

pub fn create_module(pool: PgPool, cache: CacheAside) -> Arc<dyn Module> {
    catalog::create_module::<Review>(Arc::new(PgReviewStore::new(pool)), cache)
}

/// JSON schema of [`ReviewSummary`].
pub fn summary_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer", "format": "int64" },
            "user_id": { "type": "integer", "format": "int64" },
            "rating": { "type": "integer" },
            "comment": { "type": "string" }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(rating: i32) -> ReviewDraft {
        ReviewDraft {
            book_id: 1,
            user_id: 1,
            rating,
            comment: "Slow start, great ending".to_string(),
        }
    }

    #[test]
    fn test_rating_bounds() {
        for rating in MIN_RATING..=MAX_RATING {
            assert!(Review::validate(&draft(rating)).is_ok(), "{rating}");
        }
        for rating in [0, 6, -1] {
            let details = Review::validate(&draft(rating)).unwrap_err();
            assert_eq!(details[0]["field"], "rating");
        }
    }

    #[test]
    fn test_references_must_be_positive() {
        let draft = ReviewDraft {
            book_id: 0,
            user_id: -4,
            ..draft(3)
        };
        assert_eq!(Review::validate(&draft).unwrap_err().len(), 2);
    }
}
