use async_trait::async_trait;
use libris_db::{delete_by_id, sync_id_sequence, PgPool, Store, StoreError};
use sqlx::types::Json;

use super::models::{Review, ReviewDraft};
use crate::modules::{books::BookSummary, users::UserSummary};

const SELECT_REVIEWS: &str = r#"
    SELECT
        r.id,
        r.book_id,
        r.user_id,
        r.rating,
        r.comment,
        (SELECT jsonb_build_object(
                    'id', b.id,
                    'title', b.title,
                    'published_year', b.published_year,
                    'availability', b.availability
                )
         FROM books b
         WHERE b.id = r.book_id) AS book,
        (SELECT jsonb_build_object('id', u.id, 'username', u.username, 'email', u.email)
         FROM users u
         WHERE u.id = r.user_id) AS "user"
    FROM reviews r
"#;

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    book_id: i64,
    user_id: i64,
    rating: i32,
    comment: String,
    book: Option<Json<BookSummary>>,
    user: Option<Json<UserSummary>>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            book_id: row.book_id,
            user_id: row.user_id,
            rating: row.rating,
            comment: row.comment,
            book: row.book.map(|Json(book)| book),
            user: row.user.map(|Json(user)| user),
        }
    }
}

pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store<Review> for PgReviewStore {
    async fn find_all(&self) -> Result<Vec<Review>, StoreError> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!("{SELECT_REVIEWS} ORDER BY r.id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Review, StoreError> {
        sqlx::query_as::<_, ReviewRow>(&format!("{SELECT_REVIEWS} WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Review::from)
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, draft: &ReviewDraft) -> Result<Review, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO reviews (book_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(draft.book_id)
        .bind(draft.user_id)
        .bind(draft.rating)
        .bind(&draft.comment)
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: i64, draft: &ReviewDraft) -> Result<Review, StoreError> {
        let mut tx = self.pool.begin().await?;
        let inserted: bool = sqlx::query_scalar(
            r#"
            INSERT INTO reviews (id, book_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
                SET book_id = EXCLUDED.book_id,
                    user_id = EXCLUDED.user_id,
                    rating = EXCLUDED.rating,
                    comment = EXCLUDED.comment
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(id)
        .bind(draft.book_id)
        .bind(draft.user_id)
        .bind(draft.rating)
        .bind(&draft.comment)
        .fetch_one(&mut *tx)
        .await?;

        if inserted {
            sync_id_sequence(&mut *tx, "reviews").await?;
        }
        tx.commit().await?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        delete_by_id(&self.pool, "reviews", id).await
    }
}
