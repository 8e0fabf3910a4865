use async_trait::async_trait;
use libris_db::{delete_by_id, sync_id_sequence, PgPool, Store, StoreError};
use sqlx::types::Json;
use time::OffsetDateTime;

use super::models::{Borrowing, BorrowingDraft};
use crate::modules::{books::BookSummary, users::UserSummary};

const SELECT_BORROWINGS: &str = r#"
    SELECT
        bb.id,
        bb.book_id,
        bb.user_id,
        bb.borrowed_at,
        bb.due_date,
        (SELECT jsonb_build_object(
                    'id', b.id,
                    'title', b.title,
                    'published_year', b.published_year,
                    'availability', b.availability
                )
         FROM books b
         WHERE b.id = bb.book_id) AS book,
        (SELECT jsonb_build_object('id', u.id, 'username', u.username, 'email', u.email)
         FROM users u
         WHERE u.id = bb.user_id) AS "user"
    FROM borrowed_books bb
"#;

#[derive(sqlx::FromRow)]
struct BorrowingRow {
    id: i64,
    book_id: i64,
    user_id: i64,
    borrowed_at: OffsetDateTime,
    due_date: OffsetDateTime,
    book: Option<Json<BookSummary>>,
    user: Option<Json<UserSummary>>,
}

impl From<BorrowingRow> for Borrowing {
    fn from(row: BorrowingRow) -> Self {
        Self {
            id: row.id,
            book_id: row.book_id,
            user_id: row.user_id,
            borrowed_at: row.borrowed_at,
            due_date: row.due_date,
            book: row.book.map(|Json(book)| book),
            user: row.user.map(|Json(user)| user),
        }
    }
}

/// Borrow records, stored in `borrowed_books`.
pub struct PgBorrowingStore {
    pool: PgPool,
}

impl PgBorrowingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store<Borrowing> for PgBorrowingStore {
    async fn find_all(&self) -> Result<Vec<Borrowing>, StoreError> {
        let rows =
            sqlx::query_as::<_, BorrowingRow>(&format!("{SELECT_BORROWINGS} ORDER BY bb.id"))
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Borrowing::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Borrowing, StoreError> {
        sqlx::query_as::<_, BorrowingRow>(&format!("{SELECT_BORROWINGS} WHERE bb.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Borrowing::from)
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, draft: &BorrowingDraft) -> Result<Borrowing, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO borrowed_books (book_id, user_id, borrowed_at, due_date)
            VALUES ($1, $2, COALESCE($3, now()), $4)
            RETURNING id
            "#,
        )
        .bind(draft.book_id)
        .bind(draft.user_id)
        .bind(draft.borrowed_at)
        .bind(draft.due_date)
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: i64, draft: &BorrowingDraft) -> Result<Borrowing, StoreError> {
        let mut tx = self.pool.begin().await?;
        let inserted: bool = sqlx::query_scalar(
            r#"
            INSERT INTO borrowed_books (id, book_id, user_id, borrowed_at, due_date)
            VALUES ($1, $2, $3, COALESCE($4, now()), $5)
            ON CONFLICT (id) DO UPDATE
                SET book_id = EXCLUDED.book_id,
                    user_id = EXCLUDED.user_id,
                    borrowed_at = EXCLUDED.borrowed_at,
                    due_date = EXCLUDED.due_date
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(id)
        .bind(draft.book_id)
        .bind(draft.user_id)
        .bind(draft.borrowed_at)
        .bind(draft.due_date)
        .fetch_one(&mut *tx)
        .await?;

        if inserted {
            sync_id_sequence(&mut *tx, "borrowed_books").await?;
        }
        tx.commit().await?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        delete_by_id(&self.pool, "borrowed_books", id).await
    }
}
