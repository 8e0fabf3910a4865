use async_trait::async_trait;
use libris_db::{delete_by_id, sync_id_sequence, PgPool, Store, StoreError};
use sqlx::types::Json;

use super::models::{Author, AuthorDraft};
use crate::modules::books::BookSummary;

const SELECT_AUTHORS: &str = r#"
    SELECT
        a.id,
        a.name,
        a.bio,
        a.email,
        COALESCE(
            (SELECT jsonb_agg(jsonb_build_object(
                        'id', b.id,
                        'title', b.title,
                        'published_year', b.published_year,
                        'availability', b.availability
                    ) ORDER BY b.id)
             FROM books b
             WHERE b.author_id = a.id),
            '[]'::jsonb
        ) AS books
    FROM authors a
"#;

#[derive(sqlx::FromRow)]
struct AuthorRow {
    id: i64,
    name: String,
    bio: String,
    email: String,
    books: Json<Vec<BookSummary>>,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            bio: row.bio,
            email: row.email,
            books: row.books.0,
        }
    }
}

pub struct PgAuthorStore {
    pool: PgPool,
}

impl PgAuthorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store<Author> for PgAuthorStore {
    async fn find_all(&self) -> Result<Vec<Author>, StoreError> {
        let rows = sqlx::query_as::<_, AuthorRow>(&format!("{SELECT_AUTHORS} ORDER BY a.id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Author::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Author, StoreError> {
        let row = sqlx::query_as::<_, AuthorRow>(&format!("{SELECT_AUTHORS} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Author::from).ok_or(StoreError::NotFound)
    }

    async fn create(&self, draft: &AuthorDraft) -> Result<Author, StoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO authors (name, bio, email) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&draft.name)
        .bind(&draft.bio)
        .bind(&draft.email)
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: i64, draft: &AuthorDraft) -> Result<Author, StoreError> {
        let mut tx = self.pool.begin().await?;
        let inserted: bool = sqlx::query_scalar(
            r#"
            INSERT INTO authors (id, name, bio, email)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
                SET name = EXCLUDED.name, bio = EXCLUDED.bio, email = EXCLUDED.email
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.bio)
        .bind(&draft.email)
        .fetch_one(&mut *tx)
        .await?;

        if inserted {
            sync_id_sequence(&mut *tx, "authors").await?;
        }
        tx.commit().await?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        delete_by_id(&self.pool, "authors", id).await
    }
}
