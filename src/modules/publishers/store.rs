use async_trait::async_trait;
use libris_db::{delete_by_id, sync_id_sequence, PgPool, Store, StoreError};
use sqlx::types::Json;

use super::models::{Publisher, PublisherDraft};
use crate::modules::books::BookSummary;

const SELECT_PUBLISHERS: &str = r#"
    SELECT
        p.id,
        p.name,
        p.address,
        p.phone,
        COALESCE(
            (SELECT jsonb_agg(jsonb_build_object(
                        'id', b.id,
                        'title', b.title,
                        'published_year', b.published_year,
                        'availability', b.availability
                    ) ORDER BY b.id)
             FROM books b
             WHERE b.publisher_id = p.id),
            '[]'::jsonb
        ) AS books
    FROM publishers p
"#;

#[derive(sqlx::FromRow)]
struct PublisherRow {
    id: i64,
    name: String,
    address: String,
    phone: String,
    books: Json<Vec<BookSummary>>,
}

impl From<PublisherRow> for Publisher {
    fn from(row: PublisherRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            books: row.books.0,
        }
    }
}

pub struct PgPublisherStore {
    pool: PgPool,
}

impl PgPublisherStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store<Publisher> for PgPublisherStore {
    async fn find_all(&self) -> Result<Vec<Publisher>, StoreError> {
        let rows = sqlx::query_as::<_, PublisherRow>(&format!("{SELECT_PUBLISHERS} ORDER BY p.id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Publisher::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Publisher, StoreError> {
        let row = sqlx::query_as::<_, PublisherRow>(&format!("{SELECT_PUBLISHERS} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Publisher::from).ok_or(StoreError::NotFound)
    }

    async fn create(&self, draft: &PublisherDraft) -> Result<Publisher, StoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO publishers (name, address, phone) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&draft.name)
        .bind(&draft.address)
        .bind(&draft.phone)
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: i64, draft: &PublisherDraft) -> Result<Publisher, StoreError> {
        let mut tx = self.pool.begin().await?;
        let inserted: bool = sqlx::query_scalar(
            r#"
            INSERT INTO publishers (id, name, address, phone)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
                SET name = EXCLUDED.name, address = EXCLUDED.address, phone = EXCLUDED.phone
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.address)
        .bind(&draft.phone)
        .fetch_one(&mut *tx)
        .await?;

        if inserted {
            sync_id_sequence(&mut *tx, "publishers").await?;
        }
        tx.commit().await?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        delete_by_id(&self.pool, "publishers", id).await
    }
}
