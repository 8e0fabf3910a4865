use async_trait::async_trait;
use libris_db::{delete_by_id, sync_id_sequence, PgPool, Store, StoreError};
use sqlx::types::Json;

use super::models::{Category, CategoryDraft};
use crate::modules::books::BookSummary;

// Books reach a category only through book_categories.
const SELECT_CATEGORIES: &str = r#"
    SELECT
        c.id,
        c.name,
        COALESCE(
            (SELECT jsonb_agg(jsonb_build_object(
                        'id', b.id,
                        'title', b.title,
                        'published_year', b.published_year,
                        'availability', b.availability
                    ) ORDER BY b.id)
             FROM book_categories bc
             JOIN books b ON b.id = bc.book_id
             WHERE bc.category_id = c.id),
            '[]'::jsonb
        ) AS books
    FROM categories c
"#;

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    books: Json<Vec<BookSummary>>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            books: row.books.0,
        }
    }
}

pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store<Category> for PgCategoryStore {
    async fn find_all(&self) -> Result<Vec<Category>, StoreError> {
        let rows =
            sqlx::query_as::<_, CategoryRow>(&format!("{SELECT_CATEGORIES} ORDER BY c.id"))
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Category, StoreError> {
        sqlx::query_as::<_, CategoryRow>(&format!("{SELECT_CATEGORIES} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Category::from)
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, draft: &CategoryDraft) -> Result<Category, StoreError> {
        let id: i64 = sqlx::query_scalar("INSERT INTO categories (name) VALUES ($1) RETURNING id")
            .bind(&draft.name)
            .fetch_one(&self.pool)
            .await?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: i64, draft: &CategoryDraft) -> Result<Category, StoreError> {
        let mut tx = self.pool.begin().await?;
        let inserted: bool = sqlx::query_scalar(
            r#"
            INSERT INTO categories (id, name) VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .fetch_one(&mut *tx)
        .await?;

        if inserted {
            sync_id_sequence(&mut *tx, "categories").await?;
        }
        tx.commit().await?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        delete_by_id(&self.pool, "categories", id).await
    }
}
