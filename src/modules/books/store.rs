use async_trait::async_trait;
use libris_db::{delete_by_id, sync_id_sequence, PgPool, Store, StoreError};
use sqlx::{types::Json, Postgres, Transaction};

use super::models::{Book, BookDraft};
use crate::modules::{
    authors::AuthorSummary, categories::CategorySummary, publishers::PublisherSummary,
    reviews::ReviewSummary,
};

const SELECT_BOOKS: &str = r#"
    SELECT
        b.id,
        b.title,
        b.description,
        b.published_year,
        b.author_id,
        b.publisher_id,
        b.availability,
        (SELECT jsonb_build_object('id', a.id, 'name', a.name)
         FROM authors a
         WHERE a.id = b.author_id) AS author,
        (SELECT jsonb_build_object('id', p.id, 'name', p.name)
         FROM publishers p
         WHERE p.id = b.publisher_id) AS publisher,
        COALESCE(
            (SELECT jsonb_agg(jsonb_build_object('id', c.id, 'name', c.name) ORDER BY c.id)
             FROM book_categories bc
             JOIN categories c ON c.id = bc.category_id
             WHERE bc.book_id = b.id),
            '[]'::jsonb
        ) AS categories,
        COALESCE(
            (SELECT jsonb_agg(jsonb_build_object(
                        'id', r.id,
                        'user_id', r.user_id,
                        'rating', r.rating,
                        'comment', r.comment
                    ) ORDER BY r.id)
             FROM reviews r
             WHERE r.book_id = b.id),
            '[]'::jsonb
        ) AS reviews
    FROM books b
"#;

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    description: String,
    published_year: i32,
    author_id: Option<i64>,
    publisher_id: Option<i64>,
    availability: bool,
    author: Option<Json<AuthorSummary>>,
    publisher: Option<Json<PublisherSummary>>,
    categories: Json<Vec<CategorySummary>>,
    reviews: Json<Vec<ReviewSummary>>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            published_year: row.published_year,
            author_id: row.author_id,
            publisher_id: row.publisher_id,
            availability: row.availability,
            author: row.author.map(|Json(author)| author),
            publisher: row.publisher.map(|Json(publisher)| publisher),
            categories: row.categories.0,
            reviews: row.reviews.0,
        }
    }
}

/// Books and their category links. Every write touches both tables, so every
/// write runs in one transaction.
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn replace_categories(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i64,
        category_ids: &[i64],
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM book_categories WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut **tx)
            .await?;

        if category_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO book_categories (book_id, category_id)
            SELECT $1, category_id FROM UNNEST($2::BIGINT[]) AS ids(category_id)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(book_id)
        .bind(category_ids.to_vec())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Store<Book> for PgBookStore {
    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query_as::<_, BookRow>(&format!("{SELECT_BOOKS} ORDER BY b.id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Book, StoreError> {
        let row = sqlx::query_as::<_, BookRow>(&format!("{SELECT_BOOKS} WHERE b.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Book::from).ok_or(StoreError::NotFound)
    }

    async fn create(&self, draft: &BookDraft) -> Result<Book, StoreError> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, description, published_year, author_id, publisher_id, availability)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.published_year)
        .bind(draft.author_id)
        .bind(draft.publisher_id)
        .bind(draft.availability)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_categories(&mut tx, id, &draft.category_ids).await?;
        tx.commit().await?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: i64, draft: &BookDraft) -> Result<Book, StoreError> {
        let mut tx = self.pool.begin().await?;

        let inserted: bool = sqlx::query_scalar(
            r#"
            INSERT INTO books (id, title, description, published_year, author_id, publisher_id, availability)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
                SET title = EXCLUDED.title,
                    description = EXCLUDED.description,
                    published_year = EXCLUDED.published_year,
                    author_id = EXCLUDED.author_id,
                    publisher_id = EXCLUDED.publisher_id,
                    availability = EXCLUDED.availability
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.published_year)
        .bind(draft.author_id)
        .bind(draft.publisher_id)
        .bind(draft.availability)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_categories(&mut tx, id, &draft.category_ids).await?;
        if inserted {
            sync_id_sequence(&mut *tx, "books").await?;
        }
        tx.commit().await?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        delete_by_id(&self.pool, "books", id).await
    }
}
